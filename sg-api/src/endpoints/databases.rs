//! Database endpoints: document CRUD and query listing.

use serde_json::{json, Value};
use sg_core::error::SgResult;
use sg_models::{Document, DocumentList, Query};

use crate::backend::Collection;
use crate::client::ApiClient;

impl ApiClient {
    fn documents_path(&self, collection: Collection) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id(),
            self.collection_id(collection)
        )
    }

    /// Create a document with the given id.
    pub async fn create_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document> {
        let body = json!({ "documentId": document_id, "data": data });
        self.post_json(&self.documents_path(collection), &body).await
    }

    /// List documents matching `queries`, each sent as a `queries[]` parameter.
    pub async fn list_documents(
        &self,
        collection: Collection,
        queries: &[Query],
    ) -> SgResult<DocumentList> {
        let params: Vec<(String, String)> = queries
            .iter()
            .map(|q| ("queries[]".to_string(), q.to_query_string()))
            .collect();
        self.get_json(&self.documents_path(collection), &params).await
    }

    /// Fetch one document.
    pub async fn get_document(&self, collection: Collection, document_id: &str) -> SgResult<Document> {
        let path = format!("{}/{document_id}", self.documents_path(collection));
        self.get_json(&path, &[]).await
    }

    /// Patch a document's attributes.
    pub async fn update_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document> {
        let path = format!("{}/{document_id}", self.documents_path(collection));
        self.patch_json(&path, &json!({ "data": data })).await
    }

    /// Delete a document.
    pub async fn delete_document(&self, collection: Collection, document_id: &str) -> SgResult<()> {
        let path = format!("{}/{document_id}", self.documents_path(collection));
        self.delete(&path).await
    }
}
