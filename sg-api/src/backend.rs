//! The backend surface services are written against.

use std::fmt;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use sg_core::error::SgResult;
use sg_models::{Account, Document, DocumentList, FileInfo, FileUpload, PreviewOptions, Query, Session};

use crate::client::ApiClient;

/// The database collections the client works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Posts,
    Saves,
    Likes,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Posts => "posts",
            Collection::Saves => "saves",
            Collection::Likes => "likes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account, database, storage and avatar operations of the backend.
///
/// Documents come back untyped; callers decode them into the record type
/// they expect.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> SgResult<Account>;

    async fn get_account(&self) -> SgResult<Account>;

    async fn create_email_password_session(&self, email: &str, password: &str) -> SgResult<Session>;

    /// `session_id` may be `"current"`.
    async fn delete_session(&self, session_id: &str) -> SgResult<()>;

    async fn create_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document>;

    async fn list_documents(&self, collection: Collection, queries: &[Query]) -> SgResult<DocumentList>;

    async fn get_document(&self, collection: Collection, document_id: &str) -> SgResult<Document>;

    async fn update_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document>;

    async fn delete_document(&self, collection: Collection, document_id: &str) -> SgResult<()>;

    async fn create_file(&self, file_id: &str, file: FileUpload) -> SgResult<FileInfo>;

    /// Preview URL for a stored image. No request is made.
    fn file_preview_url(&self, file_id: &str, options: &PreviewOptions) -> SgResult<Url>;

    async fn delete_file(&self, file_id: &str) -> SgResult<()>;

    /// Initials avatar URL for `name`. No request is made.
    fn initials_avatar_url(&self, name: &str) -> SgResult<Url>;
}

#[async_trait]
impl Backend for ApiClient {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> SgResult<Account> {
        ApiClient::create_account(self, user_id, email, password, name).await
    }

    async fn get_account(&self) -> SgResult<Account> {
        ApiClient::get_account(self).await
    }

    async fn create_email_password_session(&self, email: &str, password: &str) -> SgResult<Session> {
        ApiClient::create_email_password_session(self, email, password).await
    }

    async fn delete_session(&self, session_id: &str) -> SgResult<()> {
        ApiClient::delete_session(self, session_id).await
    }

    async fn create_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document> {
        ApiClient::create_document(self, collection, document_id, data).await
    }

    async fn list_documents(&self, collection: Collection, queries: &[Query]) -> SgResult<DocumentList> {
        ApiClient::list_documents(self, collection, queries).await
    }

    async fn get_document(&self, collection: Collection, document_id: &str) -> SgResult<Document> {
        ApiClient::get_document(self, collection, document_id).await
    }

    async fn update_document(
        &self,
        collection: Collection,
        document_id: &str,
        data: Value,
    ) -> SgResult<Document> {
        ApiClient::update_document(self, collection, document_id, data).await
    }

    async fn delete_document(&self, collection: Collection, document_id: &str) -> SgResult<()> {
        ApiClient::delete_document(self, collection, document_id).await
    }

    async fn create_file(&self, file_id: &str, file: FileUpload) -> SgResult<FileInfo> {
        ApiClient::create_file(self, file_id, file).await
    }

    fn file_preview_url(&self, file_id: &str, options: &PreviewOptions) -> SgResult<Url> {
        ApiClient::file_preview_url(self, file_id, options)
    }

    async fn delete_file(&self, file_id: &str) -> SgResult<()> {
        ApiClient::delete_file(self, file_id).await
    }

    fn initials_avatar_url(&self, name: &str) -> SgResult<Url> {
        ApiClient::initials_avatar_url(self, name)
    }
}
