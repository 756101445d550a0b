//! Backend document envelopes.
//!
//! Every database record comes back as a flat JSON object mixing system
//! attributes (`$id`, `$createdAt`, ...) with collection attributes.
//! `Document<T>` splits the two: system attributes are typed fields, the
//! rest is flattened into `T`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use sg_core::error::SgResult;

/// A single backend document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T = serde_json::Value> {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$collectionId", default)]
    pub collection_id: String,
    #[serde(rename = "$databaseId", default)]
    pub database_id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "$permissions", default)]
    pub permissions: Vec<String>,
    /// Collection attributes.
    #[serde(flatten)]
    pub data: T,
}

impl Document<serde_json::Value> {
    /// Reinterpret the untyped attributes as `T`.
    pub fn decode<T: DeserializeOwned>(self) -> SgResult<Document<T>> {
        let data: T = serde_json::from_value(self.data)?;
        Ok(Document {
            id: self.id,
            collection_id: self.collection_id,
            database_id: self.database_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            permissions: self.permissions,
            data,
        })
    }
}

/// Read an attribute, treating `null` like a missing key.
///
/// The backend reports unset attributes as explicit `null`s.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A page of documents from a list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentList<T = serde_json::Value> {
    /// Total matches for the query, independent of the page limit.
    pub total: u64,
    pub documents: Vec<Document<T>>,
}

impl<T> DocumentList<T> {
    /// Cursor for the next page: the id of the last document on this page,
    /// or `None` when the page is empty.
    pub fn next_cursor(&self) -> Option<&str> {
        self.documents.last().map(|d| d.id.as_str())
    }

    /// Whether this page has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// First document on the page.
    pub fn first(&self) -> Option<&Document<T>> {
        self.documents.first()
    }

    /// Consume the list, returning its first document.
    pub fn into_first(self) -> Option<Document<T>> {
        self.documents.into_iter().next()
    }
}

impl DocumentList<serde_json::Value> {
    /// Reinterpret every document's attributes as `T`.
    pub fn decode<T: DeserializeOwned>(self) -> SgResult<DocumentList<T>> {
        let documents = self
            .documents
            .into_iter()
            .map(Document::decode)
            .collect::<SgResult<Vec<_>>>()?;
        Ok(DocumentList {
            total: self.total,
            documents,
        })
    }
}

/// A relationship attribute: either a bare document id (as written) or the
/// expanded related document (as read back).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    Id(String),
    Document(Box<Document<T>>),
}

impl<T> Related<T> {
    /// The related document's id, whichever form this is in.
    pub fn id(&self) -> &str {
        match self {
            Related::Id(id) => id,
            Related::Document(doc) => &doc.id,
        }
    }

    /// The expanded document, if the backend returned one.
    pub fn document(&self) -> Option<&Document<T>> {
        match self {
            Related::Id(_) => None,
            Related::Document(doc) => Some(doc),
        }
    }
}
