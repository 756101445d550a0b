//! Snapgram Models - backend document shapes, query predicates, and local storage.
//!
//! The backend owns all real persistence; this crate only describes what its
//! documents look like on the wire and keeps a tiny SQLite key-value store for
//! client-side state (the fallback session cookies).

pub mod db;
pub mod schema;
pub mod migrations;
pub mod document;
pub mod query;
pub mod id;
pub mod models;

// Re-export key types
pub use db::LocalStorage;
pub use document::{Document, DocumentList, Related};
pub use query::Query;
pub use models::account::{Account, Session};
pub use models::file::{FileInfo, FileUpload, PreviewOptions};
pub use models::post::{parse_tags, NewPost, PostRecord, UpdatePost};
pub use models::save::SaveRecord;
pub use models::user::{NewUser, UpdateUser, UserDraft, UserProfile, UserRecord};
