//! Saved-post (bookmark) records.

use serde::{Deserialize, Serialize};

use crate::document::Related;
use crate::models::post::PostRecord;
use crate::models::user::UserRecord;

/// Attributes of a document in the saves collection: one user bookmarking one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecord {
    pub user: Related<UserRecord>,
    pub post: Related<PostRecord>,
}
