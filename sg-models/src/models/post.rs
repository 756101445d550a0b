//! Post documents and post create/update inputs.

use serde::{Deserialize, Serialize};

use crate::document::{null_as_default, Related};
use crate::models::file::FileUpload;
use crate::models::user::UserRecord;

/// Attributes of a document in the posts collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Author. Written as a user document id, read back expanded; null once
    /// the author's profile has been deleted.
    #[serde(default)]
    pub creator: Option<Related<UserRecord>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub caption: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_id: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Users who liked the post.
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: Vec<Related<UserRecord>>,
}

impl PostRecord {
    /// User document id of the author, if still present.
    pub fn creator_id(&self) -> Option<&str> {
        self.creator.as_ref().map(Related::id)
    }

    /// Ids of the users who liked this post.
    pub fn like_ids(&self) -> Vec<String> {
        self.likes.iter().map(|l| l.id().to_string()).collect()
    }

    /// Whether `user_id` is among the likes.
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|l| l.id() == user_id)
    }
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// User document id of the author.
    pub user_id: String,
    pub caption: String,
    pub file: FileUpload,
    pub location: Option<String>,
    /// Comma-separated tags, e.g. `"travel, food"`.
    pub tags: Option<String>,
}

/// Input for updating a post.
///
/// `image_id` and `image_url` are the post's current image; they are kept
/// unless `file` supplies a replacement.
#[derive(Debug, Clone)]
pub struct UpdatePost {
    pub post_id: String,
    pub caption: String,
    pub image_id: String,
    pub image_url: String,
    pub file: Option<FileUpload>,
    pub location: Option<String>,
    pub tags: Option<String>,
}

/// Split a comma-separated tag string.
///
/// Spaces are removed before splitting, so `"a, b,c"` gives
/// `["a", "b", "c"]` and `None` gives `[]`. Empty segments are dropped:
/// a blank tag field stores no tags rather than a single `""` tag.
pub fn parse_tags(tags: Option<&str>) -> Vec<String> {
    let Some(raw) = tags else {
        return Vec::new();
    };
    raw.replace(' ', "")
        .split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
