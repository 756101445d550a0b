//! User profile documents and the normalized profile handed to front ends.

use serde::{Deserialize, Serialize};

use crate::document::{null_as_default, Document};
use crate::models::file::FileUpload;

/// Attributes of a document in the users collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Id of the backend account this profile belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Fixed-shape profile consumed by the authentication context.
///
/// Every field is a plain string; missing values are empty. The default
/// value is the anonymous profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub bio: String,
}

impl UserProfile {
    /// Normalize a user document.
    pub fn from_document(doc: &Document<UserRecord>) -> Self {
        let record = &doc.data;
        Self {
            id: doc.id.clone(),
            name: record.name.clone(),
            username: record.username.clone().unwrap_or_default(),
            email: record.email.clone(),
            image_url: record.image_url.clone().unwrap_or_default(),
            bio: record.bio.clone().unwrap_or_default(),
        }
    }

    /// Whether this is the anonymous (default) profile.
    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }
}

impl From<&Document<UserRecord>> for UserProfile {
    fn from(doc: &Document<UserRecord>) -> Self {
        Self::from_document(doc)
    }
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Attributes written when saving a freshly registered user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub account_id: String,
    pub email: String,
    pub name: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Profile edit input. `file` replaces the avatar when present.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub user_id: String,
    pub name: String,
    pub bio: String,
    pub image_id: Option<String>,
    pub image_url: Option<String>,
    pub file: Option<FileUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_normalizes_missing_fields() {
        let doc: Document = serde_json::from_value(json!({
            "$id": "u1",
            "accountId": "acc1",
            "name": "Ada",
            "email": "ada@example.com",
            "imageUrl": "https://img/ada",
        }))
        .unwrap();
        let doc: Document<UserRecord> = doc.decode().unwrap();

        let profile = UserProfile::from(&doc);
        assert_eq!(profile.id, "u1");
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.username, "");
        assert_eq!(profile.bio, "");
        assert_eq!(profile.image_url, "https://img/ada");
        assert!(!profile.is_anonymous());
    }

    #[test]
    fn test_default_profile_is_anonymous() {
        let profile = UserProfile::default();
        assert!(profile.is_anonymous());
        assert_eq!(profile.email, "");
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let draft = UserDraft {
            account_id: "acc".into(),
            email: "e@x.io".into(),
            name: "E".into(),
            image_url: "https://img".into(),
            username: None,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["accountId"], "acc");
        assert_eq!(value["imageUrl"], "https://img");
        assert!(value.get("username").is_none());
    }
}
