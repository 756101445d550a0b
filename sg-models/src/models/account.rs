//! Backend accounts and sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authentication account (distinct from the user profile document).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub email_verification: bool,
    #[serde(default)]
    pub prefs: serde_json::Value,
}

/// An authenticated session. Its existence is what "signed in" means.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub expire: Option<DateTime<Utc>>,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub current: bool,
    /// Only populated for server-side session creation.
    #[serde(default, skip_serializing)]
    pub secret: String,
}

impl Session {
    /// Whether the session expiry has passed (sessions without an expiry never expire).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire.is_some_and(|e| e <= now)
    }
}
