//! Backend error responses.
//!
//! Failed calls return a JSON body like:
//! ```json
//! { "message": "Invalid credentials.", "code": 401, "type": "user_invalid_credentials", "version": "1.5.7" }
//! ```

use serde::{Deserialize, Serialize};
use sg_core::error::SgError;

/// Error body returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendError {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Numeric code, normally equal to the HTTP status.
    #[serde(default)]
    pub code: u16,
    /// Error type identifier.
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Backend version that produced the error.
    #[serde(default)]
    pub version: Option<String>,
}

impl BackendError {
    /// Parse an error body, falling back to the raw text as the message.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<BackendError>(body) {
            Ok(mut err) => {
                if err.code == 0 {
                    err.code = status;
                }
                err
            }
            Err(_) => BackendError {
                message: body.trim().to_string(),
                code: status,
                error_type: String::new(),
                version: None,
            },
        }
    }

    /// Map this error to the client error taxonomy by HTTP status.
    pub fn into_sg_error(self, status: u16) -> SgError {
        let message = if self.message.is_empty() {
            format!("backend returned {status}")
        } else {
            self.message
        };
        match status {
            401 | 403 => SgError::AuthFailed(message),
            404 => SgError::NotFound(message),
            429 => SgError::ServerError {
                status,
                code: self.error_type,
                message,
            },
            400..=499 => SgError::Validation(message),
            _ => SgError::ServerError {
                status,
                code: self.error_type,
                message,
            },
        }
    }
}
