//! Account endpoints: registration, current account, email sessions.

use serde::Serialize;
use sg_core::constants;
use sg_core::error::SgResult;
use sg_models::{Account, Session};
use tracing::{debug, warn};

use crate::client::ApiClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountParams<'a> {
    user_id: &'a str,
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailSessionParams<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Register a new account.
    pub async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> SgResult<Account> {
        let body = serde_json::to_value(CreateAccountParams {
            user_id,
            email,
            password,
            name,
        })?;
        self.post_json("/account", &body).await
    }

    /// The account the current session belongs to.
    pub async fn get_account(&self) -> SgResult<Account> {
        self.get_json("/account", &[]).await
    }

    /// Sign in with email and password. The session cookie arrives with the response.
    pub async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> SgResult<Session> {
        let body = serde_json::to_value(EmailSessionParams { email, password })?;
        self.post_json("/account/sessions/email", &body).await
    }

    /// Delete a session by id, or the current one with `"current"`.
    ///
    /// The local session marker is cleared once the current session is gone,
    /// including when the backend no longer recognizes it.
    pub async fn delete_session(&self, session_id: &str) -> SgResult<()> {
        let current = session_id == constants::CURRENT_SESSION;
        match self.delete(&format!("/account/sessions/{session_id}")).await {
            Ok(()) => {
                if current {
                    debug!("current session deleted");
                    self.clear_session().await?;
                }
                Ok(())
            }
            Err(e) if current && e.is_auth() => {
                warn!("current session already invalid, clearing local marker: {e}");
                self.clear_session().await?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
