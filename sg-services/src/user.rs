//! User service: registration, sessions and profile documents.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use sg_api::{Backend, Collection};
use sg_core::constants::{self, attributes};
use sg_core::error::{SgError, SgResult};
use sg_models::{
    id, Account, Document, DocumentList, NewUser, Query, Session, UpdateUser, UserDraft,
    UserRecord,
};

use crate::event_bus::{AppEvent, EventBus};
use crate::media::MediaService;
use crate::service::{ok_or_log, Service, ServiceState};

/// Service for accounts, sessions and the users collection.
#[derive(Clone)]
pub struct UserService {
    state: ServiceState,
    backend: Arc<dyn Backend>,
    event_bus: EventBus,
    media: MediaService,
}

impl UserService {
    /// Create a new UserService. Avatar uploads go through `media`.
    pub fn new(backend: Arc<dyn Backend>, event_bus: EventBus, media: MediaService) -> Self {
        Self {
            state: ServiceState::Created,
            backend,
            event_bus,
            media,
        }
    }

    // --- Registration ---

    /// Register an account and save its profile document with an initials avatar.
    pub async fn create_user_account(&self, user: NewUser) -> Option<Document<UserRecord>> {
        ok_or_log("create_user_account", self.try_create_user_account(user).await)
    }

    pub async fn try_create_user_account(&self, user: NewUser) -> SgResult<Document<UserRecord>> {
        if user.email.trim().is_empty() || user.password.is_empty() {
            return Err(SgError::Validation("email and password are required".into()));
        }

        let account = self
            .backend
            .create_account(&id::unique(), &user.email, &user.password, &user.name)
            .await?;
        info!("created account {}", account.id);

        let avatar = self.backend.initials_avatar_url(&account.name)?;

        self.try_save_user_to_db(UserDraft {
            account_id: account.id,
            email: account.email,
            name: account.name,
            image_url: avatar.to_string(),
            username: Some(user.username),
        })
        .await
    }

    /// Save a profile document for an existing account.
    pub async fn save_user_to_db(&self, user: UserDraft) -> Option<Document<UserRecord>> {
        ok_or_log("save_user_to_db", self.try_save_user_to_db(user).await)
    }

    pub async fn try_save_user_to_db(&self, user: UserDraft) -> SgResult<Document<UserRecord>> {
        let data = serde_json::to_value(&user)?;
        let doc = self
            .backend
            .create_document(Collection::Users, &id::unique(), data)
            .await?
            .decode::<UserRecord>()?;
        info!("saved user {} for account {}", doc.id, doc.data.account_id);
        self.event_bus.emit(AppEvent::UserUpdated {
            user_id: doc.id.clone(),
        });
        Ok(doc)
    }

    // --- Sessions ---

    /// Sign in with email and password.
    ///
    /// Unlike the other operations, failures are returned to the caller.
    pub async fn sign_in_account(&self, email: &str, password: &str) -> SgResult<Session> {
        match self.backend.create_email_password_session(email, password).await {
            Ok(session) => {
                info!("signed in, session {}", session.id);
                self.event_bus.emit(AppEvent::SignedIn {
                    session_id: session.id.clone(),
                });
                Ok(session)
            }
            Err(e) => {
                error!("sign_in_account failed: {e}");
                Err(e)
            }
        }
    }

    /// Delete the current session.
    pub async fn sign_out_account(&self) -> Option<()> {
        ok_or_log("sign_out_account", self.try_sign_out_account().await)
    }

    pub async fn try_sign_out_account(&self) -> SgResult<()> {
        self.backend.delete_session(constants::CURRENT_SESSION).await?;
        info!("signed out");
        self.event_bus.emit(AppEvent::SignedOut);
        Ok(())
    }

    // --- Lookup ---

    /// The account of the current session.
    pub async fn get_account(&self) -> Option<Account> {
        ok_or_log("get_account", self.try_get_account().await)
    }

    pub async fn try_get_account(&self) -> SgResult<Account> {
        self.backend.get_account().await
    }

    /// Profile document of the signed-in account.
    ///
    /// `None` when there is no session or no profile for the account.
    pub async fn get_current_user(&self) -> Option<Document<UserRecord>> {
        ok_or_log("get_current_user", self.try_get_current_user().await)
    }

    pub async fn try_get_current_user(&self) -> SgResult<Document<UserRecord>> {
        let account = self.try_get_account().await?;

        self.backend
            .list_documents(
                Collection::Users,
                &[Query::equal(attributes::ACCOUNT_ID, account.id.as_str())],
            )
            .await?
            .into_first()
            .ok_or_else(|| SgError::NotFound(format!("no user for account {}", account.id)))?
            .decode()
    }

    /// Profile document by id.
    pub async fn get_user_by_id(&self, user_id: &str) -> Option<Document<UserRecord>> {
        ok_or_log("get_user_by_id", self.try_get_user_by_id(user_id).await)
    }

    pub async fn try_get_user_by_id(&self, user_id: &str) -> SgResult<Document<UserRecord>> {
        self.backend
            .get_document(Collection::Users, user_id)
            .await?
            .decode()
    }

    /// Newest profiles first, at most `limit`.
    pub async fn get_users(&self, limit: u32) -> Option<DocumentList<UserRecord>> {
        ok_or_log("get_users", self.try_get_users(limit).await)
    }

    pub async fn try_get_users(&self, limit: u32) -> SgResult<DocumentList<UserRecord>> {
        self.backend
            .list_documents(
                Collection::Users,
                &[Query::order_desc(attributes::CREATED_AT), Query::limit(limit)],
            )
            .await?
            .decode()
    }

    // --- Profile edits ---

    /// Update name, bio and optionally the avatar.
    ///
    /// A replacement avatar is uploaded first; if the document write then
    /// fails the new upload is deleted, and if it succeeds the previous
    /// avatar file is.
    pub async fn update_user(&self, user: UpdateUser) -> Option<Document<UserRecord>> {
        ok_or_log("update_user", self.try_update_user(user).await)
    }

    pub async fn try_update_user(&self, user: UpdateUser) -> SgResult<Document<UserRecord>> {
        if user.user_id.is_empty() {
            return Err(SgError::Validation("user id is required".into()));
        }

        let UpdateUser {
            user_id,
            name,
            bio,
            image_id: previous_image_id,
            image_url: previous_image_url,
            file,
        } = user;

        let uploaded = match file {
            Some(file) => Some(self.media.upload_with_preview(file).await?),
            None => None,
        };

        let (image_id, image_url) = match &uploaded {
            Some((info, url)) => (Some(info.id.clone()), Some(url.to_string())),
            None => (previous_image_id.clone(), previous_image_url),
        };

        let data = json!({
            "name": name,
            "bio": bio,
            "imageId": image_id,
            "imageUrl": image_url,
        });

        let written = match self
            .backend
            .update_document(Collection::Users, &user_id, data)
            .await
        {
            Ok(doc) => doc,
            Err(e) => {
                if let Some((info, _)) = &uploaded {
                    self.media.discard_upload(&info.id).await;
                }
                return Err(e);
            }
        };

        if uploaded.is_some() {
            if let Some(old) = previous_image_id.filter(|id| !id.is_empty()) {
                self.media.discard_upload(&old).await;
            }
        }

        info!("updated user {}", written.id);
        self.event_bus.emit(AppEvent::UserUpdated {
            user_id: written.id.clone(),
        });
        written.decode()
    }
}

impl Service for UserService {
    fn name(&self) -> &str {
        "user"
    }

    fn state(&self) -> ServiceState {
        self.state
    }

    fn init(&mut self) -> SgResult<()> {
        self.state = ServiceState::Running;
        info!("user service initialized");
        Ok(())
    }

    fn shutdown(&mut self) -> SgResult<()> {
        self.state = ServiceState::Stopped;
        info!("user service shut down");
        Ok(())
    }
}
