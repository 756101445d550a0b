//! Save service: bookmarking posts.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use sg_api::{Backend, Collection};
use sg_core::error::{SgError, SgResult};
use sg_models::{id, Document, SaveRecord};

use crate::event_bus::{AppEvent, EventBus};
use crate::service::{ok_or_log, Service, ServiceState};

/// Service for the saves collection.
#[derive(Clone)]
pub struct SaveService {
    state: ServiceState,
    backend: Arc<dyn Backend>,
    event_bus: EventBus,
}

impl SaveService {
    pub fn new(backend: Arc<dyn Backend>, event_bus: EventBus) -> Self {
        Self {
            state: ServiceState::Created,
            backend,
            event_bus,
        }
    }

    /// Record that `user_id` saved `post_id`.
    pub async fn save_post(&self, user_id: &str, post_id: &str) -> Option<Document<SaveRecord>> {
        ok_or_log("save_post", self.try_save_post(user_id, post_id).await)
    }

    pub async fn try_save_post(&self, user_id: &str, post_id: &str) -> SgResult<Document<SaveRecord>> {
        if user_id.is_empty() || post_id.is_empty() {
            return Err(SgError::Validation("user id and post id are required".into()));
        }

        let doc = self
            .backend
            .create_document(
                Collection::Saves,
                &id::unique(),
                json!({ "user": user_id, "post": post_id }),
            )
            .await?
            .decode::<SaveRecord>()?;

        info!("user {user_id} saved post {post_id} ({})", doc.id);
        self.event_bus.emit(AppEvent::PostSaved {
            save_id: doc.id.clone(),
            post_id: post_id.to_string(),
        });
        Ok(doc)
    }

    /// Delete a save record by its own id.
    pub async fn delete_saved_post(&self, saved_record_id: &str) -> Option<()> {
        ok_or_log("delete_saved_post", self.try_delete_saved_post(saved_record_id).await)
    }

    pub async fn try_delete_saved_post(&self, saved_record_id: &str) -> SgResult<()> {
        self.backend
            .delete_document(Collection::Saves, saved_record_id)
            .await?;
        info!("deleted save {saved_record_id}");
        self.event_bus.emit(AppEvent::SaveDeleted {
            save_id: saved_record_id.to_string(),
        });
        Ok(())
    }
}

impl Service for SaveService {
    fn name(&self) -> &str {
        "save"
    }

    fn state(&self) -> ServiceState {
        self.state
    }

    fn init(&mut self) -> SgResult<()> {
        self.state = ServiceState::Running;
        Ok(())
    }

    fn shutdown(&mut self) -> SgResult<()> {
        self.state = ServiceState::Stopped;
        Ok(())
    }
}
