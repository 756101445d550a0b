//! Service registry for dependency injection and lifecycle management.
//!
//! The registry wires every service to the shared backend, local storage
//! and event bus, initializes them in order, and handles ordered shutdown.

use std::sync::Arc;

use tracing::{error, info};

use sg_api::{ApiClient, Backend};
use sg_core::config::ConfigHandle;
use sg_core::error::{SgError, SgResult};
use sg_models::{LocalStorage, PreviewOptions};

use crate::auth::AuthContext;
use crate::event_bus::EventBus;
use crate::media::MediaService;
use crate::post::PostService;
use crate::save::SaveService;
use crate::service::{Service, ServiceState};
use crate::user::UserService;

/// Central registry holding every application service.
pub struct ServiceRegistry {
    /// Application configuration.
    pub config: ConfigHandle,
    /// Key-value local storage (session marker).
    pub storage: LocalStorage,
    /// Application-level event bus.
    pub event_bus: EventBus,
    /// Backend shared by all services.
    backend: Arc<dyn Backend>,
    pub media: MediaService,
    pub users: UserService,
    pub posts: PostService,
    pub saves: SaveService,
    /// Authentication context.
    pub auth: AuthContext,
}

impl ServiceRegistry {
    /// Wire services to an existing backend and storage.
    pub async fn new(config: ConfigHandle, backend: Arc<dyn Backend>, storage: LocalStorage) -> Self {
        let feed = config.read().await.feed.clone();
        let event_bus = EventBus::new(256);

        let media = MediaService::new(
            backend.clone(),
            event_bus.clone(),
            PreviewOptions::square(feed.preview_size, feed.preview_quality),
        );
        let users = UserService::new(backend.clone(), event_bus.clone(), media.clone());
        let posts = PostService::new(backend.clone(), event_bus.clone(), media.clone(), &feed);
        let saves = SaveService::new(backend.clone(), event_bus.clone());
        let auth = AuthContext::new(users.clone(), storage.clone(), event_bus.clone());

        Self {
            config,
            storage,
            event_bus,
            backend,
            media,
            users,
            posts,
            saves,
            auth,
        }
    }

    /// Open local storage and connect an `ApiClient` from configuration.
    pub async fn connect(config: ConfigHandle) -> SgResult<Self> {
        let (backend_config, storage_path, storage_config) = {
            let cfg = config.read().await;
            cfg.backend.validate()?;
            (
                cfg.backend.clone(),
                cfg.effective_storage_path()?,
                cfg.storage.clone(),
            )
        };

        let storage = LocalStorage::open(&storage_path, &storage_config)?;
        let client = ApiClient::new(&backend_config)?.with_storage(storage.clone())?;
        info!("connected to {}", client.endpoint());

        Ok(Self::new(config, Arc::new(client), storage).await)
    }

    /// The backend shared by all services.
    pub fn backend(&self) -> Arc<dyn Backend> {
        self.backend.clone()
    }

    fn services_mut(&mut self) -> [&mut dyn Service; 4] {
        [&mut self.media, &mut self.users, &mut self.posts, &mut self.saves]
    }

    fn services(&self) -> [&dyn Service; 4] {
        [&self.media, &self.users, &self.posts, &self.saves]
    }

    /// Initialize all services in order.
    pub fn init_all(&mut self) -> SgResult<()> {
        for svc in self.services_mut() {
            let name = svc.name().to_string();
            if let Err(e) = svc.init() {
                error!("failed to initialize service {name}: {e}");
                return Err(SgError::ServiceInit(format!("{name}: {e}")));
            }
        }
        info!("all services initialized");
        Ok(())
    }

    /// Shut down all services in reverse order.
    pub fn shutdown_all(&mut self) -> SgResult<()> {
        for svc in self.services_mut().into_iter().rev() {
            if let Err(e) = svc.shutdown() {
                // Continue shutting down the others
                error!("error shutting down service {}: {e}", svc.name());
            }
        }
        info!("all services shut down");
        Ok(())
    }

    /// Name, state and health of every service.
    pub fn health_check(&self) -> Vec<(String, ServiceState, bool)> {
        self.services()
            .iter()
            .map(|svc| (svc.name().to_string(), svc.state(), svc.is_healthy()))
            .collect()
    }

    /// Number of registered services.
    pub fn service_count(&self) -> usize {
        self.services().len()
    }
}
