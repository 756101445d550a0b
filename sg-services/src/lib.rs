//! Snapgram Services - the wrapper layer over the backend.
//!
//! One service per area, each a thin adapter over one or two backend calls:
//! - Users (registration, sessions, profile lookup and edits)
//! - Posts (create/update with image upload, delete, likes, listings, search)
//! - Saves (bookmarks)
//! - Media (uploads, previews, deletes)
//!
//! Operations come in two shapes. The plain form logs a failure and returns
//! `None`; the `try_` form returns the `SgError`. Signing in only has the
//! second shape.
//!
//! The [`AuthContext`] tracks the signed-in user and announces changes on
//! the [`EventBus`].

pub mod auth;
pub mod event_bus;
pub mod media;
pub mod post;
pub mod registry;
pub mod save;
pub mod service;
pub mod user;

// Re-export key types
pub use auth::{AuthContext, AuthState};
pub use event_bus::{AppEvent, EventBus};
pub use media::MediaService;
pub use post::PostService;
pub use registry::ServiceRegistry;
pub use save::SaveService;
pub use service::{Service, ServiceState};
pub use user::UserService;
