//! Typed event bus for auth and content changes.
//!
//! Uses a tokio broadcast channel so the auth context and the wrapper
//! services can announce state changes without knowing who is listening.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Application-level events.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// No stored session marker; the front end should show sign-in.
    SignInRequired,
    /// The auth context resolved.
    AuthStateChanged {
        is_authenticated: bool,
        user_id: String,
    },
    /// A session was created.
    SignedIn {
        session_id: String,
    },
    /// The current session was deleted.
    SignedOut,
    /// A user document was created or updated.
    UserUpdated {
        user_id: String,
    },
    /// A post was created or updated (including likes).
    PostUpdated {
        post_id: String,
    },
    /// A post was deleted.
    PostDeleted {
        post_id: String,
    },
    /// A post was saved by a user.
    PostSaved {
        save_id: String,
        post_id: String,
    },
    /// A save record was deleted.
    SaveDeleted {
        save_id: String,
    },
    /// A file was uploaded to storage.
    FileUploaded {
        file_id: String,
    },
    /// A file was deleted from storage.
    FileDeleted {
        file_id: String,
    },
}

/// Application-wide event bus backed by a tokio broadcast channel.
///
/// Every subscriber gets every event. Subscribers that fall behind receive
/// `Lagged` and miss events.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<AppEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to receive application events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: AppEvent) {
        let label = event_label(&event);
        match self.sender.send(event) {
            Ok(count) => {
                debug!("event_bus: emitted {label} to {count} subscriber(s)");
            }
            Err(_) => {
                debug!("event_bus: no subscribers for {label}");
            }
        }
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Human-readable label for an event (for logging).
fn event_label(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::SignInRequired => "SignInRequired",
        AppEvent::AuthStateChanged { .. } => "AuthStateChanged",
        AppEvent::SignedIn { .. } => "SignedIn",
        AppEvent::SignedOut => "SignedOut",
        AppEvent::UserUpdated { .. } => "UserUpdated",
        AppEvent::PostUpdated { .. } => "PostUpdated",
        AppEvent::PostDeleted { .. } => "PostDeleted",
        AppEvent::PostSaved { .. } => "PostSaved",
        AppEvent::SaveDeleted { .. } => "SaveDeleted",
        AppEvent::FileUploaded { .. } => "FileUploaded",
        AppEvent::FileDeleted { .. } => "FileDeleted",
    }
}
