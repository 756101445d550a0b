//! Authentication context.
//!
//! Tracks who is signed in for the front end. The context is a cloneable
//! handle; every clone sees the same state.
//!
//! ```text
//! Uninitialized ──check──▶ Checking ──profile found──▶ Authenticated(profile)
//!                             ▲     └─otherwise──────▶ Anonymous
//!                             └──────── check again ◀───────┘
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use sg_core::constants;
use sg_models::{LocalStorage, UserProfile};

use crate::event_bus::{AppEvent, EventBus};
use crate::user::UserService;

/// Where the auth check stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing checked yet.
    Uninitialized,
    /// A check is in flight.
    Checking,
    /// Signed in with this profile.
    Authenticated(UserProfile),
    /// No session or no profile.
    Anonymous,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Uninitialized | AuthState::Checking)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

struct AuthInner {
    state: AuthState,
    /// Profile set while not authenticated; adopted by `set_is_authenticated(true)`.
    staged: UserProfile,
}

/// Shared authentication state plus the operations that change it.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<RwLock<AuthInner>>,
    users: UserService,
    storage: LocalStorage,
    event_bus: EventBus,
}

/// Whether a stored session marker means "certainly signed out".
pub fn sign_in_required(marker: Option<&str>) -> bool {
    match marker {
        None => true,
        Some(value) => value == constants::EMPTY_COOKIE_FALLBACK,
    }
}

impl AuthContext {
    pub fn new(users: UserService, storage: LocalStorage, event_bus: EventBus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AuthInner {
                state: AuthState::Uninitialized,
                staged: UserProfile::default(),
            })),
            users,
            storage,
            event_bus,
        }
    }

    /// Start-up: inspect the session marker, then check with the backend.
    ///
    /// An absent or empty marker emits `SignInRequired`. The backend check
    /// runs either way.
    pub async fn mount(&self) -> bool {
        let marker = match self.storage.get(constants::COOKIE_FALLBACK_KEY) {
            Ok(marker) => marker,
            Err(e) => {
                warn!("could not read session marker: {e}");
                None
            }
        };

        if sign_in_required(marker.as_deref()) {
            info!("no stored session, sign-in required");
            self.event_bus.emit(AppEvent::SignInRequired);
        }

        self.check_auth_user().await
    }

    /// Ask the backend who is signed in and resolve the state accordingly.
    ///
    /// Returns whether a signed-in profile was found.
    pub async fn check_auth_user(&self) -> bool {
        {
            let mut inner = self.inner.write().await;
            inner.state = AuthState::Checking;
        }
        debug!("checking current user");

        let resolved = match self.users.try_get_current_user().await {
            Ok(doc) => AuthState::Authenticated(UserProfile::from(&doc)),
            Err(e) => {
                debug!("auth check found no user: {e}");
                AuthState::Anonymous
            }
        };

        let authenticated = resolved.is_authenticated();
        self.resolve(resolved).await;
        authenticated
    }

    /// Current profile; the default profile unless authenticated.
    pub async fn user(&self) -> UserProfile {
        match &self.inner.read().await.state {
            AuthState::Authenticated(profile) => profile.clone(),
            _ => UserProfile::default(),
        }
    }

    pub async fn state(&self) -> AuthState {
        self.inner.read().await.state.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.state.is_loading()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.state.is_authenticated()
    }

    /// Replace the profile. While not authenticated the profile is held
    /// until `set_is_authenticated(true)`.
    pub async fn set_user(&self, profile: UserProfile) {
        let mut inner = self.inner.write().await;
        if inner.state.is_authenticated() {
            inner.state = AuthState::Authenticated(profile);
        } else {
            inner.staged = profile;
        }
    }

    /// Force the authenticated flag, e.g. after a local sign-out.
    pub async fn set_is_authenticated(&self, authenticated: bool) {
        let next = {
            let inner = self.inner.read().await;
            match (inner.state.is_authenticated(), authenticated) {
                (true, true) => return,
                (false, true) => AuthState::Authenticated(inner.staged.clone()),
                (_, false) => AuthState::Anonymous,
            }
        };
        self.resolve(next).await;
    }

    async fn resolve(&self, state: AuthState) {
        let user_id = match &state {
            AuthState::Authenticated(profile) => profile.id.clone(),
            _ => String::new(),
        };
        let is_authenticated = state.is_authenticated();
        {
            let mut inner = self.inner.write().await;
            inner.state = state;
            inner.staged = UserProfile::default();
        }
        info!(is_authenticated, user_id = %user_id, "auth state resolved");
        self.event_bus.emit(AppEvent::AuthStateChanged {
            is_authenticated,
            user_id,
        });
    }
}
