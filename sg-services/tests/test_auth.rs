//! Integration tests for the authentication context.
//!
//! Tests the session-marker pre-check on mount, resolution to the
//! authenticated or anonymous state, re-checking after sign-in, the manual
//! setters, and the events broadcast along the way.

mod common;

use sg_core::constants;
use sg_models::UserProfile;
use sg_services::{AppEvent, AuthState};
use tokio::sync::broadcast::error::TryRecvError;

// ---- mount ----

#[tokio::test]
async fn mount_without_marker_requires_sign_in_and_resolves_anonymous() {
    let (registry, _backend) = common::create_test_registry().await;
    let mut rx = registry.event_bus.subscribe();

    assert!(registry.auth.is_loading().await);
    let authenticated = registry.auth.mount().await;

    assert!(!authenticated);
    assert!(matches!(rx.recv().await.unwrap(), AppEvent::SignInRequired));
    match rx.recv().await.unwrap() {
        AppEvent::AuthStateChanged { is_authenticated, user_id } => {
            assert!(!is_authenticated);
            assert!(user_id.is_empty());
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(registry.auth.state().await, AuthState::Anonymous);
    assert_eq!(registry.auth.user().await, UserProfile::default());
    assert!(!registry.auth.is_authenticated().await);
    assert!(!registry.auth.is_loading().await);
}

#[tokio::test]
async fn mount_with_empty_list_marker_requires_sign_in() {
    let (registry, _backend) = common::create_test_registry().await;
    registry
        .storage
        .set(constants::COOKIE_FALLBACK_KEY, constants::EMPTY_COOKIE_FALLBACK)
        .unwrap();
    let mut rx = registry.event_bus.subscribe();

    registry.auth.mount().await;

    assert!(matches!(rx.recv().await.unwrap(), AppEvent::SignInRequired));
}

#[tokio::test]
async fn mount_with_session_resolves_profile() {
    let (registry, backend) = common::create_test_registry().await;
    registry
        .storage
        .set(constants::COOKIE_FALLBACK_KEY, r#"{"a_session_mock":"token"}"#)
        .unwrap();
    backend.sign_in_as("acc1", "Ada", "ada@example.com");
    common::seed_user(&backend, "u1", "acc1", "Ada");
    let mut rx = registry.event_bus.subscribe();

    assert!(registry.auth.mount().await);

    match rx.recv().await.unwrap() {
        AppEvent::AuthStateChanged { is_authenticated, user_id } => {
            assert!(is_authenticated);
            assert_eq!(user_id, "u1");
        }
        other => panic!("marker present, expected no sign-in prompt, got {other:?}"),
    }
    assert_eq!(registry.auth.user().await, common::seeded_profile("u1", "Ada"));
    assert!(registry.auth.is_authenticated().await);
}

#[tokio::test]
async fn marker_present_but_session_gone_resolves_anonymous() {
    let (registry, _backend) = common::create_test_registry().await;
    registry
        .storage
        .set(constants::COOKIE_FALLBACK_KEY, r#"{"a_session_mock":"stale"}"#)
        .unwrap();

    assert!(!registry.auth.mount().await);
    assert_eq!(registry.auth.state().await, AuthState::Anonymous);
}

// ---- check_auth_user ----

#[tokio::test]
async fn account_without_profile_resolves_anonymous() {
    let (registry, backend) = common::create_test_registry().await;
    backend.sign_in_as("acc1", "Ada", "ada@example.com");

    assert!(!registry.auth.check_auth_user().await);
    assert_eq!(registry.auth.user().await, UserProfile::default());
    assert!(registry.users.get_current_user().await.is_none());
}

#[tokio::test]
async fn check_is_reentrant_after_sign_in() {
    let (registry, backend) = common::create_test_registry().await;
    let account = backend.sign_in_as("acc1", "Ada", "ada@example.com");
    common::seed_user(&backend, "u1", "acc1", "Ada");
    registry.users.sign_out_account().await.unwrap();

    assert!(!registry.auth.mount().await);

    registry
        .users
        .sign_in_account(&account.email, "password")
        .await
        .unwrap();
    assert!(registry.auth.check_auth_user().await);
    assert_eq!(registry.auth.user().await.id, "u1");

    registry.users.sign_out_account().await.unwrap();
    assert!(!registry.auth.check_auth_user().await);
    assert_eq!(registry.auth.state().await, AuthState::Anonymous);
}

#[tokio::test]
async fn clones_share_state() {
    let (registry, backend) = common::create_test_registry().await;
    backend.sign_in_as("acc1", "Ada", "ada@example.com");
    common::seed_user(&backend, "u1", "acc1", "Ada");

    let handle = registry.auth.clone();
    handle.check_auth_user().await;

    assert!(registry.auth.is_authenticated().await);
}

// ---- setters ----

#[tokio::test]
async fn set_user_updates_authenticated_profile() {
    let (registry, backend) = common::create_test_registry().await;
    backend.sign_in_as("acc1", "Ada", "ada@example.com");
    common::seed_user(&backend, "u1", "acc1", "Ada");
    registry.auth.check_auth_user().await;

    let mut edited = registry.auth.user().await;
    edited.bio = "Analyst".into();
    registry.auth.set_user(edited.clone()).await;

    assert_eq!(registry.auth.user().await, edited);
}

#[tokio::test]
async fn local_sign_out_via_setters() {
    let (registry, backend) = common::create_test_registry().await;
    backend.sign_in_as("acc1", "Ada", "ada@example.com");
    common::seed_user(&backend, "u1", "acc1", "Ada");
    registry.auth.check_auth_user().await;
    let mut rx = registry.event_bus.subscribe();

    registry.auth.set_user(UserProfile::default()).await;
    registry.auth.set_is_authenticated(false).await;

    assert!(!registry.auth.is_authenticated().await);
    assert_eq!(registry.auth.user().await, UserProfile::default());
    assert!(matches!(
        rx.recv().await.unwrap(),
        AppEvent::AuthStateChanged { is_authenticated: false, .. }
    ));
}

#[tokio::test]
async fn staged_profile_adopted_when_authenticated() {
    let (registry, _backend) = common::create_test_registry().await;
    registry.auth.mount().await;

    let profile = common::seeded_profile("u9", "Grace");
    registry.auth.set_user(profile.clone()).await;
    assert_eq!(registry.auth.user().await, UserProfile::default());

    registry.auth.set_is_authenticated(true).await;
    assert_eq!(registry.auth.user().await, profile);
    assert_eq!(registry.auth.state().await, AuthState::Authenticated(profile));
}

#[tokio::test]
async fn set_authenticated_twice_emits_once() {
    let (registry, _backend) = common::create_test_registry().await;
    let mut rx = registry.event_bus.subscribe();

    registry.auth.set_is_authenticated(true).await;
    registry.auth.set_is_authenticated(true).await;

    assert!(matches!(
        rx.recv().await.unwrap(),
        AppEvent::AuthStateChanged { is_authenticated: true, .. }
    ));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}
