//! Snapgram API - HTTP client for the backend-as-a-service REST API.
//!
//! Covers the four endpoint groups the client uses: account (registration
//! and sessions), databases (document CRUD and listing), storage (file
//! upload, preview, delete) and avatars (initials images). Session state
//! travels as fallback cookies persisted in local storage.
//!
//! Services depend on the [`Backend`] trait rather than on [`ApiClient`]
//! directly, so they can be exercised against an in-memory backend.

pub mod backend;
pub mod client;
pub mod endpoints;
pub mod response;

// Re-export key types
pub use backend::{Backend, Collection};
pub use client::{ApiClient, RetryConfig};
pub use response::BackendError;
pub use reqwest::Url;
