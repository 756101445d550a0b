//! Snapgram Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by all other Snapgram crates:
//! - Application configuration (backend endpoint, project and collection ids)
//! - Global error type with a coarse error-kind taxonomy
//! - Structured logging with tracing
//! - Platform directory lookup
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::{AppConfig, BackendConfig, ConfigHandle};
pub use error::{ErrorKind, SgError, SgResult};
pub use logging::init_logging;
pub use platform::Platform;
