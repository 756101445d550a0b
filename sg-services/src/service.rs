//! Service trait and lifecycle state.
//!
//! Every wrapper service implements `Service` so the registry can bring
//! them up and down together and report their health.

use sg_core::error::SgResult;
use tracing::error;

/// Lifecycle state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Created but not initialized.
    Created,
    /// Running and ready for calls.
    Running,
    /// Shut down.
    Stopped,
    /// Initialization failed.
    Failed,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Standard lifecycle and health interface for services.
///
/// Services are initialized in registration order by the `ServiceRegistry`
/// and shut down in reverse.
pub trait Service: Send + Sync {
    /// Human-readable name of this service.
    fn name(&self) -> &str;

    /// Current state of this service.
    fn state(&self) -> ServiceState;

    /// Initialize the service.
    fn init(&mut self) -> SgResult<()>;

    /// Shut the service down.
    fn shutdown(&mut self) -> SgResult<()>;

    /// Returns true if the service is operational.
    fn is_healthy(&self) -> bool {
        self.state() == ServiceState::Running
    }
}

/// Collapse a result into an option, logging the error.
///
/// This is the return shape of the untyped wrapper functions; each has a
/// `try_` twin that keeps the error.
pub(crate) fn ok_or_log<T>(operation: &str, result: SgResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!("{operation} failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestService {
        state: ServiceState,
    }

    impl Service for TestService {
        fn name(&self) -> &str { "test" }
        fn state(&self) -> ServiceState { self.state }
        fn init(&mut self) -> SgResult<()> {
            self.state = ServiceState::Running;
            Ok(())
        }
        fn shutdown(&mut self) -> SgResult<()> {
            self.state = ServiceState::Stopped;
            Ok(())
        }
    }

    #[test]
    fn test_service_lifecycle() {
        let mut svc = TestService { state: ServiceState::Created };
        assert!(!svc.is_healthy());
        svc.init().unwrap();
        assert!(svc.is_healthy());
        svc.shutdown().unwrap();
        assert!(!svc.is_healthy());
        assert_eq!(svc.state().to_string(), "stopped");
    }

    #[test]
    fn test_ok_or_log() {
        assert_eq!(ok_or_log("op", Ok(3)), Some(3));
        let failed: SgResult<u8> = Err(sg_core::error::SgError::NotFound("x".into()));
        assert_eq!(ok_or_log("op", failed), None);
    }
}
