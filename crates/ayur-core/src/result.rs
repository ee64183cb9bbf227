//! Result type alias and helpers for the swallow-and-log handling screens use

use crate::error::PortalError;

/// Standard Result type for portal operations
pub type PortalResult<T> = Result<T, PortalError>;

/// Log a failure and keep going
pub trait LogFailure<T> {
    /// Log the error under `context` and turn the result into an Option
    fn log_failure(self, context: &str) -> Option<T>;
}

impl<T> LogFailure<T> for PortalResult<T> {
    fn log_failure(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(
                    context,
                    code = err.error_code(),
                    error = %err,
                    "portal call failed"
                );
                None
            }
        }
    }
}
