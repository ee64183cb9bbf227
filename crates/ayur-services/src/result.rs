//! Service Result type
//!
//! Outcome of a screen action (create, toggle, approve, ...). Failures carry
//! validation errors for form fields or a single base message.

use ayur_core::error::ValidationErrors;
use ayur_core::PortalError;
use std::fmt;

/// Represents the result of a service call
#[derive(Debug, Clone)]
pub struct ServiceResult<T> {
    /// Whether the service call was successful
    success: bool,
    /// The result of the service call
    result: Option<T>,
    /// Errors from the service call
    errors: ValidationErrors,
    /// Message for display
    message: Option<String>,
}

impl<T> ServiceResult<T> {
    /// Create a successful service result
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
            message: None,
        }
    }

    /// Create a successful service result with a message
    pub fn success_with_message(result: T, message: impl Into<String>) -> Self {
        Self::success(result).with_message(message)
    }

    /// Create a failed service result
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
            message: None,
        }
    }

    /// Create a failed service result with a base error
    pub fn failure_with_base_error(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        Self::failure(errors)
    }

    /// Failure carrying what a user should see for `error`
    pub fn from_error(error: &PortalError) -> Self {
        match error {
            PortalError::Validation(errors) => Self::failure(errors.clone()),
            other => Self::failure_with_base_error(other.user_message()),
        }
    }

    /// Check if the service call was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Check if the service call failed
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Get the result (if successful)
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Get the errors
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Get the message
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Full error messages
    pub fn full_messages(&self) -> Vec<String> {
        self.errors.full_messages()
    }

    /// Map the result if successful
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
            message: self.message,
        }
    }
}

impl<T> From<ServiceResult<T>> for Result<T, ValidationErrors> {
    fn from(result: ServiceResult<T>) -> Self {
        if result.success {
            result.result.ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add_base("Service succeeded but no result was returned");
                errors
            })
        } else {
            Err(result.errors)
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServiceResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            match (&self.message, &self.result) {
                (Some(message), _) => write!(f, "{message}"),
                (None, Some(result)) => write!(f, "Success: {result}"),
                (None, None) => write!(f, "Success"),
            }
        } else {
            write!(f, "Failure: {}", self.errors.full_messages().join(", "))
        }
    }
}
