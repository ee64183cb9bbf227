//! Core error types for the AyurSutra portal
//!
//! Screens treat every failure the same way (log, one generic toast), but the
//! error still records what actually went wrong so logs stay useful.

use std::collections::HashMap;
use thiserror::Error;

/// Message shown to the user for any failed call
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Core error type for all portal operations
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Not found: {resource} with id={id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation errors collection for write forms
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, field_messages) in fields {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in err.field_errors() {
            for e in field_errors {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                errors.add(field.to_string(), message);
            }
        }
        errors
    }
}

impl From<validator::ValidationErrors> for PortalError {
    fn from(err: validator::ValidationErrors) -> Self {
        PortalError::Validation(err.into())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Decode(err.to_string())
    }
}

impl PortalError {
    /// HTTP status behind this error, when one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PortalError::Http { status, .. } => Some(*status),
            PortalError::NotFound { .. } => Some(404),
            PortalError::Unauthorized { .. } => Some(401),
            PortalError::Forbidden { .. } => Some(403),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::NotFound { .. } => "not_found",
            PortalError::Unauthorized { .. } => "unauthorized",
            PortalError::Forbidden { .. } => "forbidden",
            PortalError::Validation(_) => "validation_failed",
            PortalError::Http { .. } => "http_error",
            PortalError::Network(_) => "network_error",
            PortalError::Decode(_) => "decode_error",
            PortalError::Session(_) => "session_error",
            PortalError::Config(_) => "configuration_error",
            PortalError::Internal(_) => "internal_error",
        }
    }

    /// Build an error from a non-2xx status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => PortalError::Unauthorized { message },
            403 => PortalError::Forbidden { message },
            _ => PortalError::Http { status, message },
        }
    }

    /// Whether the failure happened before any response arrived
    pub fn is_transport(&self) -> bool {
        matches!(self, PortalError::Network(_))
    }

    /// Text for a toast. Form validation is the one case worth showing verbatim.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::Validation(errors) => errors.full_messages().join(", "),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
