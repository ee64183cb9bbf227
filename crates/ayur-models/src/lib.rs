//! # ayur-models
//!
//! Records the portal exchanges with the backend.
//!
//! Every record is a transient copy: fetched into a screen, displayed, optionally
//! edited through a form bound to its fields, and dropped on navigation.
//! Each implements the core traits from `ayur-core` (Identifiable, Resource).

pub use ayur_core::traits::{Id, Identifiable, Resource, Timestamped};

pub mod appointment;
pub mod audit_log;
pub mod content;
pub mod dashboard;
pub mod notification;
pub mod party;
pub mod patient;
pub mod practitioner;
pub mod transaction;
pub mod user;

// Re-exports for convenience
pub use appointment::{
    Appointment, AppointmentStatus, AppointmentType, CancelAppointment, PaymentStatus, Review,
};
pub use audit_log::{AuditLog, Severity};
pub use content::{Content, ContentStatus, ContentStatusChange, ContentType, NewContent, UpdateContent};
pub use dashboard::DashboardStats;
pub use notification::{Audience, NewNotification, Notification, NotificationType};
pub use party::PartyRef;
pub use patient::{EmergencyContact, MedicalHistory, Patient};
pub use practitioner::{
    Document, Education, Practitioner, VerificationDecision, VerificationStatus,
};
pub use transaction::{RevenueSummary, Transaction, TransactionStatus, TransactionType};
pub use user::{NewUser, Role, StatusChange, UpdateUser, User};

/// Parse a wire label (`"under_review"`, `"no-show"`, …) into its enum
pub fn parse_label<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.trim().to_string()))
        .map_err(|_| format!("unknown value: {s}"))
}
