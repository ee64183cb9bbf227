//! Audit log entry
//!
//! Collection: `/admin/audit-logs` (read-only)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use ayur_core::traits::{Id, Identifiable, Resource, Timestamped};

use crate::party::PartyRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    #[serde(alias = "_id")]
    pub id: Id,

    /// Absent for system-initiated events
    #[serde(default)]
    pub actor: Option<PartyRef>,

    /// Dotted action name, e.g. `practitioner.verified`
    pub action: String,

    pub resource_type: String,

    #[serde(default)]
    pub resource_id: Option<Id>,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default)]
    pub details: Option<serde_json::Value>,

    pub timestamp: DateTime<Utc>,
}

impl Identifiable for AuditLog {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for AuditLog {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.timestamp)
    }
}

impl Resource for AuditLog {
    const TYPE_NAME: &'static str = "AuditLog";
    const COLLECTION_PATH: &'static str = "/admin/audit-logs";
}

impl AuditLog {
    pub fn actor_name(&self) -> &str {
        self.actor.as_ref().map_or("system", |a| a.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_entry() {
        let log: AuditLog = serde_json::from_str(
            r#"{"id":"l1","action":"backup.completed","resourceType":"system",
                "timestamp":"2024-03-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(log.actor_name(), "system");
        assert_eq!(log.severity, Severity::Info);
        assert!(Severity::Critical > Severity::Warning);
    }
}
