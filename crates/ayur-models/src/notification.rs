//! Notification record
//!
//! Collection: `/admin/notifications`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use ayur_core::traits::{Id, Identifiable, Resource, Timestamped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Appointment,
    Payment,
    Verification,
    Reminder,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Payment => "payment",
            Self::Verification => "verification",
            Self::Reminder => "reminder",
            Self::System => "system",
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

/// Who a notification is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    All,
    Admins,
    Practitioners,
    Patients,
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: Id,

    pub title: String,

    pub message: String,

    #[serde(rename = "type")]
    pub notification_type: NotificationType,

    #[serde(default)]
    pub audience: Audience,

    #[serde(default)]
    pub is_read: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identifiable for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for Notification {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Resource for Notification {
    const TYPE_NAME: &'static str = "Notification";
    const COLLECTION_PATH: &'static str = "/admin/notifications";
}

/// Compose form for a broadcast
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 2000))]
    pub message: String,

    #[serde(rename = "type")]
    pub notification_type: NotificationType,

    pub audience: Audience,
}
