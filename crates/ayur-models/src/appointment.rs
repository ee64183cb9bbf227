//! Appointment record
//!
//! Collection: `/admin/appointments` (admin) and `/patient/appointments` (patient portal)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use ayur_core::traits::{Id, Identifiable, Resource, Timestamped};

use crate::party::PartyRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }

    /// Statuses an admin can move an appointment to from here
    pub fn next_statuses(&self) -> &'static [AppointmentStatus] {
        match self {
            Self::Scheduled => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::InProgress, Self::Cancelled, Self::NoShow],
            Self::InProgress => &[Self::Completed],
            Self::Completed | Self::Cancelled | Self::NoShow => &[],
        }
    }

    pub fn is_final(&self) -> bool {
        self.next_statuses().is_empty()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    Consultation,
    Therapy,
    FollowUp,
    Panchakarma,
}

impl AppointmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consultation => "consultation",
            Self::Therapy => "therapy",
            Self::FollowUp => "follow-up",
            Self::Panchakarma => "panchakarma",
        }
    }
}

impl FromStr for AppointmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }
}

/// Patient feedback on a completed appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,

    #[validate(length(max = 1000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body of a cancel request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointment {
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(alias = "_id")]
    pub id: Id,

    pub patient: PartyRef,

    pub practitioner: PartyRef,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,

    pub status: AppointmentStatus,

    #[serde(default)]
    pub fee: f64,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub cancellation_reason: Option<String>,

    #[serde(default)]
    pub review: Option<Review>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for Appointment {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for Appointment {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Resource for Appointment {
    const TYPE_NAME: &'static str = "Appointment";
    const COLLECTION_PATH: &'static str = "/admin/appointments";
}

impl Appointment {
    /// Calendar day the appointment starts on
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Patients may cancel until the session starts
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self.status,
            AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
        )
    }

    pub fn is_reviewable(&self) -> bool {
        self.status == AppointmentStatus::Completed && self.review.is_none()
    }
}
