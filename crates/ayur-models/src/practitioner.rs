//! Practitioner record
//!
//! Collection: `/admin/practitioners`
//!
//! A practitioner is a user account plus the onboarding data an admin reviews
//! before the account is verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use ayur_core::traits::{Id, Identifiable, Resource, Timestamped};

use crate::user::default_true;

/// Admin-reviewed onboarding state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    UnderReview,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::UnderReview => "under_review",
        }
    }

    /// Whether an admin still has a decision to make
    pub fn awaiting_decision(&self) -> bool {
        matches!(self, Self::Pending | Self::UnderReview)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

/// Uploaded onboarding document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    pub document_type: String,
    pub url: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: Option<u16>,
}

/// Practitioner account with onboarding details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    #[serde(alias = "_id")]
    pub id: Id,

    pub name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub specialization: String,

    pub license_number: String,

    pub verification_status: VerificationStatus,

    #[serde(default)]
    pub verification_notes: Option<String>,

    #[serde(default)]
    pub rating: f32,

    #[serde(default)]
    pub experience_years: u32,

    #[serde(default)]
    pub consultation_fee: Option<f64>,

    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub education: Vec<Education>,

    #[serde(default)]
    pub certifications: Vec<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for Practitioner {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for Practitioner {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Resource for Practitioner {
    const TYPE_NAME: &'static str = "Practitioner";
    const COLLECTION_PATH: &'static str = "/admin/practitioners";
}

impl Practitioner {
    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    /// Documents the admin has not ticked off yet
    pub fn unverified_documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| !d.verified)
    }
}

/// Body of `PATCH /admin/practitioners/:id/verification`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDecision {
    pub status: VerificationStatus,

    #[validate(length(max = 1000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VerificationDecision {
    pub fn approve() -> Self {
        Self {
            status: VerificationStatus::Verified,
            notes: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Rejected,
            notes: Some(reason.into()),
        }
    }

    pub fn request_review(notes: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::UnderReview,
            notes: Some(notes.into()),
        }
    }
}
