//! Patient record
//!
//! Collection: `/admin/patients`

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ayur_core::traits::{Id, Identifiable, Resource, Timestamped};

use crate::user::default_true;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl MedicalHistory {
    pub fn is_empty(&self) -> bool {
        self.allergies.is_empty() && self.conditions.is_empty() && self.medications.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub relationship: Option<String>,
}

/// Patient account with clinical profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(alias = "_id")]
    pub id: Id,

    pub name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub medical_history: MedicalHistory,

    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for Patient {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for Patient {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Resource for Patient {
    const TYPE_NAME: &'static str = "Patient";
    const COLLECTION_PATH: &'static str = "/admin/patients";
}

impl Patient {
    /// Age in whole years on `today`
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.date_of_birth?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}
