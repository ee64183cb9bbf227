//! Patient management screen (`/admin/patients`)

use std::sync::Arc;

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_core::PortalError;
use ayur_models::{Patient, StatusChange};

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;

pub struct PatientManagement {
    list: ListManager<Patient>,
}

impl PatientManagement {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
        }
    }

    pub fn list(&self) -> &ListManager<Patient> {
        &self.list
    }

    /// Open the detail view (medical history, emergency contact)
    pub async fn view(&self, id: &str) -> Option<Patient> {
        self.list.select(id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ServiceResult<()> {
        let Some(patient) = self.list.find(id) else {
            return self.list.reject(&PortalError::NotFound {
                resource: "Patient",
                id: id.to_string(),
            });
        };
        let change = StatusChange {
            is_active: !patient.is_active,
        };
        let message = if change.is_active {
            "Patient activated"
        } else {
            "Patient deactivated"
        };
        self.list
            .patch(admin::patient_status(id), &change, message)
            .await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.list.delete(id).await
    }
}
