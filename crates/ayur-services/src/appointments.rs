//! Appointment screens
//!
//! Admins walk appointments through their lifecycle from
//! `/admin/appointments`; patients see their own bookings at
//! `/patient/appointments` and may cancel or review them.

use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use ayur_client::endpoints::{admin, patient};
use ayur_client::ApiClient;
use ayur_core::{PortalError, ValidationErrors};
use ayur_models::{Appointment, AppointmentStatus, CancelAppointment, Review};

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate {
    status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

fn base_error(message: String) -> PortalError {
    let mut errors = ValidationErrors::new();
    errors.add_base(message);
    PortalError::Validation(errors)
}

pub struct AppointmentManagement {
    list: ListManager<Appointment>,
}

impl AppointmentManagement {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
        }
    }

    pub fn list(&self) -> &ListManager<Appointment> {
        &self.list
    }

    pub async fn view(&self, id: &str) -> Option<Appointment> {
        self.list.select(id).await
    }

    /// Move a listed appointment to `next`
    ///
    /// Transitions the current status does not offer are refused locally.
    pub async fn transition(
        &self,
        id: &str,
        next: AppointmentStatus,
        reason: Option<String>,
    ) -> ServiceResult<()> {
        if let Some(current) = self.list.find(id).map(|a| a.status) {
            if !current.next_statuses().contains(&next) {
                return self.list.reject(&base_error(format!(
                    "appointment cannot move from {current} to {next}"
                )));
            }
        }

        let update = StatusUpdate {
            status: next,
            reason: reason.filter(|r| !r.trim().is_empty()),
        };
        self.list
            .patch(
                admin::appointment_status(id),
                &update,
                format!("Appointment marked {next}"),
            )
            .await
    }

    pub async fn confirm(&self, id: &str) -> ServiceResult<()> {
        self.transition(id, AppointmentStatus::Confirmed, None).await
    }

    pub async fn start(&self, id: &str) -> ServiceResult<()> {
        self.transition(id, AppointmentStatus::InProgress, None).await
    }

    pub async fn complete(&self, id: &str) -> ServiceResult<()> {
        self.transition(id, AppointmentStatus::Completed, None).await
    }

    pub async fn cancel(&self, id: &str, reason: impl Into<String>) -> ServiceResult<()> {
        self.transition(id, AppointmentStatus::Cancelled, Some(reason.into()))
            .await
    }

    pub async fn mark_no_show(&self, id: &str) -> ServiceResult<()> {
        self.transition(id, AppointmentStatus::NoShow, None).await
    }
}

/// The signed-in patient's own appointments
pub struct PatientAppointments {
    list: ListManager<Appointment>,
}

impl PatientAppointments {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::at_path(client, notifier, patient::APPOINTMENTS, page_size),
        }
    }

    pub fn list(&self) -> &ListManager<Appointment> {
        &self.list
    }

    pub async fn cancel(&self, id: &str, request: &CancelAppointment) -> ServiceResult<()> {
        if let Err(errors) = request.validate() {
            return self.list.reject(&errors.into());
        }
        if let Some(appointment) = self.list.find(id) {
            if !appointment.is_cancellable() {
                return self.list.reject(&base_error(format!(
                    "a {} appointment can no longer be cancelled",
                    appointment.status
                )));
            }
        }
        self.list
            .patch(
                patient::cancel_appointment(id),
                request,
                "Appointment cancelled",
            )
            .await
    }

    /// Leave a review for a completed appointment
    pub async fn review(&self, id: &str, review: &Review) -> ServiceResult<()> {
        if let Err(errors) = review.validate() {
            return self.list.reject(&errors.into());
        }
        if let Some(appointment) = self.list.find(id) {
            if !appointment.is_reviewable() {
                return self.list.reject(&base_error(
                    "only completed appointments without a review can be reviewed".into(),
                ));
            }
        }
        self.list
            .post(
                patient::review_appointment(id),
                review,
                "Thank you for your review",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{NoticeLevel, RecordingNotifier};
    use crate::testing::{backend_client, page_response, MockBackend};
    use ayur_client::{ApiResponse, Method};
    use ayur_mock::mock_appointments;
    use serde_json::json;

    fn admin_screen(backend: MockBackend) -> (AppointmentManagement, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let screen =
            AppointmentManagement::new(backend_client(backend), Arc::new(notifier.clone()), 10);
        (screen, notifier)
    }

    fn listing(backend: &mut MockBackend, path: &'static str) {
        let appointments = mock_appointments();
        backend
            .expect_send()
            .withf(move |r| r.method == Method::Get && r.path == path)
            .returning(move |_| Ok(page_response(&appointments, 6)));
    }

    #[tokio::test]
    async fn test_cancel_sends_reason() {
        let mut backend = MockBackend::new();
        listing(&mut backend, "/admin/appointments");
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Patch
                    && r.path == "/admin/appointments/a1/status"
                    && r.body == Some(json!({"status": "cancelled", "reason": "Clinic closed"}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));

        let (screen, _) = admin_screen(backend);
        screen.list().refresh().await;
        assert!(screen.cancel("a1", "Clinic closed").await.is_success());
    }

    #[tokio::test]
    async fn test_illegal_transition_is_refused() {
        let mut backend = MockBackend::new();
        listing(&mut backend, "/admin/appointments");
        backend
            .expect_send()
            .withf(|r| r.method == Method::Patch)
            .times(0);

        let (screen, notifier) = admin_screen(backend);
        screen.list().refresh().await;

        // a3 is already completed
        let result = screen.start("a3").await;
        assert!(result.is_failure());
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_patient_cancel_uses_patient_endpoint() {
        let mut backend = MockBackend::new();
        listing(&mut backend, "/patient/appointments");
        backend
            .expect_send()
            .withf(|r| r.method == Method::Patch && r.path == "/patient/appointments/a1/cancel")
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));

        let screen = PatientAppointments::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        screen.list().refresh().await;
        let request = CancelAppointment {
            reason: Some("Travelling".into()),
        };
        assert!(screen.cancel("a1", &request).await.is_success());
    }

    #[tokio::test]
    async fn test_review_only_for_completed() {
        let mut backend = MockBackend::new();
        listing(&mut backend, "/patient/appointments");
        backend
            .expect_send()
            .withf(|r| r.method == Method::Post)
            .times(0);

        let screen = PatientAppointments::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        screen.list().refresh().await;

        let review = Review {
            rating: 4,
            comment: None,
        };
        // a1 is still scheduled, a3 already has a review
        assert!(screen.review("a1", &review).await.is_failure());
        assert!(screen.review("a3", &review).await.is_failure());
        let out_of_range = Review {
            rating: 6,
            comment: None,
        };
        assert!(screen
            .review("a3", &out_of_range)
            .await
            .errors()
            .has_error("rating"));
    }
}
