//! Practitioner verification screen (`/admin/practitioners`)
//!
//! The one screen that keeps working without a backend: when the list cannot
//! be fetched it serves the seeded practitioners instead, filtered and paged
//! the same way.

use std::sync::Arc;
use std::time::Duration;

use validator::Validate;

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_core::PortalError;
use ayur_models::{Practitioner, StatusChange, VerificationDecision, VerificationStatus};

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;
use crate::source::MockListSource;

pub struct PractitionerManagement {
    list: ListManager<Practitioner>,
}

impl PractitionerManagement {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
        }
    }

    /// Serve seeded practitioners, after `delay`, whenever the backend fails
    pub fn with_mock_fallback(mut self, delay: Duration) -> Self {
        self.list = self
            .list
            .with_fallback(Arc::new(MockListSource::<Practitioner>::seeded(delay)));
        self
    }

    pub fn list(&self) -> &ListManager<Practitioner> {
        &self.list
    }

    /// Open the review panel (documents, education, notes)
    pub async fn view(&self, id: &str) -> Option<Practitioner> {
        self.list.select(id).await
    }

    pub async fn review_verification(
        &self,
        id: &str,
        decision: &VerificationDecision,
    ) -> ServiceResult<()> {
        if let Err(errors) = decision.validate() {
            return self.list.reject(&errors.into());
        }
        if decision.status == VerificationStatus::Rejected
            && decision.notes.as_deref().map_or(true, |n| n.trim().is_empty())
        {
            let mut errors = ayur_core::ValidationErrors::new();
            errors.add("notes", "must explain the rejection");
            return self.list.reject(&PortalError::Validation(errors));
        }

        let message = match decision.status {
            VerificationStatus::Verified => "Practitioner verified",
            VerificationStatus::Rejected => "Practitioner rejected",
            VerificationStatus::UnderReview => "Practitioner moved to review",
            VerificationStatus::Pending => "Practitioner returned to pending",
        };
        let result = self
            .list
            .patch(admin::practitioner_verification(id), decision, message)
            .await;
        if result.is_success() {
            self.list.close_detail();
        }
        result
    }

    pub async fn approve(&self, id: &str) -> ServiceResult<()> {
        self.review_verification(id, &VerificationDecision::approve())
            .await
    }

    pub async fn reject(&self, id: &str, reason: impl Into<String>) -> ServiceResult<()> {
        self.review_verification(id, &VerificationDecision::reject(reason))
            .await
    }

    pub async fn toggle_active(&self, id: &str) -> ServiceResult<()> {
        let Some(practitioner) = self.list.find(id) else {
            return self.list.reject(&PortalError::NotFound {
                resource: "Practitioner",
                id: id.to_string(),
            });
        };
        let change = StatusChange {
            is_active: !practitioner.is_active,
        };
        let message = if change.is_active {
            "Practitioner activated"
        } else {
            "Practitioner deactivated"
        };
        self.list
            .patch(admin::practitioner_status(id), &change, message)
            .await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.list.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{NoticeLevel, RecordingNotifier};
    use crate::source::Origin;
    use crate::testing::{backend_client, page_response, MockBackend};
    use ayur_client::{ApiResponse, Method};
    use ayur_mock::mock_practitioners;
    use ayur_queries::Choice;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_toggle_active_patches_then_refetches() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = fetches.clone();
        let practitioners = mock_practitioners();
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| r.method == Method::Get && r.path == "/admin/practitioners")
            .returning(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(page_response(&practitioners, 5))
            });
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Patch
                    && r.path == "/admin/practitioners/1/status"
                    && r.body == Some(json!({"isActive": false}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));

        let screen = PractitionerManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        screen.list().refresh().await;
        assert!(screen.toggle_active("1").await.is_success());
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_offline_list_uses_seeded_practitioners() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .returning(|_| Err(PortalError::Network("connection refused".into())));

        let notifier = RecordingNotifier::new();
        let screen = PractitionerManagement::new(
            backend_client(backend),
            Arc::new(notifier.clone()),
            10,
        )
        .with_mock_fallback(Duration::ZERO);

        screen
            .list()
            .update_filter(|f| f.verification_status = Choice::Only(VerificationStatus::Verified))
            .await;

        assert_eq!(screen.list().origin(), Origin::Mock);
        assert_eq!(screen.list().total(), 2);
        assert!(screen.list().records().iter().all(|p| p.is_verified()));
        assert_eq!(notifier.count(NoticeLevel::Error), 0);
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let mut backend = MockBackend::new();
        backend.expect_send().times(0);

        let screen = PractitionerManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        let result = screen.reject("5", "  ").await;
        assert!(result.errors().has_error("notes"));
    }

    #[tokio::test]
    async fn test_approve_sends_decision() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Patch
                    && r.path == "/admin/practitioners/2/verification"
                    && r.body == Some(json!({"status": "verified"}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));
        backend
            .expect_send()
            .withf(|r| r.method == Method::Get)
            .returning(|_| Ok(page_response::<Practitioner>(&[], 0)));

        let screen = PractitionerManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        let result = screen.approve("2").await;
        assert_eq!(result.message(), Some("Practitioner verified"));
    }
}
