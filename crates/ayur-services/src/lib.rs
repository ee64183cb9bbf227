//! # ayur-services
//!
//! Screen services for the AyurSutra portal.
//!
//! Every list screen is one generic [`ListManager`] over a record type plus a
//! thin wrapper naming that screen's actions. [`Portal`] wires them to a
//! configuration and session and gates each behind its portal area.

pub mod appointments;
pub mod audit_logs;
pub mod base;
pub mod content;
pub mod dashboard;
pub mod notifications;
pub mod notifier;
pub mod patients;
pub mod portal;
pub mod practitioners;
pub mod result;
pub mod revenue;
pub mod source;
pub mod users;

pub use appointments::{AppointmentManagement, PatientAppointments};
pub use audit_logs::AuditLogs;
pub use base::{ListManager, ListState};
pub use content::ContentManagement;
pub use dashboard::Dashboard;
pub use notifications::NotificationCenter;
pub use notifier::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use patients::PatientManagement;
pub use portal::Portal;
pub use practitioners::PractitionerManagement;
pub use result::ServiceResult;
pub use revenue::RevenueManagement;
pub use source::{ApiListSource, ListSource, MockListSource, Origin};
pub use users::UserManagement;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde::Serialize;

    use ayur_client::{ApiClient, ApiRequest, ApiResponse, Transport};
    use ayur_core::PortalResult;

    mockall::mock! {
        pub Backend {}

        #[async_trait]
        impl Transport for Backend {
            async fn send(&self, request: ApiRequest) -> PortalResult<ApiResponse>;
        }
    }

    pub fn backend_client(backend: MockBackend) -> ApiClient {
        ApiClient::new(Arc::new(backend))
    }

    /// `{ data, total }` response holding `records`
    pub fn page_response<T: Serialize>(records: &[T], total: u64) -> ApiResponse {
        ApiResponse::json(
            200,
            &serde_json::json!({ "data": records, "total": total }),
        )
    }
}
