//! Portal entry point
//!
//! Holds the configuration, session and API client, and hands out screen
//! services. Admin screens are only handed to admins; the patient's own
//! appointments only to patients.

use std::sync::Arc;

use ayur_auth::{require_admin, require_area, PortalArea, SessionContext};
use ayur_client::{ApiClient, HttpTransport, Transport};
use ayur_core::config::PortalConfig;
use ayur_core::PortalResult;

use crate::appointments::{AppointmentManagement, PatientAppointments};
use crate::audit_logs::AuditLogs;
use crate::content::ContentManagement;
use crate::dashboard::Dashboard;
use crate::notifications::NotificationCenter;
use crate::notifier::Notifier;
use crate::patients::PatientManagement;
use crate::practitioners::PractitionerManagement;
use crate::revenue::RevenueManagement;
use crate::users::UserManagement;

#[derive(Clone)]
pub struct Portal {
    config: PortalConfig,
    session: SessionContext,
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl Portal {
    /// Portal talking to the configured backend over HTTP
    pub fn new(
        config: PortalConfig,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> PortalResult<Self> {
        let transport = HttpTransport::new(&config.api, session.clone())?;
        Ok(Self::with_transport(config, session, notifier, Arc::new(transport)))
    }

    pub fn with_transport(
        config: PortalConfig,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            session,
            client: ApiClient::new(transport),
            notifier,
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn page_size(&self) -> u32 {
        self.config.listing.page_size
    }

    fn long_page_size(&self) -> u32 {
        self.config.listing.long_page_size
    }

    // ------------------------------------------------------------------
    // Admin area

    pub fn dashboard(&self) -> PortalResult<Dashboard> {
        require_admin(&self.session)?;
        Ok(Dashboard::new(self.client.clone(), self.notifier.clone()))
    }

    pub fn users(&self) -> PortalResult<UserManagement> {
        require_admin(&self.session)?;
        Ok(UserManagement::new(
            self.client.clone(),
            self.notifier.clone(),
            self.page_size(),
        ))
    }

    pub fn practitioners(&self) -> PortalResult<PractitionerManagement> {
        require_admin(&self.session)?;
        let screen = PractitionerManagement::new(
            self.client.clone(),
            self.notifier.clone(),
            self.page_size(),
        );
        Ok(if self.config.mock.fallback_enabled {
            screen.with_mock_fallback(self.config.mock.delay())
        } else {
            screen
        })
    }

    pub fn patients(&self) -> PortalResult<PatientManagement> {
        require_admin(&self.session)?;
        Ok(PatientManagement::new(
            self.client.clone(),
            self.notifier.clone(),
            self.page_size(),
        ))
    }

    pub fn appointments(&self) -> PortalResult<AppointmentManagement> {
        require_admin(&self.session)?;
        Ok(AppointmentManagement::new(
            self.client.clone(),
            self.notifier.clone(),
            self.page_size(),
        ))
    }

    pub fn notifications(&self) -> PortalResult<NotificationCenter> {
        require_admin(&self.session)?;
        Ok(NotificationCenter::new(
            self.client.clone(),
            self.notifier.clone(),
            self.page_size(),
        ))
    }

    pub fn audit_logs(&self) -> PortalResult<AuditLogs> {
        require_admin(&self.session)?;
        Ok(AuditLogs::new(
            self.client.clone(),
            self.notifier.clone(),
            self.long_page_size(),
        ))
    }

    pub fn content(&self) -> PortalResult<ContentManagement> {
        require_admin(&self.session)?;
        Ok(ContentManagement::new(
            self.client.clone(),
            self.notifier.clone(),
            self.page_size(),
        ))
    }

    pub fn revenue(&self) -> PortalResult<RevenueManagement> {
        require_admin(&self.session)?;
        Ok(RevenueManagement::new(
            self.client.clone(),
            self.notifier.clone(),
            self.long_page_size(),
        ))
    }

    // ------------------------------------------------------------------
    // Patient area

    pub fn my_appointments(&self) -> PortalResult<PatientAppointments> {
        require_area(&self.session, PortalArea::Patient)?;
        Ok(PatientAppointments::new(
            self.client.clone(),
            self.notifier.clone(),
            self.page_size(),
        ))
    }
}

impl std::fmt::Debug for Portal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portal")
            .field("base_url", &self.config.api.base_url)
            .field("session", &self.session)
            .finish()
    }
}
