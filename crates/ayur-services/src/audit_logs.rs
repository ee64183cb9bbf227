//! Audit log viewer (`/admin/audit-logs`)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_models::AuditLog;
use ayur_queries::QueryParams;

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;

pub const EXPORT_BASE_NAME: &str = "audit-logs";

pub struct AuditLogs {
    list: ListManager<AuditLog>,
}

impl AuditLogs {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
        }
    }

    pub fn list(&self) -> &ListManager<AuditLog> {
        &self.list
    }

    /// Download every log matching the current filter as CSV into `directory`
    pub async fn export(&self, directory: &Path, today: NaiveDate) -> ServiceResult<PathBuf> {
        let query = self.list.filter().query_pairs();
        self.list
            .export_csv(admin::AUDIT_LOG_EXPORT, query, directory, EXPORT_BASE_NAME, today)
            .await
    }
}
