//! Revenue screen (`/admin/revenue`)
//!
//! Transaction table plus the headline summary above it. The summary is
//! fetched with the same filter as the table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_models::{RevenueSummary, Transaction};
use ayur_queries::QueryParams;

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;

pub const EXPORT_BASE_NAME: &str = "revenue";

pub struct RevenueManagement {
    list: ListManager<Transaction>,
    summary: RwLock<Option<RevenueSummary>>,
}

impl RevenueManagement {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
            summary: RwLock::new(None),
        }
    }

    pub fn list(&self) -> &ListManager<Transaction> {
        &self.list
    }

    /// Last summary loaded
    pub fn current_summary(&self) -> Option<RevenueSummary> {
        self.summary.read().clone()
    }

    /// Fetch the summary for the current filter
    ///
    /// On failure the previous summary is kept and `None` is returned.
    pub async fn load_summary(&self) -> Option<RevenueSummary> {
        let query = self.list.filter().query_pairs();
        match self
            .list
            .client()
            .get_json::<RevenueSummary>(admin::REVENUE_SUMMARY, query)
            .await
        {
            Ok(summary) => {
                *self.summary.write() = Some(summary.clone());
                Some(summary)
            }
            Err(err) => {
                self.list.report_failure("load revenue summary", &err);
                None
            }
        }
    }

    /// Totals over the transactions on the current page
    pub fn page_summary(&self) -> RevenueSummary {
        RevenueSummary::from_transactions(&self.list.records())
    }

    pub async fn export(&self, directory: &Path, today: NaiveDate) -> ServiceResult<PathBuf> {
        let query = self.list.filter().query_pairs();
        self.list
            .export_csv(admin::REVENUE_EXPORT, query, directory, EXPORT_BASE_NAME, today)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{NoticeLevel, RecordingNotifier};
    use crate::testing::{backend_client, page_response, MockBackend};
    use ayur_client::{ApiResponse, Method};
    use ayur_core::PortalError;
    use ayur_mock::mock_transactions;
    use serde_json::json;

    #[tokio::test]
    async fn test_summary_is_loaded_and_kept() {
        let mut backend = MockBackend::new();
        let mut first = true;
        backend
            .expect_send()
            .withf(|r| r.method == Method::Get && r.path == "/admin/revenue/summary")
            .times(2)
            .returning(move |_| {
                if std::mem::replace(&mut first, false) {
                    Ok(ApiResponse::json(
                        200,
                        &json!({ "data": { "totalRevenue": 4500.0, "transactionCount": 3 } }),
                    ))
                } else {
                    Err(PortalError::Network("offline".into()))
                }
            });

        let notifier = RecordingNotifier::new();
        let screen =
            RevenueManagement::new(backend_client(backend), Arc::new(notifier.clone()), 20);

        let summary = screen.load_summary().await.unwrap();
        assert_eq!(summary.total_revenue, 4500.0);
        assert_eq!(summary.transaction_count, 3);

        assert!(screen.load_summary().await.is_none());
        assert_eq!(screen.current_summary(), Some(summary));
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_page_summary_covers_listed_transactions() {
        let transactions = mock_transactions();
        let expected = RevenueSummary::from_transactions(&transactions);
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| r.path == "/admin/revenue/transactions")
            .returning(move |_| Ok(page_response(&transactions, 6)));

        let screen = RevenueManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            20,
        );
        screen.list().refresh().await;
        assert_eq!(screen.page_summary(), expected);
        assert_eq!(screen.page_summary().transaction_count, 6);
    }

    #[tokio::test]
    async fn test_export_file_name() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| r.path == "/admin/revenue/export")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse {
                    status: 200,
                    content_type: Some("text/csv".into()),
                    body: b"id,amount\n".to_vec(),
                })
            });

        let screen = RevenueManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            20,
        );
        let dir = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let result = screen.export(dir.path(), today).await;
        assert_eq!(
            result.result().cloned(),
            Some(dir.path().join("revenue-2024-06-01.csv"))
        );
    }
}
