//! Admin dashboard (`/admin`)

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error};

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_models::DashboardStats;

use crate::notifier::{Notice, Notifier};

pub struct Dashboard {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    stats: RwLock<Option<DashboardStats>>,
}

impl Dashboard {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            stats: RwLock::new(None),
        }
    }

    pub fn stats(&self) -> Option<DashboardStats> {
        self.stats.read().clone()
    }

    /// Fetch the counters; the last loaded ones stay on failure
    pub async fn load(&self) -> Option<DashboardStats> {
        match self
            .client
            .get_json::<DashboardStats>(admin::DASHBOARD_STATS, Vec::new())
            .await
        {
            Ok(stats) => {
                debug!(?stats, "dashboard loaded");
                *self.stats.write() = Some(stats.clone());
                Some(stats)
            }
            Err(err) => {
                error!(code = err.error_code(), error = %err, "failed to load dashboard");
                self.notifier.notify(Notice::error(err.user_message()));
                None
            }
        }
    }
}
