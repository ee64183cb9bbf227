//! Notification center (`/admin/notifications`)

use std::sync::Arc;

use serde_json::json;

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_models::{NewNotification, Notification};

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;

pub struct NotificationCenter {
    list: ListManager<Notification>,
}

impl NotificationCenter {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
        }
    }

    pub fn list(&self) -> &ListManager<Notification> {
        &self.list
    }

    /// Broadcast a new notification to its audience
    pub async fn send(&self, notification: &NewNotification) -> ServiceResult<()> {
        self.list.create(notification).await
    }

    pub async fn mark_read(&self, id: &str) -> ServiceResult<()> {
        self.list
            .patch(
                admin::notification_read(id),
                &json!({ "isRead": true }),
                "Notification marked as read",
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.list.delete(id).await
    }

    /// Unread notifications on the current page
    pub fn unread_on_page(&self) -> usize {
        self.list
            .records()
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }
}
