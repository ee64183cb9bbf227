//! User management screen (`/admin/users`)

use std::sync::Arc;

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_core::PortalError;
use ayur_models::{NewUser, StatusChange, UpdateUser, User};

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;

/// Admin list of every account, with create/edit forms
pub struct UserManagement {
    list: ListManager<User>,
}

impl UserManagement {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
        }
    }

    pub fn list(&self) -> &ListManager<User> {
        &self.list
    }

    pub async fn create(&self, user: &NewUser) -> ServiceResult<()> {
        self.list.create(user).await
    }

    pub async fn update(&self, id: &str, changes: &UpdateUser) -> ServiceResult<()> {
        self.list.update(id, changes).await
    }

    /// Flip the active flag of a listed user
    pub async fn toggle_active(&self, id: &str) -> ServiceResult<()> {
        let Some(user) = self.list.find(id) else {
            return self.list.reject(&PortalError::NotFound {
                resource: "User",
                id: id.to_string(),
            });
        };
        let change = StatusChange {
            is_active: !user.is_active,
        };
        let message = if change.is_active {
            "User activated"
        } else {
            "User deactivated"
        };
        self.list
            .patch(admin::user_status(id), &change, message)
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
    use crate::testing::{backend_client, page_response, MockBackend};
    use ayur_client::{ApiResponse, Method};
    use ayur_mock::mock_users;
    use ayur_models::Role;
    use serde_json::json;

    #[tokio::test]
    async fn test_toggle_inactive_user_activates() {
        let users = mock_users();
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| r.method == Method::Get)
            .times(2)
            .returning(move |_| Ok(page_response(&users, 6)));
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Patch
                    && r.path == "/admin/users/u6/status"
                    && r.body == Some(json!({"isActive": true}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));

        let notifier = RecordingNotifier::new();
        let screen = UserManagement::new(backend_client(backend), Arc::new(notifier.clone()), 10);
        screen.list().refresh().await;

        let result = screen.toggle_active("u6").await;
        assert!(result.is_success());
        assert_eq!(result.message(), Some("User activated"));
        assert_eq!(notifier.count(NoticeLevel::Success), 1);
    }

    #[tokio::test]
    async fn test_toggle_unknown_user_sends_nothing() {
        let mut backend = MockBackend::new();
        backend.expect_send().times(0);

        let notifier = RecordingNotifier::new();
        let screen = UserManagement::new(backend_client(backend), Arc::new(notifier.clone()), 10);
        assert!(screen.toggle_active("nobody").await.is_failure());
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_update_puts_changes() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Put
                    && r.path == "/admin/users/u4"
                    && r.body == Some(json!({"role": "practitioner"}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));
        backend
            .expect_send()
            .withf(|r| r.method == Method::Get)
            .times(1)
            .returning(|_| Ok(page_response::<User>(&[], 0)));

        let screen = UserManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        let changes = UpdateUser {
            role: Some(Role::Practitioner),
            ..Default::default()
        };
        assert!(screen.update("u4", &changes).await.is_success());
    }
}
