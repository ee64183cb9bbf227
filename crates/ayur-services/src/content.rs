//! Content management screen (`/admin/content`)

use std::sync::Arc;

use ayur_client::endpoints::admin;
use ayur_client::ApiClient;
use ayur_models::{Content, ContentStatus, ContentStatusChange, NewContent, UpdateContent};

use crate::base::ListManager;
use crate::notifier::Notifier;
use crate::result::ServiceResult;

pub struct ContentManagement {
    list: ListManager<Content>,
}

impl ContentManagement {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self {
            list: ListManager::new(client, notifier, page_size),
        }
    }

    pub fn list(&self) -> &ListManager<Content> {
        &self.list
    }

    pub async fn create(&self, content: &NewContent) -> ServiceResult<()> {
        self.list.create(content).await
    }

    pub async fn update(&self, id: &str, changes: &UpdateContent) -> ServiceResult<()> {
        self.list.update(id, changes).await
    }

    pub async fn set_status(&self, id: &str, status: ContentStatus) -> ServiceResult<()> {
        let message = match status {
            ContentStatus::Published => "Content published",
            ContentStatus::Archived => "Content archived",
            ContentStatus::Draft => "Content moved to drafts",
        };
        self.list
            .patch(
                admin::content_status(id),
                &ContentStatusChange { status },
                message,
            )
            .await
    }

    pub async fn publish(&self, id: &str) -> ServiceResult<()> {
        self.set_status(id, ContentStatus::Published).await
    }

    pub async fn archive(&self, id: &str) -> ServiceResult<()> {
        self.set_status(id, ContentStatus::Archived).await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.list.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::RecordingNotifier;
    use crate::testing::{backend_client, page_response, MockBackend};
    use ayur_client::{ApiResponse, Method};
    use ayur_models::ContentType;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_patches_status() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Patch
                    && r.path == "/admin/content/c2/status"
                    && r.body == Some(json!({"status": "published"}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));
        backend
            .expect_send()
            .withf(|r| r.method == Method::Get)
            .returning(|_| Ok(page_response::<Content>(&[], 0)));

        let screen = ContentManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        assert!(screen.publish("c2").await.is_success());
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected_locally() {
        let mut backend = MockBackend::new();
        backend.expect_send().times(0);

        let screen = ContentManagement::new(
            backend_client(backend),
            Arc::new(RecordingNotifier::new()),
            10,
        );
        let result = screen
            .create(&NewContent {
                title: String::new(),
                body: "Body".into(),
                content_type: ContentType::Faq,
                tags: vec![],
                status: ContentStatus::Draft,
            })
            .await;
        assert!(result.errors().has_error("title"));
    }
}
