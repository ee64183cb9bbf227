//! Base list service
//!
//! Every list screen of the portal is the same machine: hold one page of a
//! filtered collection, refetch it whenever the filter or page changes, and
//! refetch again after each successful mutation. [`ListManager`] is that
//! machine, parameterized by the record type.
//!
//! Fetches are not cancelled or de-duplicated. When two overlap, whichever
//! completes last decides what the screen shows.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use validator::Validate;

use ayur_client::{save_export, ApiClient, Method};
use ayur_core::{LogFailure, PageRequest, Pager, PortalError, PortalResult};
use ayur_queries::{Filterable, ListQuery, RecordFilter};

use crate::notifier::{Notice, Notifier};
use crate::result::ServiceResult;
use crate::source::{ApiListSource, ListSource, Origin};

/// Everything a list screen renders
#[derive(Debug, Clone)]
pub struct ListState<R: Filterable> {
    pub records: Vec<R>,
    pub total: u64,
    /// 1-indexed
    pub page: u32,
    pub limit: u32,
    pub filter: R::Filter,
    pub loading: bool,
    pub origin: Origin,
    /// Record open in the detail view
    pub selected: Option<R>,
    pub last_error: Option<String>,
}

impl<R: Filterable> ListState<R> {
    fn new(limit: u32) -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            page: 1,
            limit,
            filter: R::Filter::default(),
            loading: false,
            origin: Origin::Empty,
            selected: None,
            last_error: None,
        }
    }

    pub fn pager(&self) -> Pager {
        Pager::new(self.page, self.total, self.limit)
    }
}

/// Filterable, paginated collection of one record type
pub struct ListManager<R: Filterable> {
    client: ApiClient,
    path: String,
    source: Arc<dyn ListSource<R>>,
    fallback: Option<Arc<dyn ListSource<R>>>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<ListState<R>>,
}

impl<R: Filterable> ListManager<R> {
    /// Manager for the record's own collection
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, page_size: u32) -> Self {
        Self::at_path(client, notifier, R::COLLECTION_PATH, page_size)
    }

    /// Manager for another collection of the same record type
    pub fn at_path(
        client: ApiClient,
        notifier: Arc<dyn Notifier>,
        path: impl Into<String>,
        page_size: u32,
    ) -> Self {
        let path = path.into();
        let limit = PageRequest::new(1, page_size).limit;
        Self {
            source: Arc::new(ApiListSource::new(client.clone(), path.clone())),
            client,
            path,
            fallback: None,
            notifier,
            state: RwLock::new(ListState::new(limit)),
        }
    }

    /// Replace the primary source
    pub fn with_source(mut self, source: Arc<dyn ListSource<R>>) -> Self {
        self.source = source;
        self
    }

    /// Serve pages from `fallback` whenever the primary source fails
    pub fn with_fallback(mut self, fallback: Arc<dyn ListSource<R>>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn member_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    // ------------------------------------------------------------------
    // State

    pub fn state(&self) -> ListState<R> {
        self.state.read().clone()
    }

    pub fn records(&self) -> Vec<R> {
        self.state.read().records.clone()
    }

    pub fn total(&self) -> u64 {
        self.state.read().total
    }

    pub fn page(&self) -> u32 {
        self.state.read().page
    }

    pub fn filter(&self) -> R::Filter {
        self.state.read().filter.clone()
    }

    pub fn origin(&self) -> Origin {
        self.state.read().origin
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn selected(&self) -> Option<R> {
        self.state.read().selected.clone()
    }

    pub fn pager(&self) -> Pager {
        self.state.read().pager()
    }

    /// Listed copy of the record with `id`
    pub fn find(&self, id: &str) -> Option<R> {
        self.state
            .read()
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn query(&self) -> ListQuery<R::Filter> {
        let state = self.state.read();
        ListQuery::new(PageRequest::new(state.page, state.limit), state.filter.clone())
    }

    // ------------------------------------------------------------------
    // Fetching

    /// Fetch the current page under the current filter
    ///
    /// Returns whether new records were stored. On failure the previous
    /// records stay in place and a single error notice is raised.
    pub async fn refresh(&self) -> bool {
        let query = {
            let mut state = self.state.write();
            state.loading = true;
            ListQuery::new(PageRequest::new(state.page, state.limit), state.filter.clone())
        };
        debug!(
            resource = R::TYPE_NAME,
            path = %self.path,
            query = %query.to_query_string(),
            "fetching list"
        );

        let outcome = match self.source.fetch(&query).await {
            Ok(page) => Ok((page, self.source.origin())),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    warn!(resource = R::TYPE_NAME, error = %err, "list fetch failed, using fallback data");
                    fallback
                        .fetch(&query)
                        .await
                        .map(|page| (page, fallback.origin()))
                }
                None => Err(err),
            },
        };

        let failure = {
            let mut state = self.state.write();
            state.loading = false;
            match outcome {
                Ok((page, origin)) => {
                    debug!(
                        resource = R::TYPE_NAME,
                        received = page.data.len(),
                        total = page.total,
                        ?origin,
                        "list loaded"
                    );
                    state.records = page.data;
                    state.total = page.total;
                    state.origin = origin;
                    state.last_error = None;
                    None
                }
                Err(err) => {
                    state.last_error = Some(err.to_string());
                    Some(err)
                }
            }
        };

        match failure {
            None => true,
            Some(err) => {
                self.report_failure("load list", &err);
                false
            }
        }
    }

    /// Replace the filter; the page goes back to 1
    pub async fn set_filter(&self, filter: R::Filter) -> bool {
        {
            let mut state = self.state.write();
            state.filter = filter;
            state.page = 1;
        }
        self.refresh().await
    }

    /// Change part of the filter; the page goes back to 1
    pub async fn update_filter<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut R::Filter) + Send,
    {
        let mut filter = self.filter();
        change(&mut filter);
        self.set_filter(filter).await
    }

    pub async fn set_search(&self, text: impl Into<String>) -> bool {
        let text = text.into();
        self.update_filter(|f| f.set_search(text)).await
    }

    /// Move to `page`; pages the pager would not offer are ignored
    pub async fn set_page(&self, page: u32) -> bool {
        if !self.pager().accepts(page) {
            debug!(resource = R::TYPE_NAME, page, "page change ignored");
            return false;
        }
        self.state.write().page = page;
        self.refresh().await
    }

    pub async fn next_page(&self) -> bool {
        let pager = self.pager();
        if !pager.next_enabled {
            return false;
        }
        self.set_page(pager.current + 1).await
    }

    pub async fn previous_page(&self) -> bool {
        let pager = self.pager();
        if !pager.previous_enabled {
            return false;
        }
        self.set_page(pager.current - 1).await
    }

    // ------------------------------------------------------------------
    // Detail

    /// Open the detail view for `id`
    ///
    /// Falls back to the listed copy when the detail request fails.
    pub async fn select(&self, id: &str) -> Option<R> {
        let fetched: Option<R> = self
            .client
            .get_json(&self.member_path(id), Vec::new())
            .await
            .log_failure("load record detail");
        let selected = fetched.or_else(|| self.find(id));
        if selected.is_none() {
            self.notifier
                .notify(Notice::error(ayur_core::GENERIC_FAILURE_MESSAGE));
        }
        self.state.write().selected = selected.clone();
        selected
    }

    pub fn close_detail(&self) {
        self.state.write().selected = None;
    }

    // ------------------------------------------------------------------
    // Mutations

    /// POST a new record to the collection
    pub async fn create<B>(&self, body: &B) -> ServiceResult<()>
    where
        B: Serialize + Validate + Sync,
    {
        if let Err(err) = check(body) {
            return self.reject(&err);
        }
        let message = format!("{} created", R::TYPE_NAME);
        let outcome = self.client.post(&self.path, body).await;
        self.settle(outcome, Method::Post, &self.path, message).await
    }

    /// PUT changes to an existing record
    pub async fn update<B>(&self, id: &str, body: &B) -> ServiceResult<()>
    where
        B: Serialize + Validate + Sync,
    {
        if let Err(err) = check(body) {
            return self.reject(&err);
        }
        let path = self.member_path(id);
        let message = format!("{} updated", R::TYPE_NAME);
        let outcome = self.client.put(&path, body).await;
        self.settle(outcome, Method::Put, &path, message).await
    }

    /// PATCH a partial update (status flags, decisions) to `path`
    pub async fn patch<B>(&self, path: String, body: &B, message: impl Into<String>) -> ServiceResult<()>
    where
        B: Serialize + Sync,
    {
        let outcome = self.client.patch(&path, body).await;
        self.settle(outcome, Method::Patch, &path, message.into()).await
    }

    /// POST to an action endpoint under the collection
    pub async fn post<B>(&self, path: String, body: &B, message: impl Into<String>) -> ServiceResult<()>
    where
        B: Serialize + Sync,
    {
        let outcome = self.client.post(&path, body).await;
        self.settle(outcome, Method::Post, &path, message.into()).await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let path = self.member_path(id);
        let message = format!("{} deleted", R::TYPE_NAME);
        let outcome = self.client.delete(&path).await;
        self.settle(outcome, Method::Delete, &path, message).await
    }

    /// Report a mutation's outcome and refetch on success
    ///
    /// No optimistic update: the list only changes through the refetch.
    async fn settle(
        &self,
        outcome: PortalResult<Value>,
        method: Method,
        path: &str,
        message: String,
    ) -> ServiceResult<()> {
        if let Err(err) = outcome {
            return self.reject(&err);
        }

        info!(resource = R::TYPE_NAME, %method, path, "{message}");
        self.notifier.notify(Notice::success(message.clone()));
        self.refresh().await;
        ServiceResult::success_with_message((), message)
    }

    /// A failed action: state untouched, one notice
    pub fn reject(&self, err: &PortalError) -> ServiceResult<()> {
        self.report_failure("perform action", err);
        ServiceResult::from_error(err)
    }

    /// Log `err` and raise exactly one notice for it
    pub fn report_failure(&self, context: &str, err: &PortalError) {
        error!(
            resource = R::TYPE_NAME,
            path = %self.path,
            code = err.error_code(),
            error = %err,
            "failed to {context}"
        );
        self.notifier.notify(Notice::error(err.user_message()));
    }

    /// Download `endpoint` as CSV into `directory` as `<base>-<today>.csv`
    pub async fn export_csv(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
        directory: &Path,
        base: &str,
        today: NaiveDate,
    ) -> ServiceResult<PathBuf> {
        let saved: PortalResult<PathBuf> = async {
            let bytes = self.client.download(endpoint, query).await?;
            save_export(directory, base, today, &bytes).await
        }
        .await;

        match saved {
            Ok(path) => {
                let message = format!("Exported to {}", path.display());
                self.notifier.notify(Notice::success(message.clone()));
                ServiceResult::success_with_message(path, message)
            }
            Err(err) => {
                self.report_failure("export", &err);
                ServiceResult::from_error(&err)
            }
        }
    }
}

/// Form-level validation before anything is sent
fn check<B: Validate>(body: &B) -> PortalResult<()> {
    body.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{MockNotifier, NoticeLevel, RecordingNotifier};
    use crate::source::MockListSource;
    use crate::testing::{backend_client, page_response, MockBackend};
    use ayur_client::{ApiRequest, ApiResponse};
    use ayur_mock::{mock_practitioners, mock_users};
    use ayur_models::{NewUser, Practitioner, Role, StatusChange, UpdateUser, User};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn is_get(request: &ApiRequest) -> bool {
        request.method == Method::Get
    }

    #[tokio::test]
    async fn test_refresh_stores_page() {
        let mut backend = MockBackend::new();
        let users = mock_users();
        backend
            .expect_send()
            .withf(|r| is_get(r) && r.path == "/admin/users")
            .times(1)
            .returning(move |_| Ok(page_response(&users[..2], 6)));

        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(RecordingNotifier::new()), 2);
        assert!(manager.refresh().await);

        let state = manager.state();
        assert_eq!(state.records.len(), 2);
        assert_eq!(state.total, 6);
        assert_eq!(state.origin, Origin::Live);
        assert!(!state.loading);
        assert_eq!(manager.pager().buttons, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_records_and_notifies_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let users = mock_users();
        let mut backend = MockBackend::new();
        let counter = calls.clone();
        backend.expect_send().withf(is_get).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(page_response(&users, 6))
            } else {
                Err(PortalError::Network("connection refused".into()))
            }
        });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Error && n.message == ayur_core::GENERIC_FAILURE_MESSAGE)
            .times(1)
            .return_const(());

        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(notifier), 10);
        assert!(manager.refresh().await);
        let before = manager.records();

        assert!(!manager.refresh().await);
        assert_eq!(manager.records(), before);
        assert_eq!(manager.total(), 6);
        assert!(manager.state().last_error.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_serves_mock_data() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .returning(|_| Err(PortalError::Network("connection refused".into())));

        let notifier = RecordingNotifier::new();
        let manager: ListManager<Practitioner> =
            ListManager::new(backend_client(backend), Arc::new(notifier.clone()), 2)
                .with_fallback(Arc::new(MockListSource::seeded(Duration::ZERO)));

        assert!(manager.refresh().await);
        assert_eq!(manager.origin(), Origin::Mock);
        assert_eq!(manager.total(), 5);
        let all = mock_practitioners();
        let ids: Vec<_> = manager.records().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![all[0].id.clone(), all[1].id.clone()]);
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let mut backend = MockBackend::new();
        let users = mock_users();
        backend
            .expect_send()
            .withf(is_get)
            .returning(move |_| Ok(page_response(&users[..2], 30)));

        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(RecordingNotifier::new()), 10);
        manager.refresh().await;
        assert!(manager.set_page(3).await);
        assert_eq!(manager.page(), 3);

        manager.set_search("meera").await;
        assert_eq!(manager.page(), 1);
        assert_eq!(manager.filter().search, "meera");
        assert_eq!(
            manager.query().to_query_string(),
            "page=1&limit=10&search=meera"
        );
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_ignored() {
        let mut backend = MockBackend::new();
        let users = mock_users();
        backend
            .expect_send()
            .withf(is_get)
            .times(1)
            .returning(move |_| Ok(page_response(&users, 6)));

        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(RecordingNotifier::new()), 10);
        manager.refresh().await;

        assert!(!manager.set_page(2).await);
        assert!(!manager.set_page(0).await);
        assert!(!manager.next_page().await);
        assert!(!manager.previous_page().await);
        assert_eq!(manager.page(), 1);
    }

    #[tokio::test]
    async fn test_patch_refetches() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let counter = fetches.clone();
        let users = mock_users();
        let mut backend = MockBackend::new();
        backend.expect_send().withf(is_get).returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(page_response(&users, 6))
        });
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Patch
                    && r.path == "/admin/users/u6/status"
                    && r.body == Some(serde_json::json!({"isActive": true}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));

        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(RecordingNotifier::new()), 10);
        manager.refresh().await;
        let result = manager
            .patch(
                "/admin/users/u6/status".into(),
                &StatusChange { is_active: true },
                "User activated",
            )
            .await;

        assert!(result.is_success());
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_and_update_use_post_and_put() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Post
                    && r.path == "/admin/users"
                    && r.body.as_ref().and_then(|b| b.get("email"))
                        == Some(&serde_json::json!("asha@ayursutra.in"))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));
        backend
            .expect_send()
            .withf(|r| {
                r.method == Method::Put
                    && r.path == "/admin/users/u6"
                    && r.body == Some(serde_json::json!({"name": "Asha Menon"}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::default()));
        backend
            .expect_send()
            .withf(is_get)
            .times(2)
            .returning(|_| Ok(page_response::<User>(&[], 0)));

        let notifier = RecordingNotifier::new();
        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(notifier.clone()), 10);
        let created = manager
            .create(&NewUser {
                name: "Asha".into(),
                email: "asha@ayursutra.in".into(),
                phone: None,
                role: Role::Admin,
                password: Some("long-enough-secret".into()),
            })
            .await;
        let updated = manager
            .update(
                "u6",
                &UpdateUser {
                    name: Some("Asha Menon".into()),
                    email: None,
                    phone: None,
                    role: None,
                },
            )
            .await;

        assert!(created.is_success());
        assert!(updated.is_success());
        assert_eq!(notifier.count(NoticeLevel::Success), 2);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let mut backend = MockBackend::new();
        backend.expect_send().times(0);

        let notifier = RecordingNotifier::new();
        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(notifier.clone()), 10);
        let result = manager
            .create(&NewUser {
                name: "Asha".into(),
                email: "not-an-email".into(),
                phone: None,
                role: Role::Admin,
                password: Some("long-enough-secret".into()),
            })
            .await;

        assert!(result.is_failure());
        assert!(result.errors().has_error("email"));
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_refetch() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| r.method == Method::Delete)
            .times(1)
            .returning(|_| Err(PortalError::from_status(500, "boom")));
        backend.expect_send().withf(is_get).times(0);

        let notifier = RecordingNotifier::new();
        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(notifier.clone()), 10);
        let result = manager.delete("u6").await;

        assert!(result.is_failure());
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_export_csv_saves_dated_file() {
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| is_get(r) && r.path == "/admin/users/export")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse {
                    status: 200,
                    content_type: Some("text/csv".into()),
                    body: b"id,name\nu1,Asha\n".to_vec(),
                })
            });

        let notifier = RecordingNotifier::new();
        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(notifier.clone()), 10);
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let result = manager
            .export_csv("/admin/users/export", Vec::new(), dir.path(), "users", today)
            .await;

        let path = result.result().cloned().unwrap();
        assert_eq!(path, dir.path().join("users-2024-01-05.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,name\nu1,Asha\n");
        assert_eq!(notifier.count(NoticeLevel::Success), 1);
    }

    #[tokio::test]
    async fn test_select_falls_back_to_listed_copy() {
        let users = mock_users();
        let listed = users.clone();
        let mut backend = MockBackend::new();
        backend
            .expect_send()
            .withf(|r| r.path == "/admin/users")
            .returning(move |_| Ok(page_response(&listed, 6)));
        backend
            .expect_send()
            .withf(|r| r.path == "/admin/users/u4")
            .returning(|_| Err(PortalError::from_status(404, "not found")));

        let manager: ListManager<User> =
            ListManager::new(backend_client(backend), Arc::new(RecordingNotifier::new()), 10);
        manager.refresh().await;

        let selected = manager.select("u4").await.unwrap();
        assert_eq!(selected.id, "u4");
        assert_eq!(manager.selected().map(|u| u.id), Some("u4".to_string()));
        manager.close_detail();
        assert!(manager.selected().is_none());
    }
}
