//! Where a list screen gets its pages from

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;

use ayur_client::ApiClient;
use ayur_core::{Page, PortalResult};
use ayur_mock::{filter_data, generate_paginated_response, simulate_api_delay, Fixture};
use ayur_queries::{Filterable, ListQuery};

/// Which source produced the records a screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Nothing loaded yet
    #[default]
    Empty,
    Live,
    Mock,
}

#[async_trait]
pub trait ListSource<R: Filterable>: Send + Sync {
    async fn fetch(&self, query: &ListQuery<R::Filter>) -> PortalResult<Page<R>>;

    fn origin(&self) -> Origin;
}

/// Pages fetched from a backend collection
pub struct ApiListSource<R> {
    client: ApiClient,
    path: String,
    _record: PhantomData<fn() -> R>,
}

impl<R> ApiListSource<R> {
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl<R: Filterable> ListSource<R> for ApiListSource<R> {
    async fn fetch(&self, query: &ListQuery<R::Filter>) -> PortalResult<Page<R>> {
        self.client.get_page(&self.path, query).await
    }

    fn origin(&self) -> Origin {
        Origin::Live
    }
}

/// Pages cut from seeded fixtures, filtered the way the backend would
pub struct MockListSource<R> {
    records: Vec<R>,
    delay: Duration,
}

impl<R: Fixture> MockListSource<R> {
    pub fn seeded(delay: Duration) -> Self {
        Self::new(R::fixtures(), delay)
    }
}

impl<R> MockListSource<R> {
    pub fn new(records: Vec<R>, delay: Duration) -> Self {
        Self { records, delay }
    }
}

#[async_trait]
impl<R: Filterable> ListSource<R> for MockListSource<R> {
    async fn fetch(&self, query: &ListQuery<R::Filter>) -> PortalResult<Page<R>> {
        simulate_api_delay(self.delay).await;
        let matching = filter_data(&self.records, &query.filter);
        Ok(generate_paginated_response(
            &matching,
            query.page.page,
            query.page.limit,
        ))
    }

    fn origin(&self) -> Origin {
        Origin::Mock
    }
}
