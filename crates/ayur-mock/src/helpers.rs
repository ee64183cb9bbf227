//! Mock API helpers
//!
//! These reproduce just enough of the backend's list contract (filter, then
//! slice a page) for screens to keep working without it.

use std::time::Duration;

use ayur_core::pagination::{Page, PageRequest};
use ayur_queries::RecordFilter;

/// Resolve after `delay`, so mock responses feel like a network call
pub async fn simulate_api_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Keep the records that pass every active condition of `filters`
pub fn filter_data<R, F>(data: &[R], filters: &F) -> Vec<R>
where
    R: Clone,
    F: RecordFilter<R>,
{
    let kept: Vec<R> = data.iter().filter(|r| filters.matches(r)).cloned().collect();
    tracing::trace!(total = data.len(), kept = kept.len(), "filtered mock data");
    kept
}

/// Slice one page out of `data`
///
/// A page past the end is empty, never an error. `limit` is used as given:
/// zero yields an empty page with no pages, and large limits are not capped.
pub fn generate_paginated_response<T: Clone>(data: &[T], page: u32, limit: u32) -> Page<T> {
    let request = PageRequest {
        page: page.max(1),
        limit,
    };
    Page::from_slice(data, request)
}
