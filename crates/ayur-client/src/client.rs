//! Typed JSON helpers over a [`Transport`]

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ayur_core::{Page, PageRequest, PortalError, PortalResult};
use ayur_queries::{ListQuery, QueryParams};

use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// List payloads arrive either as a page envelope or as a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Page(Page<T>),
    Bare(Vec<T>),
}

/// Single records may be wrapped as `{ "data": {...} }`
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if !map.contains_key("id") && !map.contains_key("_id") => {
            match map.remove("data") {
                Some(inner @ Value::Object(_)) => inner,
                Some(other) => {
                    map.insert("data".into(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            }
        }
        other => other,
    }
}

/// Client for the portal's REST backend
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn send(&self, request: ApiRequest) -> PortalResult<ApiResponse> {
        self.transport.send(request).await
    }

    /// GET a single JSON document
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> PortalResult<T> {
        let value = self
            .send(ApiRequest::get(path).with_query(query))
            .await?
            .to_value()?;
        decode(unwrap_envelope(value))
    }

    /// GET one page of a collection
    pub async fn get_page<T, F>(&self, path: &str, query: &ListQuery<F>) -> PortalResult<Page<T>>
    where
        T: DeserializeOwned,
        F: QueryParams,
    {
        let value = self
            .send(ApiRequest::get(path).with_query(query.to_query_pairs()))
            .await?
            .to_value()?;
        decode_page(value, query.page)
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> PortalResult<Value> {
        self.write(ApiRequest::new(Method::Post, path).with_json(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> PortalResult<Value> {
        self.write(ApiRequest::new(Method::Put, path).with_json(body)?).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> PortalResult<Value> {
        self.write(ApiRequest::new(Method::Patch, path).with_json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> PortalResult<Value> {
        self.write(ApiRequest::new(Method::Delete, path)).await
    }

    /// GET raw bytes (CSV exports)
    pub async fn download(&self, path: &str, query: Vec<(String, String)>) -> PortalResult<Vec<u8>> {
        let response = self.send(ApiRequest::get(path).with_query(query)).await?;
        tracing::debug!(path, bytes = response.body.len(), "downloaded");
        Ok(response.body)
    }

    async fn write(&self, request: ApiRequest) -> PortalResult<Value> {
        let (method, path) = (request.method, request.path.clone());
        let value = self.send(request).await?.to_value()?;
        tracing::info!(%method, %path, "mutation accepted");
        Ok(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> PortalResult<T> {
    serde_json::from_value(value).map_err(|e| PortalError::Decode(e.to_string()))
}

fn decode_page<T: DeserializeOwned>(value: Value, request: PageRequest) -> PortalResult<Page<T>> {
    let page = match decode::<ListBody<T>>(value)? {
        ListBody::Page(page) => page,
        ListBody::Bare(data) => Page {
            total: data.len() as u64,
            data,
            ..Page::empty(request)
        },
    };
    Ok(page.normalize(request))
}
