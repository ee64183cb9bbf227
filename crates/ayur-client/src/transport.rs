//! Transport seam
//!
//! Everything above this trait deals in typed records; everything below it
//! deals in HTTP. Tests swap in a double here.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use ayur_core::{PortalError, PortalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call against the backend, relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> PortalResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Raw successful response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".into()),
            body: value.to_string().into_bytes(),
        }
    }

    /// Body as JSON; an empty body reads as `null`
    pub fn to_value(&self) -> PortalResult<Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body).map_err(|e| PortalError::Decode(e.to_string()))
    }
}

/// Sends requests to the backend
///
/// Implementations turn non-2xx responses into `PortalError::from_status`
/// and connection failures into `PortalError::Network`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> PortalResult<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_null() {
        let response = ApiResponse {
            status: 204,
            ..Default::default()
        };
        assert_eq!(response.to_value().unwrap(), Value::Null);
    }

    #[test]
    fn test_non_json_body_is_decode_error() {
        let response = ApiResponse {
            status: 200,
            content_type: Some("text/html".into()),
            body: b"<html>".to_vec(),
        };
        assert!(matches!(response.to_value(), Err(PortalError::Decode(_))));
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::new(Method::Patch, "/admin/users/u1/status")
            .with_json(&json!({"isActive": false}))
            .unwrap();
        assert_eq!(request.method.to_string(), "PATCH");
        assert_eq!(request.body, Some(json!({"isActive": false})));
    }
}
