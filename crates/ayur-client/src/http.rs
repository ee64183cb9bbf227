//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use ayur_auth::SessionContext;
use ayur_core::config::ApiConfig;
use ayur_core::{PortalError, PortalResult};

use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Transport that sends requests to the configured backend, attaching the
/// session's bearer token when one is held
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig, session: SessionContext) -> PortalResult<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| PortalError::Config(format!("invalid api.base_url: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                tracing::error!(?e, "failed to create HTTP client");
                PortalError::Config(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Pull a human-readable message out of an error body
fn error_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> PortalResult<ApiResponse> {
        let url = self.url_for(&request.path);
        debug!(method = %request.method, %url, query = ?request.query, "api request");

        let mut builder = self.client.request(to_reqwest(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(?e, method = %request.method, %url, "api request failed");
            if e.is_timeout() {
                PortalError::Network(format!("request to {url} timed out"))
            } else {
                PortalError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let body = response.bytes().await.map_err(|e| {
            warn!(?e, %url, "failed to read response body");
            PortalError::Network(format!("failed to read response: {e}"))
        })?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %url, %message, "api returned an error");
            return Err(PortalError::from_status(status.as_u16(), message));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "api response");
        Ok(ApiResponse {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ayur_auth::{Session, SessionUser};
    use ayur_models::Role;
    use httpmock::Method::{GET, PATCH};
    use httpmock::MockServer;
    use serde_json::json;

    fn transport_for(server: &MockServer, session: SessionContext) -> HttpTransport {
        let config = ApiConfig {
            base_url: server.url("/api"),
            ..Default::default()
        };
        HttpTransport::new(&config, session).unwrap()
    }

    fn signed_in() -> SessionContext {
        let context = SessionContext::in_memory();
        context
            .establish(Session::new(
                "opaque-token",
                SessionUser {
                    id: "u1".into(),
                    name: "Asha Menon".into(),
                    email: "asha@ayursutra.in".into(),
                    role: Role::Admin,
                },
            ))
            .unwrap();
        context
    }

    #[tokio::test]
    async fn test_sends_bearer_token_and_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/admin/users")
                .query_param("page", "2")
                .query_param("role", "patient")
                .header("authorization", "Bearer opaque-token");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"data": [], "total": 0}));
        });

        let transport = transport_for(&server, signed_in());
        let response = transport
            .send(ApiRequest::get("/admin/users").with_query(vec![
                ("page".into(), "2".into()),
                ("role".into(), "patient".into()),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        mock.assert();
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_authorization() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/admin/dashboard/stats")
                .header_missing("authorization");
            then.status(200).json_body(json!({}));
        });

        let transport = transport_for(&server, SessionContext::in_memory());
        transport
            .send(ApiRequest::get("/admin/dashboard/stats"))
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/admin/practitioners/2/status")
                .json_body(json!({"isActive": false}));
            then.status(200).json_body(json!({"success": true}));
        });

        let transport = transport_for(&server, signed_in());
        let request = ApiRequest::new(Method::Patch, "/admin/practitioners/2/status")
            .with_json(&json!({"isActive": false}))
            .unwrap();
        transport.send(request).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/users");
            then.status(403)
                .json_body(json!({"message": "Admin access required"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/patients");
            then.status(500).body("");
        });

        let transport = transport_for(&server, signed_in());
        match transport.send(ApiRequest::get("/admin/users")).await {
            Err(PortalError::Forbidden { message }) => assert_eq!(message, "Admin access required"),
            other => panic!("expected forbidden, got {other:?}"),
        }
        let err = transport
            .send(ApiRequest::get("/admin/patients"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9/api".into(),
            timeout_seconds: 2,
            ..Default::default()
        };
        let transport = HttpTransport::new(&config, SessionContext::in_memory()).unwrap();
        let err = transport
            .send(ApiRequest::get("/admin/users"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ApiConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            HttpTransport::new(&config, SessionContext::in_memory()),
            Err(PortalError::Config(_))
        ));
    }
}
