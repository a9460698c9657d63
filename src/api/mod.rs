//! Request dispatcher for the catalog backend.
//!
//! Every page in the console goes through [`ApiClient`]: one place that
//! builds the target URL, injects the bearer token for protected calls,
//! picks the body encoding, and normalizes responses into the backend's
//! `{code, message, data}` envelope.
//!
//! ## Design
//! - The client never mutates session state. It only *reads* the token;
//!   callers interpret envelopes and drive login/logout explicitly.
//! - Two body modes, chosen by the caller: JSON (with
//!   `Content-Type: application/json`) and raw bytes (no explicit content
//!   type, so multipart boundaries survive untouched).
//! - HTTP 403 is **not** a failure. The backend signals authorization
//!   denial in-band, so a 403 resolves to a synthesized envelope and the
//!   caller branches on `code`. Every other non-200 status is an error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::session::SessionState;

pub mod catalog;
pub mod users;

// ── Envelope ─────────────────────────────────────────────────────

/// Uniform response envelope the backend wraps every payload in.
///
/// `data` is resource-specific; callers deserialize it further. A 403
/// response carries no data at all.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse {
    /// Backend status code (usually mirrors the HTTP status).
    pub code: i64,
    /// Human-readable outcome.
    pub message: String,
    /// Resource payload, if any.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl DataResponse {
    /// Whether the backend denied the call (403 in-band signal).
    pub fn is_forbidden(&self) -> bool {
        self.code == 403
    }
}

// ── Errors ───────────────────────────────────────────────────────

/// Failures the dispatcher can surface.
///
/// `InvalidRequest` and `Unauthenticated` are raised before any I/O and
/// must not be retried; they are caller bugs or a missing login. `Status`
/// and `Network` propagate to the calling page, which owns user-visible
/// messaging — no automatic retry here.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be built (empty path, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A protected call was attempted with no session token present.
    #[error("protected call without a session token")]
    Unauthenticated,

    /// The backend answered with a status other than 200 or 403.
    #[error("api call failed with status {0}")]
    Status(u16),

    /// Transport-level failure (DNS, connect, timeout) or a 200 body
    /// that did not parse as an envelope.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
}

// ── Request shape ────────────────────────────────────────────────

/// HTTP methods the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Body encoding, selected by the caller — never inferred.
#[derive(Debug, Clone)]
pub enum Body {
    /// No body (all GETs end up here).
    Empty,
    /// JSON-serialized with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Passed through unmodified, content type left to the transport.
    Raw(Vec<u8>),
}

// ── Client ───────────────────────────────────────────────────────

/// HTTP dispatcher for the catalog backend.
///
/// Shared by all resource call functions; construct one per process and
/// pass it around by reference.
pub struct ApiClient {
    host: String,
    http: reqwest::Client,
    state: Arc<SessionState>,
}

impl ApiClient {
    /// Create a dispatcher against `config.api_host`, reading tokens from
    /// the given session state.
    pub fn new(config: &crate::config::ConsoleConfig, state: Arc<SessionState>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            host: config.api_host.trim_end_matches('/').to_string(),
            http,
            state,
        })
    }

    /// GET `path`, optionally with the bearer token.
    pub async fn get(&self, path: &str, requires_auth: bool) -> Result<DataResponse, ApiError> {
        self.call(Method::Get, path, Body::Empty, requires_auth).await
    }

    /// POST `body` as JSON to `path`.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        requires_auth: bool,
    ) -> Result<DataResponse, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("unserializable body: {e}")))?;
        self.call(Method::Post, path, Body::Json(value), requires_auth)
            .await
    }

    /// POST raw bytes to `path` (file uploads; multipart payloads keep
    /// their own boundary header).
    pub async fn post_raw(
        &self,
        path: &str,
        body: Vec<u8>,
        requires_auth: bool,
    ) -> Result<DataResponse, ApiError> {
        self.call(Method::Post, path, Body::Raw(body), requires_auth)
            .await
    }

    /// Issue one call against the backend and normalize the response.
    ///
    /// Pre-flight checks (empty path, missing token) fail before any I/O.
    /// GET requests never carry a body regardless of the `body` argument.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Body,
        requires_auth: bool,
    ) -> Result<DataResponse, ApiError> {
        if path.is_empty() {
            return Err(ApiError::InvalidRequest("path is empty".to_string()));
        }

        let token = if requires_auth {
            match self.state.token() {
                Some(t) if !t.is_empty() => Some(t),
                _ => return Err(ApiError::Unauthenticated),
            }
        } else {
            None
        };

        let url = format!("{}/{}", self.host, path);
        tracing::debug!("{} {}", method.as_str(), url);

        let mut request = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        if method != Method::Get {
            request = match body {
                Body::Empty => request,
                Body::Json(value) => request.json(&value),
                Body::Raw(bytes) => request.body(bytes),
            };
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::OK {
            Ok(response.json::<DataResponse>().await?)
        } else if status == reqwest::StatusCode::FORBIDDEN {
            // Authorization denial is in-band: resolve, don't fail.
            Ok(DataResponse {
                code: 403,
                message: "Forbidden".to_string(),
                data: None,
            })
        } else {
            tracing::warn!("{} {} failed with status {}", method.as_str(), url, status);
            Err(ApiError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::session::UserSummary;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(host: &str) -> (ApiClient, Arc<SessionState>) {
        let state = Arc::new(SessionState::empty());
        let config = ConsoleConfig {
            api_host: host.to_string(),
            ..ConsoleConfig::default()
        };
        let client = ApiClient::new(&config, state.clone()).unwrap();
        (client, state)
    }

    fn admin_user() -> UserSummary {
        UserSummary {
            id: 1,
            name: "admin".to_string(),
            email: "admin@example.com".to_string(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn empty_path_fails_before_io() {
        // No mock server at all: a network attempt would error differently.
        let (client, _state) = test_client("http://127.0.0.1:1");
        let err = client.get("", false).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));

        let err = client.post("", &json!({}), true).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn protected_call_without_token_never_hits_transport() {
        let server = MockServer::start().await;
        // expect(0) turns any received request into a verification failure.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (client, _state) = test_client(&server.uri());
        let err = client.get("category/get_all", true).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn ok_response_parses_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/category/get_all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "message": "ok",
                "data": [{"id": 1, "name": "Drinks"}]
            })))
            .mount(&server)
            .await;

        let (client, _state) = test_client(&server.uri());
        let res = client.get("category/get_all", false).await.unwrap();
        assert_eq!(res.code, 200);
        assert_eq!(res.message, "ok");
        assert!(res.data.is_some());
        assert!(!res.is_forbidden());
    }

    #[tokio::test]
    async fn forbidden_resolves_as_envelope_not_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/category/add"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let (client, state) = test_client(&server.uri());
        state.set_token(Some("tok".to_string()));
        state.set_user(Some(admin_user()));

        let res = client
            .post("category/add", &json!({"name": "x"}), true)
            .await
            .unwrap();
        assert_eq!(res.code, 403);
        assert_eq!(res.message, "Forbidden");
        assert!(res.data.is_none());
        assert!(res.is_forbidden());
    }

    #[tokio::test]
    async fn other_statuses_fail_with_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/product/get_all"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (client, _state) = test_client(&server.uri());
        let err = client.get("product/get_all", false).await.unwrap_err();
        assert!(matches!(err, ApiError::Status(500)));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_network_error() {
        // Nothing listens on port 1.
        let (client, _state) = test_client("http://127.0.0.1:1");
        let err = client.get("category/get_all", false).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn bearer_header_and_json_body_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/attribute/add"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"name": "color"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "message": "ok", "data": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, state) = test_client(&server.uri());
        state.set_token(Some("secret-token".to_string()));
        state.set_user(Some(admin_user()));

        client
            .post("attribute/add", &json!({"name": "color"}), true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn raw_body_omits_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "message": "ok", "data": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _state) = test_client(&server.uri());
        let res = client
            .post_raw("product/upload", b"\xff\xd8binary".to_vec(), false)
            .await
            .unwrap();
        assert_eq!(res.code, 200);

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("content-type"));
        assert_eq!(received[0].body, b"\xff\xd8binary".to_vec());
    }

    #[tokio::test]
    async fn get_never_carries_a_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/category/get_all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "message": "ok", "data": []
            })))
            .mount(&server)
            .await;

        let (client, _state) = test_client(&server.uri());
        client
            .call(
                Method::Get,
                "category/get_all",
                Body::Json(json!({"ignored": true})),
                false,
            )
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        assert!(received[0].body.is_empty());
    }
}
