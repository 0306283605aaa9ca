//! In-process mock of the platform gateway
//!
//! Every request is recorded; replies are canned per `(method, path)` and
//! anything unregistered answers 404.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use carehub::api::{ApiClient, Endpoints, StaticToken, TokenSource};

/// Gateway prefix the client is pointed at
pub const PREFIX: &str = "/api/v1";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path below [`PREFIX`], still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct Backend {
    replies: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockServer {
    pub base_url: String,
    backend: Backend,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        let backend = Backend::default();
        let app = Router::new().fallback(handle).with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{addr}{PREFIX}"),
            backend,
            handle,
        }
    }

    /// Answer `method path` with a JSON body
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.on_text(method, path, status, &body.to_string())
    }

    /// Answer `method path` with a raw body
    pub fn on_text(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.backend
            .replies
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.backend.requests.lock().unwrap().clone()
    }

    /// Requests to `path`, in arrival order
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn client(&self, token: Option<&str>) -> ApiClient {
        self.client_with(Arc::new(StaticToken(token.map(str::to_string))))
    }

    pub fn client_with(&self, tokens: Arc<dyn TokenSource>) -> ApiClient {
        ApiClient::with_http(
            reqwest::Client::new(),
            Endpoints::uniform(&self.base_url),
            tokens,
        )
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix(PREFIX).unwrap_or(uri.path()).to_string();
    backend.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    let reply = backend
        .replies
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();
    let (status, body) = reply.unwrap_or((404, r#"{"message":"No such route"}"#.to_string()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}
