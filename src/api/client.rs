//! Microservice HTTP Client
//!
//! Shared request plumbing for every service wrapper: resolve the service's
//! base URL, attach the bearer token, send, and normalize failures into
//! [`ApiError`].

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;

/// Paths that must never carry a bearer token
const AUTH_EXEMPT_PATHS: [&str; 2] = ["/authentication/sign-in", "/authentication/sign-up"];

/// The backend microservices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Iam,
    Residents,
    Appointments,
    Payments,
    Notifications,
    Food,
    Users,
}

impl Service {
    pub const ALL: [Service; 7] = [
        Service::Iam,
        Service::Residents,
        Service::Appointments,
        Service::Payments,
        Service::Notifications,
        Service::Food,
        Service::Users,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Service::Iam => "iam",
            Service::Residents => "residents",
            Service::Appointments => "appointments",
            Service::Payments => "payments",
            Service::Notifications => "notifications",
            Service::Food => "food",
            Service::Users => "users",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of the bearer token attached to outgoing requests
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Fixed token, mostly useful for scripts and tests
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Resolved base URL of each service
#[derive(Debug, Clone)]
pub struct Endpoints {
    iam: String,
    residents: String,
    appointments: String,
    payments: String,
    notifications: String,
    food: String,
    users: String,
}

impl Endpoints {
    /// Every service behind the same gateway
    pub fn uniform(base_url: &str) -> Self {
        let base = normalize_base(base_url);
        Self {
            iam: base.clone(),
            residents: base.clone(),
            appointments: base.clone(),
            payments: base.clone(),
            notifications: base.clone(),
            food: base.clone(),
            users: base,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        let mut endpoints = Self::uniform(&config.base_url);
        let overrides = &config.services;
        for (service, url) in [
            (Service::Iam, &overrides.iam),
            (Service::Residents, &overrides.residents),
            (Service::Appointments, &overrides.appointments),
            (Service::Payments, &overrides.payments),
            (Service::Notifications, &overrides.notifications),
            (Service::Food, &overrides.food),
            (Service::Users, &overrides.users),
        ] {
            if let Some(url) = url {
                *endpoints.slot_mut(service) = normalize_base(url);
            }
        }
        endpoints
    }

    pub fn base(&self, service: Service) -> &str {
        match service {
            Service::Iam => &self.iam,
            Service::Residents => &self.residents,
            Service::Appointments => &self.appointments,
            Service::Payments => &self.payments,
            Service::Notifications => &self.notifications,
            Service::Food => &self.food,
            Service::Users => &self.users,
        }
    }

    fn slot_mut(&mut self, service: Service) -> &mut String {
        match service {
            Service::Iam => &mut self.iam,
            Service::Residents => &mut self.residents,
            Service::Appointments => &mut self.appointments,
            Service::Payments => &mut self.payments,
            Service::Notifications => &mut self.notifications,
            Service::Food => &mut self.food,
            Service::Users => &mut self.users,
        }
    }
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Percent-encode a string id for use as a single path segment
pub fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

pub(crate) fn is_auth_exempt(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    AUTH_EXEMPT_PATHS
        .iter()
        .any(|exempt| path.ends_with(exempt))
}

/// HTTP client shared by all service wrappers. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Arc<Endpoints>,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenSource>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("carehub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::from_transport)?;

        Ok(Self::with_http(http, Endpoints::from_config(config), tokens))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_http(http: Client, endpoints: Endpoints, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            endpoints: Arc::new(endpoints),
            tokens,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Absolute URL of `path` on `service`
    pub fn url(&self, service: Service, path: &str) -> String {
        format!("{}{}", self.endpoints.base(service), path)
    }

    /// Start a request, with the bearer token attached unless the path is auth-exempt
    pub fn request(&self, method: Method, service: Service, path: &str) -> RequestBuilder {
        let url = self.url(service, path);
        tracing::debug!(%method, %url, service = %service, "API request");

        let builder = self.http.request(method, url);
        if is_auth_exempt(path) {
            return builder;
        }
        match self.tokens.token().filter(|t| !t.is_empty()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Build a request without sending it
    pub fn build_request(
        &self,
        method: Method,
        service: Service,
        path: &str,
    ) -> ApiResult<reqwest::Request> {
        self.request(method, service, path)
            .build()
            .map_err(ApiError::from_transport)
    }

    pub async fn get<T: DeserializeOwned>(&self, service: Service, path: &str) -> ApiResult<T> {
        self.send_json(self.request(Method::GET, service, path))
            .await
    }

    pub async fn get_with_query<T, Q>(&self, service: Service, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::GET, service, path).query(query))
            .await
    }

    pub async fn post<B, T>(&self, service: Service, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, service, path).json(body))
            .await
    }

    pub async fn put<B, T>(&self, service: Service, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PUT, service, path).json(body))
            .await
    }

    pub async fn delete(&self, service: Service, path: &str) -> ApiResult<()> {
        self.dispatch(self.request(Method::DELETE, service, path))
            .await
            .map(|_| ())
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.dispatch(builder).await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;

        // Some endpoints answer 200/204 with an empty body
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(status, error = %e, "Unexpected response body");
            ApiError::from_decode(status, e)
        })
    }

    async fn dispatch(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|e| {
            let err = ApiError::from_transport(e);
            tracing::warn!(message = %err.message, "API request failed to complete");
            err
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let err = ApiError::from_response(response).await;
        tracing::warn!(
            %url,
            status = ?err.status,
            message = %err.message,
            "API request failed"
        );
        Err(err)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, ServiceUrls};
    use reqwest::header::AUTHORIZATION;

    fn client_with_token(token: Option<&str>) -> ApiClient {
        ApiClient::new(
            &ApiConfig::default(),
            Arc::new(StaticToken(token.map(str::to_string))),
        )
        .unwrap()
    }

    #[test]
    fn test_bearer_attached() {
        let client = client_with_token(Some("abc123"));
        let request = client
            .build_request(Method::GET, Service::Residents, "/residents")
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/v1/residents"
        );
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_auth_paths_exempt() {
        let client = client_with_token(Some("abc123"));
        for path in ["/authentication/sign-in", "/authentication/sign-up"] {
            let request = client.build_request(Method::POST, Service::Iam, path).unwrap();
            assert!(request.headers().get(AUTHORIZATION).is_none(), "{path}");
        }

        let request = client.build_request(Method::GET, Service::Iam, "/users").unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_some());
    }

    #[test]
    fn test_no_token_no_header() {
        for token in [None, Some("")] {
            let client = client_with_token(token);
            let request = client
                .build_request(Method::GET, Service::Food, "/food-entries")
                .unwrap();
            assert!(request.headers().get(AUTHORIZATION).is_none());
        }
    }

    #[test]
    fn test_service_overrides() {
        let config = ApiConfig {
            base_url: "http://gateway:8080/api/v1/".into(),
            timeout_ms: 1000,
            services: ServiceUrls {
                payments: Some("http://payments:8082/api/v1/".into()),
                ..ServiceUrls::default()
            },
        };
        let endpoints = Endpoints::from_config(&config);
        assert_eq!(endpoints.base(Service::Payments), "http://payments:8082/api/v1");
        assert_eq!(endpoints.base(Service::Residents), "http://gateway:8080/api/v1");
        assert_eq!(endpoints.base(Service::Iam), "http://gateway:8080/api/v1");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("n_abc"), "n_abc");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_is_auth_exempt() {
        assert!(is_auth_exempt("/authentication/sign-in"));
        assert!(is_auth_exempt("/api/v1/authentication/sign-up?x=1"));
        assert!(!is_auth_exempt("/authentication/health"));
        assert!(!is_auth_exempt("/users"));
    }
}
