//! Panel HTTP client for the Application API.
//!
//! [`PanelClient`] wraps a configured [`reqwest::Client`] with the headers
//! every Application API call needs:
//!
//! - `Authorization: Bearer <token>`
//! - `Accept: Application/vnd.pterodactyl.v1+json`
//! - `Content-Type: application/json`
//! - the configured User-Agent
//!
//! [`LazyPanelClient`] defers building the client (and reading its config)
//! until the first request, so a process can start and describe its tools
//! without panel credentials.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::config::PanelConfig;
use crate::engine::PanelApi;
use crate::error::SearchError;
use crate::types::Method;

/// Media type the Application API expects in `Accept`.
pub const PANEL_ACCEPT: &str = "Application/vnd.pterodactyl.v1+json";

/// Build a [`reqwest::Client`] configured for the panel.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the token or User-Agent cannot be
/// used as a header value or the timeout is negative, or [`SearchError::Http`] if the client cannot
/// be constructed.
pub fn build_client(config: &PanelConfig) -> Result<reqwest::Client, SearchError> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.panel_token))
        .map_err(|_| SearchError::Config("panel_token contains invalid characters".into()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static(PANEL_ACCEPT));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|_| SearchError::Config("user_agent contains invalid characters".into()))?;

    let timeout = Duration::try_from_secs_f64(config.timeout_seconds)
        .map_err(|e| SearchError::Config(format!("invalid timeout_seconds: {e}")))?;

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(user_agent)
        .timeout(timeout)
        .danger_accept_invalid_certs(!config.verify_ssl)
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Authenticated client for one panel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PanelClient {
    http: reqwest::Client,
    base_url: String,
}

impl PanelClient {
    /// Validate `config` and build a client for it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid config, or the
    /// errors of [`build_client`].
    pub fn new(config: &PanelConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            http: build_client(config)?,
            base_url: config.panel_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PanelApi for PanelClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, SearchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(to_reqwest(method), &url)
            .query(query);
        if let Some(body) = body {
            req = req.json(body);
        }

        tracing::debug!(%method, path, "panel request");
        let resp = req
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("{method} {path} failed: {e}")))?;

        let status = resp.status().as_u16();
        if status == 204 {
            return Ok(serde_json::json!({ "status": 204 }));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("failed to read response body: {e}")))?;
        let payload = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if status >= 400 {
            tracing::debug!(%method, path, status, "panel returned error status");
            let body = match payload {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(SearchError::Api { status, body });
        }

        Ok(payload)
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

type ConfigLoader = Arc<dyn Fn() -> Result<PanelConfig, SearchError> + Send + Sync>;

/// A [`PanelClient`] built on first use from a config loader.
///
/// A failed load is not cached; the next request tries again.
#[derive(Clone)]
pub struct LazyPanelClient {
    loader: ConfigLoader,
    client: Arc<OnceCell<PanelClient>>,
}

impl LazyPanelClient {
    /// Build the client from `loader` on the first request.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<PanelConfig, SearchError> + Send + Sync + 'static,
    {
        Self {
            loader: Arc::new(loader),
            client: Arc::new(OnceCell::new()),
        }
    }

    /// Read the config from the environment (see [`PanelConfig::from_env`]).
    pub fn from_env() -> Self {
        Self::new(PanelConfig::from_env)
    }

    /// Use an already loaded config.
    pub fn from_config(config: PanelConfig) -> Self {
        Self::new(move || Ok(config.clone()))
    }

    /// Whether the underlying client has been built.
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> Result<&PanelClient, SearchError> {
        self.client
            .get_or_try_init(|| async {
                let config = (self.loader)()?;
                tracing::info!(panel_url = %config.panel_url, "initialising panel client");
                PanelClient::new(&config)
            })
            .await
    }
}

impl std::fmt::Debug for LazyPanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyPanelClient")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl PanelApi for LazyPanelClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, SearchError> {
        self.client().await?.request(method, path, query, body).await
    }
}
