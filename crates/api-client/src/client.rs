//! Shared HTTP client.
//!
//! Wraps a `reqwest::Client` bound to the API base URL. Every request carries the bearer token
//! of the current session when a [`TokenProvider`] is attached, and every response is reduced to
//! a status plus an optional JSON body so the repositories can decide what a status means.

use crate::{ApiError, ApiResult};
use clinic_core::{ClinicConfig, RepositoryError, RepositoryResult, TokenProvider};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.tokens.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// The base URL is treated as a directory: `http://host/api` and `http://host/api/` both
    /// resolve `doctors` to `http://host/api/doctors`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if the URL does not parse, and
    /// [`ApiError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let mut normalised = base_url.trim().to_string();
        if !normalised.ends_with('/') {
            normalised.push('/');
        }
        let base = Url::parse(&normalised)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base,
            tokens: None,
        })
    }

    pub fn from_config(cfg: &ClinicConfig) -> ApiResult<Self> {
        Self::new(cfg.api_base_url(), cfg.http_timeout())
    }

    /// Attaches a source of bearer tokens; requests made without a token are sent anonymously.
    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str) -> RepositoryResult<Url> {
        self.base
            .join(path)
            .map_err(|e| RepositoryError::Transport(format!("invalid request path {path:?}: {e}")))
    }

    pub(crate) async fn send(&self, method: Method, path: &str) -> RepositoryResult<Reply> {
        let request = self.request(method, path)?;
        self.execute(request).await
    }

    pub(crate) async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> RepositoryResult<Reply>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self.request(method, path)?.json(body);
        self.execute(request).await
    }

    fn request(&self, method: Method, path: &str) -> RepositoryResult<RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(token) = self.tokens.as_ref().and_then(|t| t.bearer_token()) {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn execute(&self, request: RequestBuilder) -> RepositoryResult<Reply> {
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => Some(value),
                Err(e) if status.is_success() => {
                    return Err(RepositoryError::Decode(e.to_string()));
                }
                // Error pages are often HTML; the status alone is enough.
                Err(_) => None,
            }
        };

        Ok(Reply { status, body })
    }
}

/// A response reduced to what the repositories need.
#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) status: StatusCode,
    pub(crate) body: Option<Value>,
}

impl Reply {
    /// The body of a successful response, or the failure described by an unsuccessful one.
    ///
    /// A JSON `message` field in a failure body becomes the error message.
    pub(crate) fn into_body(self) -> RepositoryResult<Option<Value>> {
        if self.status.is_success() {
            return Ok(self.body);
        }

        let message = self
            .body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        tracing::warn!("request failed with status {}", self.status);

        Err(RepositoryError::Request {
            status: Some(self.status.as_u16()),
            message,
        })
    }

    pub(crate) fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}
