//! # API Client
//!
//! HTTP implementations of the clinic repository capabilities.
//!
//! - [`ApiClient`]: shared `reqwest` client bound to the API base URL, attaching bearer tokens
//! - [`HttpRepository`]: the five entity operations against one REST resource
//! - [`HttpAuthService`]: `POST /auth/login`
//! - [`connect`]: wires a full [`clinic_core::ClinicStores`] from configuration
//!
//! Failures surface to the stores as [`clinic_core::RepositoryError`]; the JSON `message` field
//! of an error response is carried through so the dashboards can show it verbatim.

pub mod auth;
pub mod client;
pub mod compose;
pub mod repository;

pub use auth::HttpAuthService;
pub use client::ApiClient;
pub use compose::{connect, connect_with_storage};
pub use repository::HttpRepository;

/// Errors raised while building the client stack.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<ApiError> for clinic_core::RepositoryError {
    fn from(err: ApiError) -> Self {
        clinic_core::RepositoryError::Transport(err.to_string())
    }
}
