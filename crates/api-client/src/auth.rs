//! Login over HTTP.

use crate::client::ApiClient;
use async_trait::async_trait;
use clinic_core::{AuthRepository, LoginResponse, RepositoryResult};
use clinic_types::Role;
use reqwest::Method;
use serde::{Deserialize, Serialize};

const LOGIN_PATH: &str = "auth/login";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl LoginBody {
    fn into_response(self) -> LoginResponse {
        let role = self.role.and_then(|raw| match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!("ignoring login role: {}", err);
                None
            }
        });
        LoginResponse {
            token: self.token,
            role,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpAuthService {
    client: ApiClient,
}

impl HttpAuthService {
    /// The client should not carry a token provider; login requests are anonymous.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthService {
    async fn login(&self, email: &str, password: &str) -> RepositoryResult<LoginResponse> {
        let body = self
            .client
            .send_json(Method::POST, LOGIN_PATH, &Credentials { email, password })
            .await?
            .into_body()?;

        let parsed = match body {
            Some(value) => serde_json::from_value::<LoginBody>(value)
                .map_err(|e| clinic_core::RepositoryError::Decode(e.to_string()))?,
            None => LoginBody::default(),
        };
        Ok(parsed.into_response())
    }
}
