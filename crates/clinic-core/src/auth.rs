//! Auth session store.
//!
//! Holds the process-wide [`AuthSession`]. Every change is written to the `"auth"` session slot
//! and a new store starts from whatever that slot holds, so a login survives restarts. A failed
//! login is destructive: it resets the whole session, not only the fields of the new attempt.

use crate::constants::AUTH_SESSION_KEY;
use crate::intents::{AuthIntent, Outcome};
use crate::repository::{AuthRepository, TokenProvider};
use crate::session::SessionStorage;
use crate::state::{StateCell, Subscription};
use crate::ClinicError;
use clinic_types::Role;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl AuthSession {
    /// The session after a successful login. Authenticated only if the token is non-empty.
    pub fn signed_in(token: Option<String>, role: Option<Role>, user_email: impl Into<String>) -> Self {
        let is_authenticated = token.as_deref().is_some_and(|t| !t.is_empty());
        Self {
            token,
            role,
            user_email: Some(user_email.into()),
            is_authenticated,
        }
    }

    /// Recomputes `is_authenticated` from the token, which is the only source of truth for it.
    fn normalised(mut self) -> Self {
        self.is_authenticated = self.token.as_deref().is_some_and(|t| !t.is_empty());
        self
    }
}

#[derive(Clone)]
pub struct AuthStore {
    repository: Arc<dyn AuthRepository>,
    storage: Arc<dyn SessionStorage>,
    state: Arc<StateCell<AuthSession>>,
}

impl AuthStore {
    /// Creates the store, rehydrating the session from `storage`.
    ///
    /// A missing, unreadable or corrupt slot starts the store signed out.
    pub fn new(repository: Arc<dyn AuthRepository>, storage: Arc<dyn SessionStorage>) -> Self {
        let session = restore(storage.as_ref());
        Self {
            repository,
            storage,
            state: Arc::new(StateCell::new(session)),
        }
    }

    pub fn session(&self) -> AuthSession {
        self.state.get()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.state.read(|s| s.role)
    }

    pub fn user_email(&self) -> Option<String> {
        self.state.read(|s| s.user_email.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|s| s.is_authenticated)
    }

    pub fn subscribe(&self) -> Subscription<AuthSession> {
        self.state.subscribe()
    }

    pub async fn dispatch(&self, intent: AuthIntent) -> Outcome {
        tracing::debug!("dispatch {}", intent.action_type());
        match intent {
            AuthIntent::Login { email, password } => self.login(&email, &password).await,
            AuthIntent::Logout => self.logout(),
            AuthIntent::RefreshToken => self.refresh_token(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Outcome {
        match self.repository.login(email, password).await {
            Ok(response) => {
                let session = AuthSession::signed_in(response.token, response.role, email);
                if !session.is_authenticated {
                    tracing::warn!("login for {} returned no token", email);
                }
                self.commit(session);
                Outcome::Applied
            }
            Err(err) => {
                self.commit(AuthSession::default());
                let message = err.message_or("Failed to log in");
                tracing::warn!("[Auth] Login failed: {}", message);
                Outcome::Failed(message)
            }
        }
    }

    pub fn logout(&self) -> Outcome {
        self.commit(AuthSession::default());
        Outcome::Applied
    }

    /// There is no refresh contract with the backend yet, so this never changes the session.
    pub fn refresh_token(&self) -> Outcome {
        if self.token().is_none() {
            tracing::debug!("no token to refresh");
        }
        Outcome::Skipped
    }

    fn commit(&self, session: AuthSession) {
        let persisted = serde_json::to_string(&session)
            .map_err(ClinicError::Serialization)
            .and_then(|raw| self.storage.save(AUTH_SESSION_KEY, &raw));
        if let Err(err) = persisted {
            tracing::warn!("failed to persist auth session: {}", err);
        }
        self.state.replace(session);
    }
}

impl TokenProvider for AuthStore {
    fn bearer_token(&self) -> Option<String> {
        self.token().filter(|t| !t.is_empty())
    }
}

fn restore(storage: &dyn SessionStorage) -> AuthSession {
    let raw = match storage.load(AUTH_SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AuthSession::default(),
        Err(err) => {
            tracing::warn!("failed to read auth session: {}", err);
            return AuthSession::default();
        }
    };

    match serde_json::from_str::<AuthSession>(&raw).map_err(ClinicError::Deserialization) {
        Ok(session) => session.normalised(),
        Err(err) => {
            tracing::warn!("discarding stored auth session: {}", err);
            AuthSession::default()
        }
    }
}
