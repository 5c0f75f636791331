//! Intent definitions.
//!
//! Intents are inert: they carry the parameters of a requested transition and nothing else.
//! Stores interpret them and answer with an [`Outcome`]. Action type strings follow the
//! `"[Label] Verb"` form and are what dispatch logging records.

use clinic_types::{Entity, Resource};
use std::fmt;
use std::marker::PhantomData;

/// Intents handled by an entity store.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityIntent<E> {
    LoadAll { force: bool },
    LoadById(i64),
    Create(E),
    Update(E),
    Delete(i64),
}

impl<E: Entity> EntityIntent<E> {
    /// A cache-eligible "load all".
    pub fn load_all() -> Self {
        EntityIntent::LoadAll { force: false }
    }

    pub fn action_type(&self) -> String {
        let verb = match self {
            EntityIntent::LoadAll { .. } => "Load All",
            EntityIntent::LoadById(_) => "Load By Id",
            EntityIntent::Create(_) => "Create",
            EntityIntent::Update(_) => "Update",
            EntityIntent::Delete(_) => "Delete",
        };
        format!("[{}] {}", E::LABEL, verb)
    }
}

/// The only intent a list store handles.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadList<T> {
    pub force: bool,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> LoadList<T> {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            _resource: PhantomData,
        }
    }

    pub fn action_type(&self) -> String {
        format!("[{}] Load All", T::LABEL)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum AuthIntent {
    Login { email: String, password: String },
    Logout,
    RefreshToken,
}

impl AuthIntent {
    pub fn action_type(&self) -> &'static str {
        match self {
            AuthIntent::Login { .. } => "[Auth] Login",
            AuthIntent::Logout => "[Auth] Logout",
            AuthIntent::RefreshToken => "[Auth] Refresh Token",
        }
    }
}

// Never print the password.
impl fmt::Debug for AuthIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthIntent::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            AuthIntent::Logout => f.write_str("Logout"),
            AuthIntent::RefreshToken => f.write_str("RefreshToken"),
        }
    }
}

/// How an intent terminated. Intents never fail past the store; failures end up here and in the
/// table's `error` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The repository was called and the table updated.
    Applied,
    /// A fresh table satisfied the request; nothing was called.
    CacheHit,
    /// The intent had nothing to do.
    Skipped,
    /// The intent failed with the given message.
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}
