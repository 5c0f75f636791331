//! Repository Service capabilities.
//!
//! A backend may support only some operations for a given entity, so each operation is its own
//! trait and a store is composed with an explicit [`Capabilities`] set. An absent capability is
//! known at composition time; when an intent needs it the store records a descriptive error
//! instead of calling anything.

use crate::error::RepositoryResult;
use async_trait::async_trait;
use clinic_types::Role;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ENTITY CAPABILITIES
// ============================================================================

#[async_trait]
pub trait List<T>: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<T>>;
}

#[async_trait]
pub trait GetById<E>: Send + Sync {
    /// `Ok(None)` when the backend has no such record.
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<E>>;
}

#[async_trait]
pub trait Create<E>: Send + Sync {
    /// Returns the stored record, or `None` when the backend answers without a body.
    async fn create(&self, payload: &E) -> RepositoryResult<Option<E>>;
}

#[async_trait]
pub trait Update<E>: Send + Sync {
    /// Returns the stored record, or `None` when the backend answers without a body.
    async fn update(&self, id: i64, payload: &E) -> RepositoryResult<Option<E>>;
}

#[async_trait]
pub trait Delete<E>: Send + Sync {
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

/// A repository supporting every entity operation.
pub trait CrudRepository<E>: List<E> + GetById<E> + Create<E> + Update<E> + Delete<E> {}

impl<E, R> CrudRepository<E> for R where R: List<E> + GetById<E> + Create<E> + Update<E> + Delete<E> {}

/// The operation an intent needed. Used to name a missing capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    GetById,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::GetById => "get-by-id",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operations a store may call for entity `E`.
pub struct Capabilities<E> {
    pub list: Option<Arc<dyn List<E>>>,
    pub get_by_id: Option<Arc<dyn GetById<E>>>,
    pub create: Option<Arc<dyn Create<E>>>,
    pub update: Option<Arc<dyn Update<E>>>,
    pub delete: Option<Arc<dyn Delete<E>>>,
}

impl<E> Clone for Capabilities<E> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            get_by_id: self.get_by_id.clone(),
            create: self.create.clone(),
            update: self.update.clone(),
            delete: self.delete.clone(),
        }
    }
}

impl<E> Default for Capabilities<E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<E> fmt::Debug for Capabilities<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("list", &self.list.is_some())
            .field("get_by_id", &self.get_by_id.is_some())
            .field("create", &self.create.is_some())
            .field("update", &self.update.is_some())
            .field("delete", &self.delete.is_some())
            .finish()
    }
}

impl<E> Capabilities<E> {
    /// No operations at all.
    pub fn none() -> Self {
        Self {
            list: None,
            get_by_id: None,
            create: None,
            update: None,
            delete: None,
        }
    }
}

impl<E: 'static> Capabilities<E> {
    /// Every operation, served by one repository.
    pub fn full<R>(repository: Arc<R>) -> Self
    where
        R: CrudRepository<E> + 'static,
    {
        let list: Arc<dyn List<E>> = repository.clone();
        let get_by_id: Arc<dyn GetById<E>> = repository.clone();
        let create: Arc<dyn Create<E>> = repository.clone();
        let update: Arc<dyn Update<E>> = repository.clone();
        let delete: Arc<dyn Delete<E>> = repository;
        Self {
            list: Some(list),
            get_by_id: Some(get_by_id),
            create: Some(create),
            update: Some(update),
            delete: Some(delete),
        }
    }

    pub fn with_list(mut self, list: Arc<dyn List<E>>) -> Self {
        self.list = Some(list);
        self
    }

    pub fn with_get_by_id(mut self, get_by_id: Arc<dyn GetById<E>>) -> Self {
        self.get_by_id = Some(get_by_id);
        self
    }

    pub fn with_create(mut self, create: Arc<dyn Create<E>>) -> Self {
        self.create = Some(create);
        self
    }

    pub fn with_update(mut self, update: Arc<dyn Update<E>>) -> Self {
        self.update = Some(update);
        self
    }

    pub fn with_delete(mut self, delete: Arc<dyn Delete<E>>) -> Self {
        self.delete = Some(delete);
        self
    }

    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::List => self.list.is_some(),
            Operation::GetById => self.get_by_id.is_some(),
            Operation::Create => self.create.is_some(),
            Operation::Update => self.update.is_some(),
            Operation::Delete => self.delete.is_some(),
        }
    }
}

// ============================================================================
// AUTH
// ============================================================================

/// What the backend returns for a successful login.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: Option<String>,
    pub role: Option<Role>,
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> RepositoryResult<LoginResponse>;
}

/// Supplies the bearer credential attached to backend requests.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}
