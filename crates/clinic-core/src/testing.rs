//! In-memory repositories for store tests.

use crate::error::{RepositoryError, RepositoryResult};
use crate::repository::{
    AuthRepository, Create, Delete, GetById, List, LoginResponse, Update,
};
use async_trait::async_trait;
use clinic_types::Entity;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted repository: serves `rows`, answers create/update with `response`, and fails every
/// call while a failure is set. Counts calls per operation.
pub(crate) struct FakeRepository<E> {
    rows: Mutex<Vec<E>>,
    response: Mutex<Option<E>>,
    failure: Mutex<Option<RepositoryError>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    last_update_id: Mutex<Option<i64>>,
}

impl<E: Entity> FakeRepository<E> {
    pub(crate) fn with_rows(rows: Vec<E>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            response: Mutex::new(None),
            failure: Mutex::new(None),
            calls: Mutex::new(HashMap::new()),
            last_update_id: Mutex::new(None),
        })
    }

    pub(crate) fn set_rows(&self, rows: Vec<E>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub(crate) fn respond_with(&self, response: Option<E>) {
        *self.response.lock().unwrap() = response;
    }

    pub(crate) fn fail_with(&self, err: RepositoryError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub(crate) fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub(crate) fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn last_update_id(&self) -> Option<i64> {
        *self.last_update_id.lock().unwrap()
    }

    fn record(&self, operation: &'static str) -> RepositoryResult<()> {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<E: Entity> List<E> for FakeRepository<E> {
    async fn list(&self) -> RepositoryResult<Vec<E>> {
        self.record("list")?;
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[async_trait]
impl<E: Entity> GetById<E> for FakeRepository<E> {
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<E>> {
        self.record("get_by_id")?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id() == Some(id))
            .cloned())
    }
}

#[async_trait]
impl<E: Entity> Create<E> for FakeRepository<E> {
    async fn create(&self, _payload: &E) -> RepositoryResult<Option<E>> {
        self.record("create")?;
        Ok(self.response.lock().unwrap().clone())
    }
}

#[async_trait]
impl<E: Entity> Update<E> for FakeRepository<E> {
    async fn update(&self, id: i64, _payload: &E) -> RepositoryResult<Option<E>> {
        self.record("update")?;
        *self.last_update_id.lock().unwrap() = Some(id);
        Ok(self.response.lock().unwrap().clone())
    }
}

#[async_trait]
impl<E: Entity> Delete<E> for FakeRepository<E> {
    async fn delete(&self, _id: i64) -> RepositoryResult<()> {
        self.record("delete")
    }
}

/// A list capability that holds its answer until released.
pub(crate) struct GatedList<T> {
    rows: Vec<T>,
    gate: Notify,
}

impl<T> GatedList<T> {
    pub(crate) fn new(rows: Vec<T>) -> Arc<Self> {
        Arc::new(Self {
            rows,
            gate: Notify::new(),
        })
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> List<T> for GatedList<T> {
    async fn list(&self) -> RepositoryResult<Vec<T>> {
        self.gate.notified().await;
        Ok(self.rows.clone())
    }
}

/// Answers the n-th list call from the n-th gate, so overlapping calls can be released in any
/// order. Calls past the last gate answer with no rows.
pub(crate) struct QueuedList<T> {
    gates: Vec<Arc<GatedList<T>>>,
    calls: AtomicUsize,
}

impl<T> QueuedList<T> {
    pub(crate) fn new(gates: Vec<Arc<GatedList<T>>>) -> Arc<Self> {
        Arc::new(Self {
            gates,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> List<T> for QueuedList<T> {
    async fn list(&self) -> RepositoryResult<Vec<T>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.gates.get(call) {
            Some(gate) => gate.list().await,
            None => Ok(Vec::new()),
        }
    }
}

/// Login backend that accepts one password.
pub(crate) struct FakeAuth {
    pub(crate) password: String,
    pub(crate) response: LoginResponse,
}

#[async_trait]
impl AuthRepository for FakeAuth {
    async fn login(&self, _email: &str, password: &str) -> RepositoryResult<LoginResponse> {
        if password == self.password {
            Ok(self.response.clone())
        } else {
            Err(RepositoryError::Request {
                status: Some(401),
                message: Some("Invalid credentials".into()),
            })
        }
    }
}
