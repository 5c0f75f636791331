//! Normalised CRUD-cache store.
//!
//! One [`EntityStore`] exists per entity type (doctors, patients, visits). It owns an
//! [`EntityTable`], interprets [`EntityIntent`]s by calling the capabilities it was composed with,
//! and reconciles each result into the table.
//!
//! ## Request lifecycle
//!
//! Every request clears the previous error and raises `loading`, then awaits exactly one
//! repository call, then settles: `loading` drops on success and on failure, and a failure records
//! its message. Nothing is raised past the store; callers get an [`Outcome`].
//!
//! ## Concurrency
//!
//! The handle is cheap to clone. Table updates are synchronous and happen between awaits, so the
//! repository call is the only suspension point. Requests are neither deduplicated nor cancelled:
//! two overlapping intents both complete and apply in response order, and the first to finish
//! lowers `loading`. Late responses still write into the table.

use crate::cache::CachePolicy;
use crate::clock::{Clock, SystemClock};
use crate::intents::{EntityIntent, Outcome};
use crate::repository::{Capabilities, Operation};
use crate::state::{StateCell, Subscription};
use crate::table::EntityTable;
use crate::RepositoryError;
use clinic_types::Entity;
use std::sync::Arc;

pub struct EntityStore<E> {
    capabilities: Capabilities<E>,
    state: Arc<StateCell<EntityTable<E>>>,
    cache: CachePolicy,
    clock: Arc<dyn Clock>,
}

impl<E> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            capabilities: self.capabilities.clone(),
            state: self.state.clone(),
            cache: self.cache,
            clock: self.clock.clone(),
        }
    }
}

impl<E: Entity> EntityStore<E> {
    /// Creates a store with an empty table.
    ///
    /// # Arguments
    ///
    /// * `capabilities` - Repository operations this store may call
    /// * `cache` - Freshness window for "load all"
    /// * `clock` - Source of `last_fetched` stamps
    pub fn new(capabilities: Capabilities<E>, cache: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            capabilities,
            state: Arc::new(StateCell::new(EntityTable::default())),
            cache,
            clock,
        }
    }

    /// A store using the system clock and the default freshness window.
    pub fn with_capabilities(capabilities: Capabilities<E>) -> Self {
        Self::new(capabilities, CachePolicy::default(), Arc::new(SystemClock))
    }

    // ------------------------------------------------------------------------
    // Read views
    // ------------------------------------------------------------------------

    /// Every record, in first-seen order.
    pub fn select_all(&self) -> Vec<E> {
        self.state.read(|table| table.select_all())
    }

    pub fn select_by_id(&self, id: i64) -> Option<E> {
        self.state.read(|table| table.get(id).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|table| table.is_loading())
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read(|table| table.error().map(str::to_owned))
    }

    pub fn count(&self) -> usize {
        self.state.read(|table| table.count())
    }

    pub fn last_fetched(&self) -> Option<i64> {
        self.state.read(|table| table.last_fetched())
    }

    pub fn snapshot(&self) -> EntityTable<E> {
        self.state.get()
    }

    /// A live view of the table: the current snapshot now, then the latest after each change.
    pub fn subscribe(&self) -> Subscription<EntityTable<E>> {
        self.state.subscribe()
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    pub async fn dispatch(&self, intent: EntityIntent<E>) -> Outcome {
        let action = intent.action_type();
        tracing::debug!("dispatch {}", action);

        let outcome = match intent {
            EntityIntent::LoadAll { force } => self.load_all(force).await,
            EntityIntent::LoadById(id) => self.load_by_id(id).await,
            EntityIntent::Create(payload) => self.create(payload).await,
            EntityIntent::Update(payload) => self.update(payload).await,
            EntityIntent::Delete(id) => self.delete(id).await,
        };

        if let Outcome::Failed(message) = &outcome {
            tracing::warn!("{} failed: {}", action, message);
        }
        outcome
    }

    /// Loads every record unless a fresh table can be served from cache.
    pub async fn load_all(&self, force: bool) -> Outcome {
        let last_fetched = self.last_fetched();
        if self
            .cache
            .serves_from_cache(last_fetched, self.clock.now_millis(), force)
        {
            tracing::debug!("{} served from cache", E::PLURAL);
            return Outcome::CacheHit;
        }

        self.begin();
        let Some(list) = self.capabilities.list.clone() else {
            return self.missing(Operation::List);
        };

        match list.list().await {
            Ok(rows) => {
                let now = self.clock.now_millis();
                self.state.update(|table| {
                    table.upsert_many(rows, now);
                    table.flags_mut().settle();
                });
                Outcome::Applied
            }
            Err(err) => self.fail(&err, format!("Failed to load {}", E::PLURAL)),
        }
    }

    /// Loads one record and merges it; an empty answer leaves the table alone.
    pub async fn load_by_id(&self, id: i64) -> Outcome {
        self.begin();
        let Some(get_by_id) = self.capabilities.get_by_id.clone() else {
            return self.missing(Operation::GetById);
        };

        match get_by_id.get_by_id(id).await {
            Ok(Some(row)) => self.store(row),
            Ok(None) => {
                self.settle();
                Outcome::Applied
            }
            Err(err) => self.fail(&err, format!("Failed to load {}", E::SINGULAR)),
        }
    }

    /// Creates a record. When the backend returns nothing the payload itself is stored.
    pub async fn create(&self, payload: E) -> Outcome {
        self.begin();
        let Some(create) = self.capabilities.create.clone() else {
            return self.missing(Operation::Create);
        };

        match create.create(&payload).await {
            Ok(row) => self.store(row.unwrap_or(payload)),
            Err(err) => self.fail(&err, format!("Failed to create {}", E::SINGULAR)),
        }
    }

    /// Replaces a record. The identity is read from the payload itself.
    pub async fn update(&self, payload: E) -> Outcome {
        self.begin();
        let Some(update) = self.capabilities.update.clone() else {
            return self.missing(Operation::Update);
        };
        let Some(id) = payload.id() else {
            return self.fail_with(format!(
                "Failed to update {}: payload has no {}",
                E::SINGULAR,
                E::ID_FIELD
            ));
        };

        match update.update(id, &payload).await {
            Ok(row) => self.store(row.unwrap_or(payload)),
            Err(err) => self.fail(&err, format!("Failed to update {}", E::SINGULAR)),
        }
    }

    /// Deletes a record. Deleting an id the table does not hold is not an error.
    pub async fn delete(&self, id: i64) -> Outcome {
        self.begin();
        let Some(delete) = self.capabilities.delete.clone() else {
            return self.missing(Operation::Delete);
        };

        match delete.delete(id).await {
            Ok(()) => {
                self.state.update(|table| {
                    table.remove(id);
                    table.flags_mut().settle();
                });
                Outcome::Applied
            }
            Err(err) => self.fail(&err, format!("Failed to delete {}", E::SINGULAR)),
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn begin(&self) {
        self.state.update(|table| table.flags_mut().begin());
    }

    fn settle(&self) {
        self.state.update(|table| table.flags_mut().settle());
    }

    fn store(&self, row: E) -> Outcome {
        let now = self.clock.now_millis();
        self.state.update(|table| {
            table.upsert_one(row, now);
            table.flags_mut().settle();
        });
        Outcome::Applied
    }

    fn fail(&self, err: &RepositoryError, default_message: String) -> Outcome {
        self.fail_with(err.message_or(default_message))
    }

    fn fail_with(&self, message: String) -> Outcome {
        self.state
            .update(|table| table.flags_mut().fail(message.clone()));
        Outcome::Failed(message)
    }

    fn missing(&self, operation: Operation) -> Outcome {
        self.fail_with(format!(
            "no {} operation available for {}",
            operation,
            E::PLURAL
        ))
    }
}
