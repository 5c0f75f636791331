//! List store for records that are not normalised by identity (fees, activity log).

use crate::cache::CachePolicy;
use crate::clock::{Clock, SystemClock};
use crate::intents::{LoadList, Outcome};
use crate::repository::{List, Operation};
use crate::state::{StateCell, Subscription};
use crate::table::EntityList;
use clinic_types::Resource;
use std::sync::Arc;

/// Holds the last fetched sequence of `T` and reloads it when the cache window has passed.
pub struct ListStore<T> {
    list: Option<Arc<dyn List<T>>>,
    state: Arc<StateCell<EntityList<T>>>,
    cache: CachePolicy,
    clock: Arc<dyn Clock>,
}

impl<T> Clone for ListStore<T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            state: self.state.clone(),
            cache: self.cache,
            clock: self.clock.clone(),
        }
    }
}

impl<T: Resource> ListStore<T> {
    pub fn new(list: Option<Arc<dyn List<T>>>, cache: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            list,
            state: Arc::new(StateCell::new(EntityList::default())),
            cache,
            clock,
        }
    }

    pub fn with_list(list: Arc<dyn List<T>>) -> Self {
        Self::new(Some(list), CachePolicy::default(), Arc::new(SystemClock))
    }

    pub fn data(&self) -> Vec<T> {
        self.state.read(|list| list.data().to_vec())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|list| list.is_loading())
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read(|list| list.error().map(str::to_owned))
    }

    pub fn count(&self) -> usize {
        self.state.read(|list| list.count())
    }

    pub fn last_fetched(&self) -> Option<i64> {
        self.state.read(|list| list.last_fetched())
    }

    pub fn subscribe(&self) -> Subscription<EntityList<T>> {
        self.state.subscribe()
    }

    pub async fn dispatch(&self, intent: LoadList<T>) -> Outcome {
        let action = intent.action_type();
        tracing::debug!("dispatch {}", action);

        let outcome = self.load_all(intent.force).await;
        if let Outcome::Failed(message) = &outcome {
            tracing::warn!("{} failed: {}", action, message);
        }
        outcome
    }

    /// Replaces the sequence unless the cached one is still fresh.
    pub async fn load_all(&self, force: bool) -> Outcome {
        if self
            .cache
            .serves_from_cache(self.last_fetched(), self.clock.now_millis(), force)
        {
            return Outcome::CacheHit;
        }

        self.state.update(|list| list.flags_mut().begin());
        let Some(list) = self.list.clone() else {
            let message = format!("no {} operation available for {}", Operation::List, T::PLURAL);
            self.state
                .update(|list| list.flags_mut().fail(message.clone()));
            return Outcome::Failed(message);
        };

        match list.list().await {
            Ok(rows) => {
                let now = self.clock.now_millis();
                self.state.update(|list| {
                    list.replace(rows, now);
                    list.flags_mut().settle();
                });
                Outcome::Applied
            }
            Err(err) => {
                let message = err.message_or(format!("Failed to load {}", T::PLURAL));
                self.state
                    .update(|list| list.flags_mut().fail(message.clone()));
                Outcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use clinic_types::{Activity, Fee};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct FeeList {
        calls: AtomicUsize,
        result: Mutex<RepositoryResult<Vec<Fee>>>,
    }

    #[async_trait]
    impl List<Fee> for FeeList {
        async fn list(&self) -> RepositoryResult<Vec<Fee>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.lock().unwrap().clone()
        }
    }

    fn fee(amount: f64) -> Fee {
        Fee {
            amount: Some(amount),
            ..Fee::default()
        }
    }

    fn fee_store(result: RepositoryResult<Vec<Fee>>) -> (ListStore<Fee>, Arc<FeeList>, Arc<ManualClock>) {
        let repo = Arc::new(FeeList {
            calls: AtomicUsize::new(0),
            result: Mutex::new(result),
        });
        let clock = Arc::new(ManualClock::new(0));
        let list: Arc<dyn List<Fee>> = repo.clone();
        let store = ListStore::new(
            Some(list),
            CachePolicy::new(Duration::from_secs(120)),
            clock.clone(),
        );
        (store, repo, clock)
    }

    #[tokio::test]
    async fn test_load_replaces_data_and_caches_for_two_minutes() {
        let (store, repo, clock) = fee_store(Ok(vec![fee(10.0), fee(20.0)]));

        assert_eq!(store.dispatch(LoadList::new(false)).await, Outcome::Applied);
        assert_eq!(store.count(), 2);

        clock.advance(Duration::from_secs(60));
        assert_eq!(store.load_all(false).await, Outcome::CacheHit);

        *repo.result.lock().unwrap() = Ok(vec![fee(30.0)]);
        clock.advance(Duration::from_secs(60));
        assert_eq!(store.load_all(false).await, Outcome::Applied);
        assert_eq!(store.data(), vec![fee(30.0)]);
        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_load_uses_default_message_and_keeps_data() {
        let (store, repo, _clock) = fee_store(Ok(vec![fee(10.0)]));
        store.load_all(false).await;

        *repo.result.lock().unwrap() = Err(RepositoryError::Request {
            status: Some(500),
            message: None,
        });
        let outcome = store.load_all(true).await;

        assert_eq!(outcome, Outcome::Failed("Failed to load fees".into()));
        assert_eq!(store.count(), 1);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_activity_without_list_capability_reports_error() {
        let store: ListStore<Activity> =
            ListStore::new(None, CachePolicy::default(), Arc::new(SystemClock));

        let outcome = store.load_all(false).await;

        assert_eq!(
            outcome,
            Outcome::Failed("no list operation available for activity".into())
        );
        assert_eq!(
            store.last_error().as_deref(),
            Some("no list operation available for activity")
        );
        assert!(!store.is_loading());
    }
}
