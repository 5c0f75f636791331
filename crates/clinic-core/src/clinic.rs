//! Composition root.
//!
//! [`ClinicStores`] is built once at startup and handed to whatever presents the dashboards.
//! Presentation code holds these handles directly; there is no global lookup.

use crate::auth::AuthStore;
use crate::cache::CachePolicy;
use crate::clock::{Clock, SystemClock};
use crate::config::ClinicConfig;
use crate::intents::Outcome;
use crate::list_store::ListStore;
use crate::repository::{Capabilities, List};
use crate::store::EntityStore;
use clinic_types::{Activity, Doctor, Fee, Patient, Visit};
use std::sync::Arc;

/// Repository capabilities for every store except auth.
#[derive(Clone, Default)]
pub struct Repositories {
    pub doctors: Capabilities<Doctor>,
    pub patients: Capabilities<Patient>,
    pub visits: Capabilities<Visit>,
    pub fees: Option<Arc<dyn List<Fee>>>,
    pub activity: Option<Arc<dyn List<Activity>>>,
}

#[derive(Clone)]
pub struct ClinicStores {
    pub doctors: EntityStore<Doctor>,
    pub patients: EntityStore<Patient>,
    pub visits: EntityStore<Visit>,
    pub fees: ListStore<Fee>,
    pub activity: ListStore<Activity>,
    pub auth: AuthStore,
}

/// Result of loading every dashboard once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardLoad {
    pub doctors: Outcome,
    pub patients: Outcome,
    pub visits: Outcome,
    pub fees: Outcome,
    pub activity: Outcome,
}

impl DashboardLoad {
    /// `(label, outcome)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, &Outcome); 5] {
        [
            ("doctors", &self.doctors),
            ("patients", &self.patients),
            ("visits", &self.visits),
            ("fees", &self.fees),
            ("activity", &self.activity),
        ]
    }

    pub fn failures(&self) -> usize {
        self.entries().iter().filter(|(_, o)| o.is_failed()).count()
    }
}

impl ClinicStores {
    /// Builds every store with the configured freshness window and the system clock.
    ///
    /// `auth` is built first by the caller because the entity repositories usually need it as
    /// their token source.
    pub fn new(cfg: &ClinicConfig, auth: AuthStore, repositories: Repositories) -> Self {
        Self::with_clock(cfg, auth, repositories, Arc::new(SystemClock))
    }

    pub fn with_clock(
        cfg: &ClinicConfig,
        auth: AuthStore,
        repositories: Repositories,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = CachePolicy::new(cfg.cache_ttl());
        Self {
            doctors: EntityStore::new(repositories.doctors, cache, clock.clone()),
            patients: EntityStore::new(repositories.patients, cache, clock.clone()),
            visits: EntityStore::new(repositories.visits, cache, clock.clone()),
            fees: ListStore::new(repositories.fees, cache, clock.clone()),
            activity: ListStore::new(repositories.activity, cache, clock),
            auth,
        }
    }

    /// Dispatches "load all" to every dashboard store concurrently.
    pub async fn load_dashboards(&self, force: bool) -> DashboardLoad {
        let (doctors, patients, visits, fees, activity) = tokio::join!(
            self.doctors.load_all(force),
            self.patients.load_all(force),
            self.visits.load_all(force),
            self.fees.load_all(force),
            self.activity.load_all(force),
        );
        DashboardLoad {
            doctors,
            patients,
            visits,
            fees,
            activity,
        }
    }
}
