//! # Clinic Core
//!
//! Client-side state for the clinic dashboards.
//!
//! This crate mirrors server-held entities in memory and keeps them reasonably fresh:
//! - [`EntityStore`]: normalised CRUD-cache per entity (doctors, patients, visits)
//! - [`ListStore`]: cached plain lists (fees, activity log)
//! - [`AuthStore`]: the signed-in session, persisted through [`SessionStorage`]
//! - [`ClinicStores`]: the composition root holding one handle per store
//!
//! Presentation code dispatches intents ([`EntityIntent`], [`LoadList`], [`AuthIntent`]) and reads
//! the tables back through read views or [`Subscription`]s.
//!
//! **No transport concerns**: stores call the capability traits in [`repository`]; HTTP
//! implementations live in `api-client`.

pub mod auth;
pub mod cache;
pub mod clinic;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod intents;
pub mod list_store;
pub mod repository;
pub mod session;
pub mod state;
pub mod store;
pub mod table;

#[cfg(test)]
mod testing;

pub use auth::{AuthSession, AuthStore};
pub use cache::CachePolicy;
pub use clinic::{ClinicStores, DashboardLoad, Repositories};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClinicConfig;
pub use error::{ClinicError, ClinicResult, RepositoryError, RepositoryResult};
pub use intents::{AuthIntent, EntityIntent, LoadList, Outcome};
pub use list_store::ListStore;
pub use repository::{
    AuthRepository, Capabilities, Create, CrudRepository, Delete, GetById, List, LoginResponse,
    Operation, TokenProvider, Update,
};
pub use session::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use state::{StateCell, Subscription};
pub use store::EntityStore;
pub use table::{EntityList, EntityTable, RequestFlags};

pub use clinic_types::{
    Activity, Doctor, Entity, Fee, NonEmptyText, Patient, Resource, Role, TextError, Visit,
};
