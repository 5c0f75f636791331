//! # Clinic Types
//!
//! Shared record types for the clinic client.
//!
//! This crate contains the wire-level shapes the backend emits and the small validated types the
//! rest of the workspace builds on:
//! - Entity records ([`Doctor`], [`Patient`], [`Visit`]) normalised by an integer identity
//! - List records ([`Fee`], [`Activity`]) which are kept as plain sequences
//! - The session [`Role`] enumeration
//! - [`NonEmptyText`] for required form fields
//! - [`Row`], the tolerant view every record decodes through
//!
//! **No store or transport concerns**: caching, dispatch and HTTP belong in `clinic-core` and
//! `api-client`.

pub mod id;
pub mod records;
pub mod role;
pub mod row;
pub mod text;

pub use id::coerce_id;
pub use records::{Activity, Doctor, Fee, Patient, Visit};
pub use role::{Role, RoleError};
pub use row::Row;
pub use text::{NonEmptyText, TextError};

/// Naming metadata for a backend resource.
///
/// Every record type the client fetches carries a label used in action names
/// (`"[Doctor] Load All"`), singular and plural nouns used in error messages, and the path
/// segment of its REST resource.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Label used in action type strings, e.g. `"Doctor"`.
    const LABEL: &'static str;
    /// Singular noun for messages, e.g. `"doctor"`.
    const SINGULAR: &'static str;
    /// Plural noun for messages, e.g. `"doctors"`.
    const PLURAL: &'static str;
    /// REST path segment relative to the API base URL.
    const RESOURCE: &'static str;
}

/// A record normalised by an integer identity.
pub trait Entity: Resource {
    /// Wire name of the identity field, e.g. `"doctorID"`.
    const ID_FIELD: &'static str;

    /// The record's identity, if it carries a usable one.
    fn id(&self) -> Option<i64>;
}
