//! # silverhome-store
//!
//! Data layer of the SilverHome residential-care portal.
//!
//! The entire portal state is one JSON document ([`AppData`]) kept in a
//! named storage entry, plus a second entry for the session user. The
//! crate exposes a synchronous [`Store`] handle over a pluggable
//! [`storage::StorageBackend`] and provides a named, validated mutation
//! operation for every write the UI performs: each one loads the
//! document, validates against the snapshot, splices its change in and
//! saves the whole document back. Read-time derivations live in
//! [`query`] as pure functions.

pub mod applications;
pub mod chat;
pub mod connections;
pub mod conversations;
pub mod document;
pub mod emergency;
pub mod models;
pub mod notices;
pub mod query;
pub mod requests;
pub mod reservations;
pub mod schedules;
pub mod session;
pub mod storage;
pub mod users;

mod error;

pub use applications::NewApplication;
pub use document::{seed_document, AppData, Store};
pub use error::{Result, StoreError};
pub use models::*;
pub use notices::NewNotice;
pub use requests::NewRequest;
pub use reservations::NewReservation;
pub use schedules::NewSchedule;
pub use users::NewUser;
