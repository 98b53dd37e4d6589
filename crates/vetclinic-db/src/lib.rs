//! Vet clinic database: SurrealDB persistence for the clinic records.
//!
//! This crate provides:
//! - Opening and migrating the database ([`ClinicDb`], [`DbConfig`])
//! - Error types ([`DbError`])
//! - Repository implementations for the `vetclinic-core` traits,
//!   bundled as a [`SurrealClinicStore`]

mod connection;
mod error;
pub mod repository;
mod schema;
mod store;

pub use connection::{ClinicDb, DbConfig};
pub use error::DbError;
pub use store::SurrealClinicStore;
