//! Domain models for the clinic records.
//!
//! Each entity module holds the stored record, the typed create and
//! update inputs, and the loosely-typed form the request layer fills
//! in from a submitted field mapping.

pub mod client;
pub mod medicine;
pub mod pet;
pub mod product;
pub mod provider;
pub mod vet;
