//! Vet clinic core: domain models, form parsing, field validation,
//! repository traits and the service that ties them together.
//!
//! Nothing in this crate talks to a database. Storage backends
//! implement the traits in [`repository`] and are bundled behind a
//! [`service::ClinicStore`].

pub mod error;
pub mod merge;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{ClinicError, ClinicResult};
pub use service::{ClinicService, ClinicStore};
pub use validation::{FieldErrors, ValidationRules};
