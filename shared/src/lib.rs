//! Shared types and pure domain logic for the AgroData platform
//!
//! This crate contains the reconciliation arithmetic, validation helpers and
//! common request/response types used by the backend. It performs no I/O.

pub mod reconcile;
pub mod types;
pub mod validation;

pub use reconcile::*;
pub use types::*;
pub use validation::*;
