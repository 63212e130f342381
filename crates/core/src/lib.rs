//! Ahorros Core - Domain records, the savings accrual engine, services, and traits.
//!
//! This crate contains the business logic of the savings planner.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod plans;

// Re-export the plan domain
pub use plans::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
