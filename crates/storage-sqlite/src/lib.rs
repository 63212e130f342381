//! SQLite storage implementation for the Ahorros savings planner.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `ahorros-core` and contains:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - The plan repository
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The `core` crate is database-agnostic and works with traits.
//!
//! ```text
//!     core (domain, accrual engine)
//!              │
//!              ▼
//!      storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod plans;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use plans::PlanRepository;

// Re-export from ahorros-core for convenience
pub use ahorros_core::errors::{DatabaseError, Error, Result};
