//! # Database Crate
//!
//! Local persistence for the calculators: user preferences and the recent
//! calculation history, stored in an embedded SQLite database.
//!
//! - **Adapter:** every SQL statement lives here. Callers deal in `core_types`
//!   records and typed settings, never in rows.
//! - **JSON documents:** preferences and history entries are stored as JSON text, so
//!   adding a field with a serde default never needs a migration.
//! - **Pooled:** operations are asynchronous and share a `SqlitePool`.
//!
//! ## Public API
//!
//! - `connect` / `connect_in_memory`: open the connection pool.
//! - `run_migrations`: apply the embedded schema migrations.
//! - `DbRepository`: preference and history access.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod preferences;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, run_migrations};
pub use error::DbError;
pub use preferences::{InvestmentSettings, MiningSettings, PreferenceKey};
pub use repository::{DbRepository, RECENT_CALCULATIONS_LIMIT};
