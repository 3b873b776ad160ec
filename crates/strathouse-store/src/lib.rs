//! strathouse store - SQLite persistence for config entries, houses and parts
//!
//! Provides:
//! - Connection management (`db`)
//! - Embedded, checksummed schema migrations
//! - `SqliteRepo`, the metadata store operations
//! - `PartWriter`, the scanner sink writing parts inside the caller's transaction

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{PartWriter, SqliteRepo};
