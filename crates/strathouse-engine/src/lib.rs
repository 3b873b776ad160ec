//! strathouse engine - house registry and part resolver
//!
//! `HouseManager` owns the store connection, the component loader and the
//! fetcher, and exposes the public operations: adding, updating and removing
//! houses, and resolving parts into live components.

pub mod commands;
pub mod fetcher;
pub mod manager;
pub mod session;
pub mod settings;

pub use fetcher::{Fetcher, GitFetcher};
pub use manager::HouseManager;
pub use settings::{DefaultHouse, Settings};
