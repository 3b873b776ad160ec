//! strathouse core - domain kernel for strategy houses
//!
//! This crate provides:
//! - House, Part and ConfigEntry models and the closed category taxonomy
//! - Part naming and module-locator rules
//! - The component-loader capability (`ComponentLoader`) with a manifest
//!   loader and an in-memory loader
//! - The part scanner that turns a house directory into Part records
//! - The error facility (`HouseError`, `ExError`) and logging facility

pub mod errors;
pub mod loader;
pub mod logging_facility;
pub mod model;
pub mod naming;
pub mod scanner;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, HouseError, Result};
pub use loader::{
    Component, ComponentLoader, ConfiguredPart, LoadError, ManifestLoader, MemoryLoader, Params,
    PartFactory, PartModule,
};
pub use model::{Category, ConfigEntry, House, HouseType, Part, PartInfo};
pub use scanner::{scan_house, PartSink, ScanReport, SkippedCandidate};
