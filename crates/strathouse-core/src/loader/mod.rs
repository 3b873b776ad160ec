//! Component loading capability
//!
//! A part is registered by scanning and later resolved by loading the module
//! its locator names. `ComponentLoader` is the seam between the engine and
//! whatever turns a locator into a `PartModule`:
//!
//! - `ManifestLoader` reads `part.toml` manifests from disk and builds
//!   components through registered native factories;
//! - `MemoryLoader` serves modules from an in-memory map for tests and
//!   embedding.

mod component;
mod manifest;
mod memory;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use component::{merge_params, Component, ConfiguredPart, Params};
pub use manifest::{ManifestLoader, MANIFEST_FILE};
pub use memory::MemoryLoader;

/// Constructor behind a part: builds a component from parameters
pub type FactoryFn = dyn Fn(&Params) -> std::result::Result<Box<dyn Component>, String> + Send + Sync;

/// Why a locator could not be turned into a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Nothing exists at the locator
    NotFound { locator: String },
    /// The module exists but cannot be parsed
    Syntax { locator: String, message: String },
    /// The module names a factory nobody registered
    UnknownFactory { locator: String, factory: String },
    /// Reading the module failed
    Io { locator: String, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound { locator } => write!(f, "module '{}' not found", locator),
            LoadError::Syntax { locator, message } => {
                write!(f, "module '{}' is malformed: {}", locator, message)
            }
            LoadError::UnknownFactory { locator, factory } => write!(
                f,
                "module '{}' names unregistered factory '{}'",
                locator, factory
            ),
            LoadError::Io { locator, message } => {
                write!(f, "module '{}' could not be read: {}", locator, message)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// The callable a part module exposes, with its documentation
#[derive(Clone)]
pub struct PartFactory {
    doc: Option<String>,
    build: Arc<FactoryFn>,
}

impl PartFactory {
    pub fn new<F>(doc: Option<String>, build: F) -> Self
    where
        F: Fn(&Params) -> std::result::Result<Box<dyn Component>, String> + Send + Sync + 'static,
    {
        Self {
            doc,
            build: Arc::new(build),
        }
    }

    pub(crate) fn from_shared(doc: Option<String>, build: Arc<FactoryFn>) -> Self {
        Self { doc, build }
    }

    /// Documentation attached to the factory, if any
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Build a component
    ///
    /// # Errors
    ///
    /// Returns the factory's own message when it rejects the parameters.
    pub fn call(&self, params: &Params) -> std::result::Result<Box<dyn Component>, String> {
        (self.build)(params)
    }
}

impl fmt::Debug for PartFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartFactory")
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// A loaded part module
///
/// `author` and `version` are optional attributes; `part` is the mandatory
/// factory, checked by the scanner and the resolver rather than the loader.
#[derive(Debug, Clone, Default)]
pub struct PartModule {
    pub author: Option<String>,
    pub version: Option<String>,
    pub part: Option<PartFactory>,
}

/// Turns module locators into loaded modules
///
/// Loaders resolve the first locator segment (the package) against an
/// ordered list of search roots.
pub trait ComponentLoader {
    /// Load the module at `locator`
    ///
    /// # Errors
    ///
    /// Any `LoadError` when the module is missing or broken.
    fn load(&self, locator: &str) -> std::result::Result<PartModule, LoadError>;

    /// Directory the top-level `package` currently resolves to, if any
    fn locate_package(&self, package: &str) -> Option<PathBuf>;

    /// Append a search root; duplicates are ignored
    fn add_search_root(&mut self, root: &Path);

    /// Drop a previously added search root; unknown roots are ignored
    fn remove_search_root(&mut self, root: &Path);

    fn search_roots(&self) -> Vec<PathBuf>;
}
