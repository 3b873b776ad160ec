use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::component::{merge_params, Component, ConfiguredPart, Params};
use super::{ComponentLoader, FactoryFn, LoadError, PartFactory, PartModule};

/// File name of a part module on disk
pub const MANIFEST_FILE: &str = "part.toml";

/// On-disk shape of a part module
///
/// ```toml
/// author = "someone"
/// version = "1.2"
///
/// [part]
/// doc = "Fixed percentage stop loss"
/// factory = "st.fixed_percent"   # optional
///
/// [part.params]
/// p = 0.03
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    author: Option<String>,
    version: Option<String>,
    part: Option<FactorySection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FactorySection {
    doc: Option<String>,
    factory: Option<String>,
    #[serde(default)]
    params: Params,
}

/// Loads part modules from `part.toml` manifests under ordered search roots
///
/// The locator `pkg.a.b.part` resolves `pkg` to `<root>/pkg` for the first
/// root containing that directory, then reads `<root>/pkg/a/b/part.toml`.
#[derive(Default)]
pub struct ManifestLoader {
    roots: Vec<PathBuf>,
    factories: HashMap<String, Arc<FactoryFn>>,
}

impl ManifestLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native factory under `id`
    pub fn with_factory<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Params) -> std::result::Result<Box<dyn Component>, String> + Send + Sync + 'static,
    {
        self.register_factory(id, factory);
        self
    }

    pub fn register_factory<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn(&Params) -> std::result::Result<Box<dyn Component>, String> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Path of the manifest a locator names, if its package resolves
    pub fn manifest_path(&self, locator: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = locator.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        let mut path = self.locate_package(segments[0])?;
        for segment in &segments[1..segments.len() - 1] {
            path.push(segment);
        }
        path.push(format!("{}.toml", segments[segments.len() - 1]));
        Some(path)
    }

    fn build_factory(
        &self,
        locator: &str,
        section: FactorySection,
    ) -> std::result::Result<PartFactory, LoadError> {
        let defaults = section.params;
        let doc = section.doc;

        match section.factory {
            Some(id) => {
                let native = self.factories.get(&id).cloned().ok_or_else(|| {
                    LoadError::UnknownFactory {
                        locator: locator.to_string(),
                        factory: id.clone(),
                    }
                })?;
                Ok(PartFactory::from_shared(
                    doc,
                    Arc::new(move |params: &Params| native(&merge_params(&defaults, params))),
                ))
            }
            None => Ok(PartFactory::new(doc, move |params: &Params| {
                Ok(Box::new(ConfiguredPart::new(merge_params(&defaults, params)))
                    as Box<dyn Component>)
            })),
        }
    }
}

impl ComponentLoader for ManifestLoader {
    fn load(&self, locator: &str) -> std::result::Result<PartModule, LoadError> {
        let not_found = || LoadError::NotFound {
            locator: locator.to_string(),
        };

        let path = self.manifest_path(locator).ok_or_else(not_found)?;
        if !path.is_file() {
            return Err(not_found());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| LoadError::Io {
            locator: locator.to_string(),
            message: e.to_string(),
        })?;

        let manifest: Manifest = toml::from_str(&contents).map_err(|e| LoadError::Syntax {
            locator: locator.to_string(),
            message: e.to_string(),
        })?;

        let part = manifest
            .part
            .map(|section| self.build_factory(locator, section))
            .transpose()?;

        Ok(PartModule {
            author: manifest.author,
            version: manifest.version,
            part,
        })
    }

    fn locate_package(&self, package: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(package))
            .find(|candidate| candidate.is_dir())
    }

    fn add_search_root(&mut self, root: &Path) {
        if !self.roots.iter().any(|r| r == root) {
            self.roots.push(root.to_path_buf());
        }
    }

    fn remove_search_root(&mut self, root: &Path) {
        self.roots.retain(|r| r != root);
    }

    fn search_roots(&self) -> Vec<PathBuf> {
        self.roots.clone()
    }
}
