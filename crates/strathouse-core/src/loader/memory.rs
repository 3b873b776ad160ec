use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::component::{Component, Params};
use super::{ComponentLoader, LoadError, PartFactory, PartModule};

enum Entry {
    Module(PartModule),
    Broken(String),
}

/// In-memory loader keyed by locator
///
/// Packages are still located on disk through the search roots so that
/// shadowing checks behave like the manifest loader.
#[derive(Default)]
pub struct MemoryLoader {
    roots: Vec<PathBuf>,
    modules: HashMap<String, Entry>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `module` at `locator`
    pub fn insert(&mut self, locator: impl Into<String>, module: PartModule) {
        self.modules.insert(locator.into(), Entry::Module(module));
    }

    /// Serve a module with the given attributes and factory
    pub fn insert_part<F>(
        &mut self,
        locator: impl Into<String>,
        author: Option<&str>,
        version: Option<&str>,
        doc: Option<&str>,
        build: F,
    ) where
        F: Fn(&Params) -> std::result::Result<Box<dyn Component>, String> + Send + Sync + 'static,
    {
        self.insert(
            locator,
            PartModule {
                author: author.map(str::to_string),
                version: version.map(str::to_string),
                part: Some(PartFactory::new(doc.map(str::to_string), build)),
            },
        );
    }

    /// Make `locator` fail to load with a syntax error
    pub fn insert_broken(&mut self, locator: impl Into<String>, message: impl Into<String>) {
        self.modules
            .insert(locator.into(), Entry::Broken(message.into()));
    }

    pub fn remove(&mut self, locator: &str) {
        self.modules.remove(locator);
    }
}

impl ComponentLoader for MemoryLoader {
    fn load(&self, locator: &str) -> std::result::Result<PartModule, LoadError> {
        match self.modules.get(locator) {
            Some(Entry::Module(module)) => Ok(module.clone()),
            Some(Entry::Broken(message)) => Err(LoadError::Syntax {
                locator: locator.to_string(),
                message: message.clone(),
            }),
            None => Err(LoadError::NotFound {
                locator: locator.to_string(),
            }),
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ConfiguredPart;

    #[test]
    fn test_missing_locator_is_not_found() {
        let loader = MemoryLoader::new();
        assert!(matches!(
            loader.load("h.part.sg.x.part"),
            Err(LoadError::NotFound { .. })
        ));
    }

    #[test]
    fn test_broken_locator_is_syntax_error() {
        let mut loader = MemoryLoader::new();
        loader.insert_broken("h.part.sg.x.part", "unexpected token");
        assert!(matches!(
            loader.load("h.part.sg.x.part"),
            Err(LoadError::Syntax { .. })
        ));
    }

    #[test]
    fn test_inserted_part_builds() {
        let mut loader = MemoryLoader::new();
        loader.insert_part("h.part.sg.x.part", Some("me"), None, Some("doc"), |p| {
            Ok(Box::new(ConfiguredPart::new(p.clone())))
        });
        let module = loader.load("h.part.sg.x.part").unwrap();
        assert_eq!(module.author.as_deref(), Some("me"));
        let factory = module.part.unwrap();
        assert_eq!(factory.doc(), Some("doc"));
        assert!(factory.call(&Params::new()).is_ok());
    }
}
