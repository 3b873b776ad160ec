#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use strathouse_core::errors::{HouseError, Result};
use strathouse_core::{Category, ManifestLoader};
use strathouse_engine::{DefaultHouse, Fetcher, HouseManager, Settings};

/// Fetcher that copies a fixture tree registered for each URL
#[derive(Clone, Default)]
pub struct FixtureFetcher {
    sources: Rc<RefCell<HashMap<String, PathBuf>>>,
    pub calls: Rc<RefCell<Vec<(String, String)>>>,
}

impl FixtureFetcher {
    pub fn serve(&self, url: &str, tree: &Path) {
        self.sources
            .borrow_mut()
            .insert(url.to_string(), tree.to_path_buf());
    }
}

impl Fetcher for FixtureFetcher {
    fn fetch(&self, url: &str, branch: &str, dest: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push((url.to_string(), branch.to_string()));
        let source = self
            .sources
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| HouseError::FetchFailed {
                url: url.to_string(),
                reason: "repository not found".to_string(),
            })?;
        copy_tree(&source, dest).map_err(|e| HouseError::io("fixture_fetch", &e))
    }
}

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

/// Write `part.toml` for `entry` under the category directory of a house tree
pub fn write_part(house_dir: &Path, category: Category, entry: &str, manifest: &str) -> PathBuf {
    let dir = house_dir.join(category.dir()).join(entry);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("part.toml"), manifest).unwrap();
    dir
}

pub const BARE_MANIFEST: &str = "[part]\n";

pub const BROKEN_MANIFEST: &str = "author = \"unterminated\n[part\n";

pub fn manifest(author: &str, version: &str, doc: &str) -> String {
    format!(
        "author = \"{}\"\nversion = \"{}\"\n\n[part]\ndoc = \"{}\"\n",
        author, version, doc
    )
}

/// Manager over `home` with no default house
pub fn open_manager(home: &Path, fetcher: &FixtureFetcher) -> HouseManager {
    open_with(Settings::with_home(home).without_default_house(), fetcher)
}

pub fn open_with(settings: Settings, fetcher: &FixtureFetcher) -> HouseManager {
    HouseManager::open(
        settings,
        Box::new(fetcher.clone()),
        Box::new(ManifestLoader::new()),
    )
    .unwrap()
}

/// Settings whose default house is served from a fixture URL
pub fn settings_with_default(home: &Path, url: &str) -> Settings {
    let mut settings = Settings::with_home(home);
    settings.default_house = Some(DefaultHouse {
        name: "default".to_string(),
        url: url.to_string(),
        branch: "master".to_string(),
    });
    settings
}
