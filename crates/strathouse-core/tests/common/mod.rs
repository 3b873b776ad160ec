use std::fs;
use std::path::{Path, PathBuf};

use strathouse_core::Category;

/// Create `<root>/<house>` and return its path
#[allow(dead_code)]
pub fn make_house(root: &Path, house: &str) -> PathBuf {
    let dir = root.join(house);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write `part.toml` for `entry` under the category directory of a house
#[allow(dead_code)]
pub fn write_part(house_dir: &Path, category: Category, entry: &str, manifest: &str) -> PathBuf {
    let dir = house_dir.join(category.dir()).join(entry);
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("part.toml");
    fs::write(&file, manifest).unwrap();
    dir
}

/// A well-formed manifest with every attribute set
#[allow(dead_code)]
pub fn full_manifest(author: &str, version: &str, doc: &str) -> String {
    format!(
        "author = \"{}\"\nversion = \"{}\"\n\n[part]\ndoc = \"\"\"{}\"\"\"\n",
        author, version, doc
    )
}

/// Smallest manifest that still exposes a factory
#[allow(dead_code)]
pub const BARE_MANIFEST: &str = "[part]\n";

/// Not parseable as TOML
#[allow(dead_code)]
pub const BROKEN_MANIFEST: &str = "author = \"unterminated\n[part\n";
