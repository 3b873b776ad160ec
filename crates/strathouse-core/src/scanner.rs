//! Part scanner
//!
//! Walks a house directory, discovers candidate parts under the fixed
//! category directories, loads each one and registers a `Part` record per
//! success.
//!
//! Failures are tolerated at two tiers:
//! - a candidate that cannot be loaded, lacks a factory, or cannot be
//!   registered is logged and skipped;
//! - a category directory that is missing or unreadable is skipped.
//!
//! A house whose directory does not exist yields an empty report and a
//! warning. Scanning never fails as a whole.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use strathouse_core_types::schema::{
    EVENT_CANDIDATE_SKIPPED, EVENT_HOUSE_PATH_MISSING, EVENT_PART_REGISTERED,
};
use tracing::{debug, error, warn};

use crate::errors::ExError;
use crate::loader::{ComponentLoader, PartModule};
use crate::model::{Category, House, Part, DEFAULT_ATTRIBUTE};
use crate::naming::{is_candidate_dir_name, module_locator, part_name};

const OP: &str = "scan_house";

/// Destination of registered parts
///
/// Implemented by the store over an open transaction, so that all the parts
/// of one scan commit together with the house record.
pub trait PartSink {
    /// Persist one part record
    ///
    /// # Errors
    ///
    /// Any store failure; the scanner logs it and skips the candidate.
    fn register(&mut self, part: &Part) -> std::result::Result<(), ExError>;
}

impl PartSink for Vec<Part> {
    fn register(&mut self, part: &Part) -> std::result::Result<(), ExError> {
        self.push(part.clone());
        Ok(())
    }
}

/// A candidate directory that did not become a part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of scanning one house
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Fully-qualified names of the registered parts, in scan order
    pub registered: Vec<String>,
    pub skipped: Vec<SkippedCandidate>,
    /// True when the house directory did not exist
    pub house_path_missing: bool,
}

/// Scan `house` and register every valid part into `sink`
pub fn scan_house(
    house: &House,
    loader: &dyn ComponentLoader,
    sink: &mut dyn PartSink,
) -> ScanReport {
    let mut report = ScanReport::default();

    if !house.local_path.exists() {
        warn!(
            op = OP,
            event = EVENT_HOUSE_PATH_MISSING,
            house = %house.name,
            path = %house.local_path.display(),
            "house path does not exist, ignoring this house"
        );
        report.house_path_missing = true;
        return report;
    }

    let package = house.package_name();
    for category in Category::ALL {
        let category_dir = house.local_path.join(category.dir());
        let entries = match candidate_dirs(&category_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(
                    op = OP,
                    house = %house.name,
                    path = %category_dir.display(),
                    reason = %e,
                    "category directory unreadable, skipping"
                );
                continue;
            }
        };

        for (entry, path) in entries {
            match scan_candidate(house, &package, category, &entry, loader, sink) {
                Ok(name) => {
                    debug!(
                        op = OP,
                        event = EVENT_PART_REGISTERED,
                        house = %house.name,
                        part = %name,
                    );
                    report.registered.push(name);
                }
                Err(reason) => {
                    error!(
                        op = OP,
                        event = EVENT_CANDIDATE_SKIPPED,
                        house = %house.name,
                        path = %path.display(),
                        reason = %reason,
                        "skipping part candidate"
                    );
                    report.skipped.push(SkippedCandidate { path, reason });
                }
            }
        }
    }

    report
}

/// Immediate candidate subdirectories of a category directory, sorted by name
fn candidate_dirs(category_dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(category_dir)? {
        let Ok(entry) = entry else { continue };
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if is_candidate_dir_name(&name) && path.is_dir() {
            dirs.push((name, path));
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn scan_candidate(
    house: &House,
    package: &str,
    category: Category,
    entry: &str,
    loader: &dyn ComponentLoader,
    sink: &mut dyn PartSink,
) -> std::result::Result<String, String> {
    let locator = module_locator(package, category, entry);
    let module = loader
        .load(&locator)
        .map_err(|e| format!("cannot load part module: {}", e))?;

    let part = build_part(house, category, entry, locator, &module)?;
    sink.register(&part)
        .map_err(|e| format!("cannot register part: {}", e))?;
    Ok(part.name)
}

fn build_part(
    house: &House,
    category: Category,
    entry: &str,
    module_locator: String,
    module: &PartModule,
) -> std::result::Result<Part, String> {
    let factory = module
        .part
        .as_ref()
        .ok_or_else(|| "part module has no `part` factory".to_string())?;

    let attribute = |value: Option<&String>| {
        value
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ATTRIBUTE.to_string())
    };
    let doc = factory
        .doc()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_ATTRIBUTE)
        .to_string();

    Ok(Part {
        id: None,
        house_name: house.name.clone(),
        category,
        name: part_name(&house.name, category, entry),
        author: attribute(module.author.as_ref()),
        version: attribute(module.version.as_ref()),
        doc,
        module_locator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{ConfiguredPart, MemoryLoader, PartFactory};

    fn configured(params: &crate::loader::Params) -> std::result::Result<Box<dyn crate::loader::Component>, String> {
        Ok(Box::new(ConfiguredPart::new(params.clone())))
    }

    #[test]
    fn test_build_part_defaults_missing_attributes() {
        let house = House::local("h", "/x/h");
        let module = PartModule {
            author: None,
            version: None,
            part: Some(PartFactory::new(None, configured)),
        };
        let part = build_part(&house, Category::Sg, "a", "h.part.sg.a.part".into(), &module).unwrap();
        assert_eq!(part.author, "None");
        assert_eq!(part.version, "None");
        assert_eq!(part.doc, "None");
        assert_eq!(part.name, "h.sg.a");
    }

    #[test]
    fn test_build_part_trims_attributes() {
        let house = House::local("h", "/x/h");
        let module = PartModule {
            author: Some("  alice \n".to_string()),
            version: Some(" 2.0 ".to_string()),
            part: Some(PartFactory::new(Some("\n  Crossing signal.\n".to_string()), configured)),
        };
        let part = build_part(&house, Category::Sys, "b", "h.sys.b.part".into(), &module).unwrap();
        assert_eq!(part.author, "alice");
        assert_eq!(part.version, "2.0");
        assert_eq!(part.doc, "Crossing signal.");
    }

    #[test]
    fn test_build_part_requires_factory() {
        let house = House::local("h", "/x/h");
        let module = PartModule::default();
        assert!(build_part(&house, Category::Sg, "a", "h.part.sg.a.part".into(), &module).is_err());
    }

    #[test]
    fn test_missing_house_path_yields_empty_report() {
        let house = House::local("ghost", "/definitely/not/here/ghost");
        let loader = MemoryLoader::new();
        let mut sink: Vec<Part> = Vec::new();

        let report = scan_house(&house, &loader, &mut sink);
        assert!(report.house_path_missing);
        assert!(report.registered.is_empty());
        assert!(sink.is_empty());
    }
}
