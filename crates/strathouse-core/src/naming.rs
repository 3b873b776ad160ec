//! Part naming rules
//!
//! Two dotted strings identify a part:
//!
//! - the fully-qualified name `<house>.<category>.<entry>`, the same shape for
//!   every category;
//! - the module locator `<package>.part.<category>.<entry>.part`, where
//!   `<package>` is the final segment of the house directory. `prtflo` and
//!   `sys` drop the `part.` infix: `<package>.<category>.<entry>.part`.

use std::path::{Component, Path};

use crate::errors::{HouseError, Result};
use crate::model::Category;

/// Directory names that are build or cache artifacts, never parts
pub const CACHE_ARTIFACT_DIRS: &[&str] = &["__pycache__", "target"];

/// Whether a directory entry under a category directory is a candidate part
pub fn is_candidate_dir_name(name: &str) -> bool {
    !name.starts_with('.') && !CACHE_ARTIFACT_DIRS.contains(&name)
}

/// Check that `name` can name a house directory under the cache directory
///
/// The name becomes both a single path segment and the package segment of
/// every locator, so it must be one plain directory name.
///
/// # Errors
///
/// `InvalidHouseName` for an empty name, `.`, `..`, or a name containing a
/// path separator.
pub fn validate_house_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(segment)), None) if segment == name
    );
    if !single_normal || name.contains(['/', '\\']) {
        return Err(HouseError::InvalidHouseName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Locator of the component for `entry` in `category` of the house package
pub fn module_locator(package: &str, category: Category, entry: &str) -> String {
    if category.has_part_prefix() {
        format!("{}.part.{}.{}.part", package, category, entry)
    } else {
        format!("{}.{}.{}.part", package, category, entry)
    }
}

/// Fully-qualified part name
pub fn part_name(house: &str, category: Category, entry: &str) -> String {
    format!("{}.{}.{}", house, category, entry)
}

/// A part name split into its segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPartName {
    /// None when the caller gave only `<category>.<entry>`
    pub house: Option<String>,
    pub category: Category,
    pub entry: String,
}

impl ParsedPartName {
    /// Fully-qualified name, using `house` when the name omitted one
    pub fn qualified_with(&self, house: &str) -> String {
        part_name(self.house.as_deref().unwrap_or(house), self.category, &self.entry)
    }
}

/// Split a dotted part name
///
/// The second-to-last segment must be a known category. A two-segment name
/// has no house.
///
/// # Errors
///
/// `PartNameInvalid` when there are fewer than two segments or the category
/// segment is not recognized.
pub fn parse_part_name(name: &str) -> Result<ParsedPartName> {
    let invalid = || HouseError::PartNameInvalid {
        name: name.to_string(),
    };

    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() < 2 {
        return Err(invalid());
    }

    let entry = segments[segments.len() - 1];
    let category: Category = segments[segments.len() - 2]
        .parse()
        .map_err(|_| invalid())?;
    if entry.is_empty() {
        return Err(invalid());
    }

    let house = if segments.len() == 2 {
        None
    } else {
        let house = segments[..segments.len() - 2].join(".");
        if house.is_empty() {
            return Err(invalid());
        }
        Some(house)
    };

    Ok(ParsedPartName {
        house,
        category,
        entry: entry.to_string(),
    })
}

/// Infer the house directory name from the path of a file inside a part
///
/// A part file sits at `<house>/part/<category>/<entry>/<file>`, or at
/// `<house>/<category>/<entry>/<file>` for `prtflo`/`sys`. Returns None when
/// the path is too short to contain a house.
pub fn infer_house_from_path(category: Category, caller: &Path) -> Option<String> {
    let parts: Vec<String> = caller
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_string_lossy().into_owned(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect();

    let depth = if category.has_part_prefix() { 5 } else { 4 };
    if parts.len() < depth {
        return None;
    }
    Some(parts[parts.len() - depth].clone())
}
