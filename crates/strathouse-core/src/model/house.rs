use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default branch for remote houses
pub const DEFAULT_BRANCH: &str = "master";

/// Where a house's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseType {
    /// Cloned from a version-control URL into the remote cache directory
    Remote,
    /// A directory the user already has on disk
    Local,
}

impl HouseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HouseType::Remote => "remote",
            HouseType::Local => "local",
        }
    }
}

impl fmt::Display for HouseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HouseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(HouseType::Remote),
            "local" => Ok(HouseType::Local),
            other => Err(format!("unknown house type '{}'", other)),
        }
    }
}

/// House - a named collection of strategy parts
///
/// `url` and `branch` are present iff the house is `Remote`. The record is a
/// detached snapshot; mutating it does not touch the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// Store-assigned row id (None until inserted)
    pub id: Option<i64>,

    /// Globally unique, human-chosen name
    pub name: String,

    pub house_type: HouseType,

    /// Absolute path of the house directory
    pub local_path: PathBuf,

    pub url: Option<String>,

    pub branch: Option<String>,
}

impl House {
    /// Create a remote house record cloned into `local_path`
    pub fn remote(
        name: impl Into<String>,
        url: impl Into<String>,
        branch: impl Into<String>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            house_type: HouseType::Remote,
            local_path: local_path.into(),
            url: Some(url.into()),
            branch: Some(branch.into()),
        }
    }

    /// Create a local house record
    pub fn local(name: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            id: None,
            name: name.into(),
            house_type: HouseType::Local,
            local_path: local_path.into(),
            url: None,
            branch: None,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.house_type == HouseType::Remote
    }

    /// Final segment of the house directory, used as the locator package
    pub fn package_name(&self) -> String {
        self.local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}
