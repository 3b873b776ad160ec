use serde::{Deserialize, Serialize};

/// Key of the persisted remote clone cache directory
pub const REMOTE_CACHE_DIR_KEY: &str = "remote_cache_dir";

/// A persisted process-wide setting
///
/// Created lazily on first use and never deleted by normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
