//! Settings resolution
//!
//! In increasing precedence: built-in defaults, `<home>/config.toml`, then
//! environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use strathouse_core::errors::{ExError, ExErrorKind};
use strathouse_core::model::house::DEFAULT_BRANCH;
use strathouse_store::errors::{io_error, Result};

pub const HOME_ENV: &str = "STRATHOUSE_HOME";
pub const DEFAULT_URL_ENV: &str = "STRATHOUSE_DEFAULT_URL";
pub const DEFAULT_BRANCH_ENV: &str = "STRATHOUSE_DEFAULT_BRANCH";
pub const GIT_ENV: &str = "STRATHOUSE_GIT";

pub const CONFIG_FILE: &str = "config.toml";
pub const DB_FILE: &str = "stockhouse.db";
pub const REMOTE_CACHE_DIR_NAME: &str = "house_cache";

pub const DEFAULT_HOUSE_NAME: &str = "default";
pub const DEFAULT_HOUSE_URL: &str = "https://gitee.com/fasiondog/hikyuu_house.git";

/// The house registered automatically on first use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultHouse {
    pub name: String,
    pub url: String,
    pub branch: String,
}

impl Default for DefaultHouse {
    fn default() -> Self {
        Self {
            name: DEFAULT_HOUSE_NAME.to_string(),
            url: DEFAULT_HOUSE_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of all per-user state
    pub home: PathBuf,
    pub db_path: PathBuf,
    /// None disables auto-registration
    pub default_house: Option<DefaultHouse>,
    pub git_program: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    default_house: Option<DefaultHouseSetting>,
    git_program: Option<String>,
}

/// `default_house = false` or a table overriding some fields
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DefaultHouseSetting {
    Enabled(bool),
    Custom {
        name: Option<String>,
        url: Option<String>,
        branch: Option<String>,
    },
}

impl Settings {
    /// Settings for a given home directory with no config file or environment
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            db_path: home.join(DB_FILE),
            home,
            default_house: Some(DefaultHouse::default()),
            git_program: "git".to_string(),
        }
    }

    /// Resolve settings from the process environment
    ///
    /// # Errors
    ///
    /// Fails when no home directory can be determined or `config.toml`
    /// exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve settings reading variables through `env`
    pub fn resolve(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let home = match env(HOME_ENV).filter(|h| !h.is_empty()) {
            Some(home) => PathBuf::from(home),
            None => user_home()?.join(".strathouse"),
        };

        let mut settings = Self::with_home(home);
        let file = read_file_config(&settings.home.join(CONFIG_FILE))?;

        match file.default_house {
            Some(DefaultHouseSetting::Enabled(false)) => settings.default_house = None,
            Some(DefaultHouseSetting::Enabled(true)) | None => {}
            Some(DefaultHouseSetting::Custom { name, url, branch }) => {
                let house = settings.default_house.get_or_insert_with(DefaultHouse::default);
                if let Some(name) = name {
                    house.name = name;
                }
                if let Some(url) = url {
                    house.url = url;
                }
                if let Some(branch) = branch {
                    house.branch = branch;
                }
            }
        }
        if let Some(git) = file.git_program {
            settings.git_program = git;
        }

        if let Some(house) = settings.default_house.as_mut() {
            if let Some(url) = env(DEFAULT_URL_ENV) {
                house.url = url;
            }
            if let Some(branch) = env(DEFAULT_BRANCH_ENV) {
                house.branch = branch;
            }
        }
        if let Some(git) = env(GIT_ENV) {
            settings.git_program = git;
        }

        Ok(settings)
    }

    /// Same settings without the default house
    pub fn without_default_house(mut self) -> Self {
        self.default_house = None;
        self
    }
}

fn user_home() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("settings_load")
                .with_message(format!("cannot determine the user home directory, set {}", HOME_ENV))
        })
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(e) => return Err(io_error("settings_load", e)),
    };
    toml::from_str(&text).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("settings_load")
            .with_path(path)
            .with_message(e.to_string())
    })
}
