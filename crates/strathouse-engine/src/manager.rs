//! House manager
//!
//! One explicitly constructed manager per process holds the store
//! connection, the component loader and the fetcher. Opening it creates the
//! schema if absent, resolves the remote cache directory, registers the
//! loader search roots and auto-registers the default house.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use strathouse_core::model::config_entry::REMOTE_CACHE_DIR_KEY;
use strathouse_core::model::HouseType;
use strathouse_core::{log_op_end, log_op_error, log_op_start, ComponentLoader};
use strathouse_store::errors::{io_error, Result};
use strathouse_store::migrations::apply_migrations;
use strathouse_store::{db, SqliteRepo};
use tracing::debug;

use crate::fetcher::Fetcher;
use crate::settings::{Settings, REMOTE_CACHE_DIR_NAME};

pub struct HouseManager {
    pub(crate) conn: Connection,
    pub(crate) loader: Box<dyn ComponentLoader>,
    pub(crate) fetcher: Box<dyn Fetcher>,
    pub(crate) settings: Settings,
    pub(crate) remote_cache_dir: PathBuf,
}

impl HouseManager {
    /// Open the store at `settings.db_path` and set the manager up
    ///
    /// # Errors
    ///
    /// Store, migration or filesystem failures, and any failure registering
    /// the default house.
    pub fn open(
        settings: Settings,
        fetcher: Box<dyn Fetcher>,
        loader: Box<dyn ComponentLoader>,
    ) -> Result<Self> {
        let conn = db::open(&settings.db_path)?;
        db::configure(&conn)?;
        Self::with_connection(conn, settings, fetcher, loader)
    }

    /// Set a manager up over an existing connection
    pub fn with_connection(
        mut conn: Connection,
        settings: Settings,
        fetcher: Box<dyn Fetcher>,
        loader: Box<dyn ComponentLoader>,
    ) -> Result<Self> {
        apply_migrations(&mut conn)?;

        let mut manager = Self {
            conn,
            loader,
            fetcher,
            remote_cache_dir: settings.home.join(REMOTE_CACHE_DIR_NAME),
            settings,
        };
        manager.setup_house()?;
        Ok(manager)
    }

    /// Initialize process-wide state
    ///
    /// Resolves (and persists on first use) the remote cache directory,
    /// registers every search root and adds the default house when it is
    /// configured and not yet registered. Safe to call repeatedly.
    pub fn setup_house(&mut self) -> Result<()> {
        log_op_start!("house_setup");
        let start = std::time::Instant::now();

        self.setup_house_impl().map_err(|e| {
            log_op_error!(
                "house_setup",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "house_setup",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(())
    }

    fn setup_house_impl(&mut self) -> Result<()> {
        self.remote_cache_dir = match SqliteRepo::get_config(&self.conn, REMOTE_CACHE_DIR_KEY)? {
            Some(entry) => PathBuf::from(entry.value),
            None => {
                let dir = self.settings.home.join(REMOTE_CACHE_DIR_NAME);
                SqliteRepo::upsert_config(&self.conn, REMOTE_CACHE_DIR_KEY, &dir.to_string_lossy())?;
                dir
            }
        };
        std::fs::create_dir_all(&self.remote_cache_dir)
            .map_err(|e| io_error("house_setup", e))?;

        self.loader.add_search_root(&self.remote_cache_dir);
        for house in SqliteRepo::list_houses(&self.conn)? {
            if house.house_type == HouseType::Local {
                if let Some(parent) = house.local_path.parent() {
                    self.loader.add_search_root(parent);
                }
            }
        }
        debug!(roots = ?self.loader.search_roots(), "search roots registered");

        if let Some(default) = self.settings.default_house.clone() {
            if SqliteRepo::find_house_by_name(&self.conn, &default.name)?.is_none() {
                self.add_remote_house(&default.name, &default.url, &default.branch)?;
            }
        }
        Ok(())
    }

    /// Directory remote houses are cloned into
    pub fn remote_cache_dir(&self) -> &Path {
        &self.remote_cache_dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn loader(&self) -> &dyn ComponentLoader {
        self.loader.as_ref()
    }

    /// Underlying store connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
