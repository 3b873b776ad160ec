//! House registry operations
//!
//! Mutating operations run inside `with_session`, so the part records of a
//! scan commit together with the house record or not at all.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use strathouse_core::errors::{ExError, HouseError};
use strathouse_core::model::House;
use strathouse_core::naming::validate_house_name;
use strathouse_core::{log_op_end, log_op_error, log_op_start, scan_house, ScanReport};
use strathouse_store::errors::Result;
use strathouse_store::{PartWriter, SqliteRepo};
use tracing::{debug, warn};

use crate::fetcher::fetch_into;
use crate::manager::HouseManager;
use crate::session::with_session;

impl HouseManager {
    /// Clone a remote house into the cache directory and register its parts
    ///
    /// The house record is inserted only after the scan completes.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: `name` is not a single plain directory name
    /// - `DuplicateName`: a house named `name` exists
    /// - `FetchFailed`: the clone failed
    /// - `RemovalFailed`: a stale cache directory could not be removed
    pub fn add_remote_house(&self, name: &str, url: &str, branch: &str) -> Result<ScanReport> {
        log_op_start!("house_add_remote", house = name, url = url, branch = branch);
        let start = std::time::Instant::now();

        let report = with_session(&self.conn, "house_add_remote", |conn| {
            self.add_remote_house_impl(conn, name, url, branch)
        })
        .map_err(|e| {
            log_op_error!(
                "house_add_remote",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                house = name
            );
            e
        })?;

        log_op_end!(
            "house_add_remote",
            duration_ms = start.elapsed().as_millis() as u64,
            house = name,
            part_count = report.registered.len(),
            skipped_count = report.skipped.len()
        );
        Ok(report)
    }

    fn add_remote_house_impl(
        &self,
        conn: &Connection,
        name: &str,
        url: &str,
        branch: &str,
    ) -> Result<ScanReport> {
        validate_house_name(name)?;
        ensure_name_free(conn, name)?;

        if let Some(existing) = SqliteRepo::find_house_by_url_branch(conn, url, branch)? {
            warn!(
                op = "house_add_remote",
                house = name,
                existing = %existing.name,
                "the same url and branch is already registered as house '{}'",
                existing.name
            );
        }

        let dest = self.remote_cache_dir.join(name);
        fetch_into(self.fetcher.as_ref(), url, branch, &self.remote_cache_dir, &dest)?;

        let house = House::remote(name, url, branch, dest);
        let report = scan_house(&house, self.loader.as_ref(), &mut PartWriter(conn));
        SqliteRepo::insert_house(conn, &house)?;
        Ok(report)
    }

    /// Register an existing directory as a house named after its last segment
    ///
    /// # Errors
    ///
    /// - `PathNotFound`: `path` does not exist
    /// - `DuplicateName`: a house with that name exists
    /// - `ModuleConflict`: another package of the same name resolves elsewhere
    pub fn add_local_house(&mut self, path: impl AsRef<Path>) -> Result<ScanReport> {
        let path = path.as_ref();
        log_op_start!("house_add_local", path = %path.display());
        let start = std::time::Instant::now();

        let report = self.add_local_house_impl(path).map_err(|e| {
            log_op_error!(
                "house_add_local",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                path = %path.display()
            );
            e
        })?;

        log_op_end!(
            "house_add_local",
            duration_ms = start.elapsed().as_millis() as u64,
            part_count = report.registered.len(),
            skipped_count = report.skipped.len()
        );
        Ok(report)
    }

    fn add_local_house_impl(&mut self, path: &Path) -> Result<ScanReport> {
        let house_path = path.canonicalize().map_err(|_| HouseError::PathNotFound {
            path: path.to_path_buf(),
        })?;
        let name = house_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| HouseError::PathNotFound {
                path: path.to_path_buf(),
            })?;

        ensure_name_free(&self.conn, &name)?;
        self.check_module_conflict(&name, &house_path)?;

        // The scan loads parts through the house's parent, so the root is
        // registered up front and withdrawn again if the session rolls back.
        let new_root = house_path
            .parent()
            .filter(|parent| !self.loader.search_roots().iter().any(|r| r.as_path() == *parent))
            .map(Path::to_path_buf);
        if let Some(root) = &new_root {
            self.loader.add_search_root(root);
        }

        let house = House::local(&name, &house_path);
        let result = with_session(&self.conn, "house_add_local", |conn| {
            let report = scan_house(&house, self.loader.as_ref(), &mut PartWriter(conn));
            SqliteRepo::insert_house(conn, &house)?;
            Ok(report)
        });
        if let (Err(_), Some(root)) = (&result, &new_root) {
            self.loader.remove_search_root(root);
        }
        result
    }

    /// Fail when `name` already resolves to a package outside `house_path`
    fn check_module_conflict(&self, name: &str, house_path: &Path) -> Result<()> {
        let Some(existing) = self.loader.locate_package(name) else {
            return Ok(());
        };
        let existing_canonical = existing.canonicalize().unwrap_or_else(|_| existing.clone());
        if existing_canonical == house_path {
            return Ok(());
        }
        Err(HouseError::ModuleConflict {
            house_name: name.to_string(),
            conflict_path: existing,
            house_path: house_path.to_path_buf(),
        }
        .into())
    }

    /// Replace a house's parts with a fresh scan, re-fetching remote houses
    ///
    /// # Errors
    ///
    /// `HouseNotFound` if unregistered; fetch errors for remote houses.
    pub fn update_house(&self, name: &str) -> Result<ScanReport> {
        log_op_start!("house_update", house = name);
        let start = std::time::Instant::now();

        let report = with_session(&self.conn, "house_update", |conn| {
            self.update_house_impl(conn, name)
        })
        .map_err(|e| {
            log_op_error!(
                "house_update",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                house = name
            );
            e
        })?;

        log_op_end!(
            "house_update",
            duration_ms = start.elapsed().as_millis() as u64,
            house = name,
            part_count = report.registered.len(),
            skipped_count = report.skipped.len()
        );
        Ok(report)
    }

    fn update_house_impl(&self, conn: &Connection, name: &str) -> Result<ScanReport> {
        let house = find_house(conn, name)?;
        SqliteRepo::delete_parts_by_house(conn, name)?;

        if house.is_remote() {
            let (Some(url), Some(branch)) = (house.url.as_deref(), house.branch.as_deref()) else {
                return Err(HouseError::Internal {
                    message: format!("remote house '{}' has no url or branch", name),
                }
                .into());
            };
            fetch_into(
                self.fetcher.as_ref(),
                url,
                branch,
                &self.remote_cache_dir,
                &house.local_path,
            )?;
        }

        Ok(scan_house(&house, self.loader.as_ref(), &mut PartWriter(conn)))
    }

    /// Delete a house and all its parts
    ///
    /// The remote clone, if any, stays on disk; adding the house again wipes it.
    /// Removing a house that is not registered deletes nothing and succeeds.
    pub fn remove_house(&self, name: &str) -> Result<()> {
        log_op_start!("house_remove", house = name);
        let start = std::time::Instant::now();

        let removed = with_session(&self.conn, "house_remove", |conn| {
            let parts = SqliteRepo::delete_parts_by_house(conn, name)?;
            if SqliteRepo::delete_house(conn, name)? == 0 {
                debug!(op = "house_remove", house = name, "house not registered, nothing removed");
            }
            Ok(parts)
        })
        .map_err(|e| {
            log_op_error!(
                "house_remove",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                house = name
            );
            e
        })?;

        log_op_end!(
            "house_remove",
            duration_ms = start.elapsed().as_millis() as u64,
            house = name,
            part_count = removed
        );
        Ok(())
    }

    /// Local directory of a registered house
    pub fn get_house_path(&self, name: &str) -> Result<PathBuf> {
        Ok(find_house(&self.conn, name)?.local_path)
    }

    /// Names of all houses in registration order
    pub fn get_house_name_list(&self) -> Result<Vec<String>> {
        Ok(self.list_houses()?.into_iter().map(|h| h.name).collect())
    }

    pub fn list_houses(&self) -> Result<Vec<House>> {
        SqliteRepo::list_houses(&self.conn)
    }
}

fn ensure_name_free(conn: &Connection, name: &str) -> Result<()> {
    if SqliteRepo::find_house_by_name(conn, name)?.is_some() {
        return Err(ExError::from(HouseError::HouseNameRepeat {
            name: name.to_string(),
        }));
    }
    Ok(())
}

fn find_house(conn: &Connection, name: &str) -> Result<House> {
    SqliteRepo::find_house_by_name(conn, name)?.ok_or_else(|| {
        HouseError::HouseNotFound {
            name: name.to_string(),
        }
        .into()
    })
}
