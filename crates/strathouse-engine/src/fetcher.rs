//! Fetching remote houses
//!
//! A `Fetcher` materializes `url`@`branch` as a directory tree. The manager
//! always goes through `fetch_into`, which wipes the destination first and
//! only ever touches a direct child of the cache directory.

use std::fs;
use std::io;
use std::path::{Component, Path};
use std::process::Command;

use strathouse_core::errors::{HouseError, Result};
use tracing::{debug, info};

/// Materializes a remote repository at a local path
pub trait Fetcher {
    /// Clone `url` at `branch` into `dest`, which does not exist yet
    ///
    /// # Errors
    ///
    /// `FetchFailed` naming the URL on any failure.
    fn fetch(&self, url: &str, branch: &str, dest: &Path) -> Result<()>;
}

/// Fetcher that shells out to `git clone`
#[derive(Debug, Clone)]
pub struct GitFetcher {
    program: String,
}

impl GitFetcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Fetcher for GitFetcher {
    fn fetch(&self, url: &str, branch: &str, dest: &Path) -> Result<()> {
        let failed = |reason: String| HouseError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let output = Command::new(&self.program)
            .args(["clone", "--branch", branch, url])
            .arg(dest)
            .output()
            .map_err(|e| failed(format!("cannot run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{}: {}", output.status, stderr.trim())));
        }
        Ok(())
    }
}

/// Wipe `dest` and fetch `url`@`branch` into it
///
/// # Errors
///
/// `FetchTargetOutsideCache` unless `dest` is a direct child of `cache_dir`;
/// nothing on disk is touched in that case.
pub fn fetch_into(
    fetcher: &dyn Fetcher,
    url: &str,
    branch: &str,
    cache_dir: &Path,
    dest: &Path,
) -> Result<()> {
    ensure_cache_child(cache_dir, dest)?;
    remove_dir_forced(dest)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| HouseError::io("fetch", &e))?;
    }

    info!(url, branch, path = %dest.display(), "downloading to {}", dest.display());
    fetcher.fetch(url, branch, dest)?;
    info!(url, path = %dest.display(), "download finished");
    Ok(())
}

fn ensure_cache_child(cache_dir: &Path, dest: &Path) -> Result<()> {
    let is_child = dest.strip_prefix(cache_dir).is_ok_and(|rest| {
        let mut components = rest.components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    });
    if is_child {
        return Ok(());
    }
    Err(HouseError::FetchTargetOutsideCache {
        path: dest.to_path_buf(),
        cache_dir: cache_dir.to_path_buf(),
    })
}

/// Remove a directory tree, forcing write permission once if needed
///
/// A missing directory is not an error.
///
/// # Errors
///
/// `RemovalFailed` when the tree is still not removable after permissions
/// were forced.
pub fn remove_dir_forced(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(_) => {}
    }

    // Read-only entries (e.g. git pack files on Windows) block removal
    if let Err(e) = make_writable(path) {
        debug!(path = %path.display(), error = %e, "could not force write permission");
    }
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(_) => Err(HouseError::RemovalFailed {
            path: path.to_path_buf(),
        }),
    }
}

fn make_writable(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }
    set_writable(path, &meta)?;
    if meta.is_dir() {
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if let Err(e) = make_writable(&entry_path) {
                debug!(path = %entry_path.display(), error = %e, "could not force write permission");
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_writable(path: &Path, _meta: &fs::Metadata) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o777))
}

#[cfg(not(unix))]
fn set_writable(path: &Path, meta: &fs::Metadata) -> io::Result<()> {
    let mut perms = meta.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strathouse_core::errors::ExError;
    use strathouse_core::ExErrorKind;

    #[test]
    fn test_remove_missing_dir_is_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(remove_dir_forced(&dir.path().join("absent")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_read_only_tree() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("clone");
        let inner = target.join("objects");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("pack"), "data").unwrap();
        fs::set_permissions(&inner, fs::Permissions::from_mode(0o555)).unwrap();

        remove_dir_forced(&target).unwrap();
        assert!(!target.exists());
    }

    #[derive(Default)]
    struct CountingFetcher {
        calls: std::cell::Cell<usize>,
    }

    impl Fetcher for CountingFetcher {
        fn fetch(&self, _url: &str, _branch: &str, dest: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            fs::create_dir_all(dest).map_err(|e| HouseError::io("fetch", &e))
        }
    }

    #[test]
    fn test_fetch_into_refuses_targets_outside_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache = dir.path().join("cache");
        let kept = cache.join("kept");
        fs::create_dir_all(&kept).unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("data.txt"), "keep me").unwrap();

        let fetcher = CountingFetcher::default();
        for dest in [
            cache.clone(),
            outside.clone(),
            cache.join("a").join("b"),
            cache.join("..").join("outside"),
        ] {
            let err: ExError = fetch_into(&fetcher, "u", "master", &cache, &dest)
                .unwrap_err()
                .into();
            assert_eq!(err.kind(), ExErrorKind::InvalidInput, "{}", dest.display());
        }

        assert_eq!(fetcher.calls.get(), 0);
        assert!(kept.is_dir());
        assert!(outside.join("data.txt").is_file());
    }

    #[test]
    fn test_fetch_into_replaces_cache_child() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache = dir.path().join("cache");
        let dest = cache.join("house");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.txt"), "old").unwrap();

        let fetcher = CountingFetcher::default();
        fetch_into(&fetcher, "u", "master", &cache, &dest).unwrap();

        assert_eq!(fetcher.calls.get(), 1);
        assert!(dest.is_dir());
        assert!(!dest.join("stale.txt").exists());
    }

    #[test]
    fn test_unforceable_permissions_are_logged_before_failing() {
        let capture = strathouse_core::logging_facility::init_test_capture();
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "not a directory").unwrap();
        let target = file.join("clone");

        let err: ExError = remove_dir_forced(&target).unwrap_err().into();

        assert_eq!(err.kind(), ExErrorKind::RemovalFailed);
        let path = target.display().to_string();
        let logged = capture.count_events(|e| {
            e.field("path") == Some(path.as_str()) && e.field("error").is_some()
        });
        assert_eq!(logged, 1);
    }

    #[test]
    fn test_missing_git_program_fails_naming_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let fetcher = GitFetcher::new("strathouse-no-such-git-binary");
        let err = fetcher
            .fetch("https://example.invalid/h.git", "master", &dir.path().join("h"))
            .unwrap_err();

        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::FetchFailed);
        assert!(ex.to_string().contains("https://example.invalid/h.git"));
    }
}
