//! Migration checksums
//!
//! The SHA256 of each migration's SQL is recorded when it is applied and
//! compared on every later open, so an edited migration is caught instead of
//! silently diverging from databases created with the old text.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA256 of migration SQL
pub fn compute_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

/// Whether a recorded checksum still matches the embedded SQL
///
/// Rows recorded without a checksum are accepted.
pub fn matches_recorded(recorded: Option<&str>, sql: &str) -> bool {
    recorded.map_or(true, |r| r == compute_checksum(sql))
}
