//! Transaction scope for mutating operations
//!
//! The outermost call opens a transaction and commits or rolls it back on
//! every exit path. Nested calls run inside the scope they find.

use rusqlite::Connection;
use strathouse_store::errors::{from_rusqlite, Result};
use tracing::{debug, warn};

/// Run `f` inside a transaction on `conn`
///
/// Opens the transaction only when none is active; in that case commits when
/// `f` succeeds and rolls back when it fails. When a transaction is already
/// open, `f` joins it and the outer scope decides.
pub fn with_session<T>(
    conn: &Connection,
    op: &str,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    if !conn.is_autocommit() {
        return f(conn);
    }

    conn.execute_batch("BEGIN").map_err(from_rusqlite)?;
    debug!(op, "session opened");

    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT").map_err(from_rusqlite)?;
            debug!(op, "session committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                warn!(op, error = %rollback_err, "rollback failed");
            }
            debug!(op, "session rolled back");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strathouse_core::errors::{ExError, ExErrorKind};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER)").unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap()
    }

    fn insert(conn: &Connection) -> Result<()> {
        conn.execute("INSERT INTO t (x) VALUES (1)", [])
            .map_err(from_rusqlite)?;
        Ok(())
    }

    #[test]
    fn test_success_commits() {
        let conn = setup();
        with_session(&conn, "t", insert).unwrap();
        assert!(conn.is_autocommit());
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_failure_rolls_back() {
        let conn = setup();
        let result: Result<()> = with_session(&conn, "t", |c| {
            insert(c)?;
            Err(ExError::new(ExErrorKind::Internal).with_message("boom"))
        });
        assert!(result.is_err());
        assert!(conn.is_autocommit());
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn test_nested_scope_joins_outer_transaction() {
        let conn = setup();
        let result: Result<()> = with_session(&conn, "outer", |c| {
            with_session(c, "inner", insert)?;
            // The inner scope must not have committed on its own
            assert!(!c.is_autocommit());
            Err(ExError::new(ExErrorKind::Internal).with_message("outer fails"))
        });
        assert!(result.is_err());
        assert_eq!(count(&conn), 0);
    }
}
