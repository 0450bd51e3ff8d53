//! Database schema bootstrap.
//!
//! Two tables:
//! - `credentials`: one row per stored credential; both fields are sealed
//!   blobs. `id` is never reused or rewritten, and `ORDER BY id` defines
//!   the displayed numbering.
//! - `auth`: at most one row (enforced by `CHECK (id = 1)`) holding the
//!   Argon2id salt, parameters and password verifier.

use rusqlite::Connection;
use tracing::debug;

use crate::errors::{Result, VaultError};

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS credentials (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        service     BLOB NOT NULL,
        secret      BLOB NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS auth (
        id          INTEGER PRIMARY KEY CHECK (id = 1),
        salt        BLOB NOT NULL,
        verifier    BLOB NOT NULL,
        memory_kib  INTEGER NOT NULL,
        iterations  INTEGER NOT NULL,
        parallelism INTEGER NOT NULL,
        created_at  TEXT NOT NULL
    );
";

/// Create any missing tables. Safe to call on every startup.
///
/// Refuses a database written by a newer schema version.
pub fn bootstrap(conn: &Connection) -> Result<()> {
    let version = user_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(VaultError::SchemaError(format!(
            "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    // Dropping the transaction on an early return rolls it back.
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(CREATE_TABLES)
        .map_err(|e| VaultError::SchemaError(format!("bootstrap failed: {e}")))?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    debug!(from = version, to = SCHEMA_VERSION, "schema ready");
    Ok(())
}

/// Read `PRAGMA user_version` (0 for a fresh database).
pub fn user_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        names
    }

    #[test]
    fn bootstrap_creates_tables_and_sets_version() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();

        let names = table_names(&conn);
        assert!(names.contains(&"credentials".to_string()));
        assert!(names.contains(&"auth".to_string()));
        assert_eq!(user_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn bootstrap_is_idempotent_and_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();
        conn.execute(
            "INSERT INTO credentials (service, secret, created_at) VALUES (x'01', x'02', 'now')",
            [],
        )
        .unwrap();

        bootstrap(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM credentials", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn auth_table_holds_at_most_one_row() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();

        let insert = "INSERT INTO auth (id, salt, verifier, memory_kib, iterations, parallelism, created_at)
                      VALUES (?1, x'00', x'00', 8192, 1, 1, 'now')";
        conn.execute(insert, [1]).unwrap();
        assert!(conn.execute(insert, [1]).is_err());
        assert!(conn.execute(insert, [2]).is_err());
    }

    #[test]
    fn failed_bootstrap_rolls_back() {
        let conn = Connection::open_in_memory().unwrap();
        // An index named `auth` makes creating the `auth` table fail after
        // `credentials` was already created.
        conn.execute_batch("CREATE TABLE other (a); CREATE INDEX auth ON other (a);")
            .unwrap();

        let result = bootstrap(&conn);
        assert!(matches!(result, Err(VaultError::SchemaError(_))));
        assert!(conn.is_autocommit(), "no transaction left open");
        assert!(!table_names(&conn).contains(&"credentials".to_string()));
        assert_eq!(user_version(&conn).unwrap(), 0);
    }

    #[test]
    fn bootstrap_rejects_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();

        let result = bootstrap(&conn);
        assert!(matches!(result, Err(VaultError::SchemaError(_))));
    }
}
