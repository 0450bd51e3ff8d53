//! High-level vault operations used by CLI commands.
//!
//! `Vault` wraps the SQLite connection, the master gate and the crypto
//! layer so the rest of the application works with simple calls like
//! `vault.create(&mut session, "email", "hunter2")`.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::crypto::encryption::{open, seal};
use crate::crypto::kdf::Argon2Params;
use crate::crypto::SessionKey;
use crate::errors::{Result, VaultError};

use super::auth::{self, GateState};
use super::record::{Credential, ListedCredential};
use super::schema;
use super::session::Session;

/// Raw columns of one `credentials` row.
///
/// Read untyped so a row holding the wrong SQLite type fails on its own
/// instead of aborting the whole listing.
struct SealedRow {
    service: Value,
    secret: Value,
    created_at: Value,
}

/// Handle to the credential database.
#[derive(Debug)]
pub struct Vault {
    conn: Connection,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open (or create) the database file at `path`.
    ///
    /// Call `bootstrap` before anything else.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Create the file owner-only before SQLite touches it.
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .mode(0o600)
                .open(path)?;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        let conn = Connection::open(path)?;

        debug!(path = %path.display(), "database opened");
        Ok(Self { conn })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Ensure the schema exists. Never touches existing rows.
    pub fn bootstrap(&self) -> Result<()> {
        schema::bootstrap(&self.conn)
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Returns `true` once a master password has been enrolled.
    pub fn is_enrolled(&self) -> Result<bool> {
        Ok(matches!(
            auth::state(&self.conn)?,
            GateState::Initialized(_)
        ))
    }

    /// Enroll `candidate` as the master password on first run, or verify
    /// it on later runs.  Returns the session every other operation needs.
    ///
    /// `params` is only used for enrollment.
    pub fn authenticate(&self, candidate: &str, params: &Argon2Params) -> Result<Session> {
        let key = auth::authenticate(&self.conn, candidate, params)?;
        let count = self.count()?;
        info!(records = count, "vault unlocked");
        Ok(Session::new(key, count))
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Seal and append a new credential.
    ///
    /// Returns the logical index the new record is listed under.
    pub fn create(&self, session: &mut Session, service: &str, secret: &str) -> Result<usize> {
        if service.trim().is_empty() {
            return Err(VaultError::EmptyService);
        }
        if secret.is_empty() {
            return Err(VaultError::EmptySecret);
        }

        let key = session.key().as_bytes();
        let sealed_service = seal(service.as_bytes(), key)?;
        let sealed_secret = seal(secret.as_bytes(), key)?;

        self.conn.execute(
            "INSERT INTO credentials (service, secret, created_at) VALUES (?1, ?2, ?3)",
            params![sealed_service, sealed_secret, Utc::now().to_rfc3339()],
        )?;

        session.record_added();
        self.refresh(session);

        debug!(records = session.record_count(), "credential stored");
        Ok(session.record_count())
    }

    /// Decrypt every record, numbered 1.. in storage order.
    ///
    /// A record that fails to decrypt is returned with an error in place
    /// of its contents; the other records are unaffected.
    pub fn list(&self, session: &Session) -> Result<Vec<ListedCredential>> {
        let mut stmt = self
            .conn
            .prepare("SELECT service, secret, created_at FROM credentials ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(SealedRow {
                service: row.get(0)?,
                secret: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;

        let mut listed = Vec::new();
        for (position, row) in rows.enumerate() {
            let row = row?;
            let index = position + 1;
            let record = open_row(&row, session.key());
            if let Err(ref e) = record {
                warn!(index, error = %e, "record failed to decrypt");
            }
            listed.push(ListedCredential {
                index,
                created_at: parse_timestamp(&row.created_at),
                record,
            });
        }

        Ok(listed)
    }

    /// Delete the record at logical `index` (1-based).
    ///
    /// Later records move down one position.  The lookup and delete run in
    /// one transaction.
    pub fn delete_by_index(&mut self, session: &mut Session, index: usize) -> Result<()> {
        let count = session.record_count();
        if index == 0 || index > count {
            return Err(VaultError::IndexOutOfRange { index, count });
        }
        let offset = i64::try_from(index - 1)
            .map_err(|_| VaultError::IndexOutOfRange { index, count })?;

        let tx = self.conn.transaction()?;

        let id: Option<i64> = tx
            .query_row(
                "SELECT id FROM credentials ORDER BY id LIMIT 1 OFFSET ?1",
                params![offset],
                |row| row.get(0),
            )
            .optional()?;

        let Some(id) = id else {
            // The cached count was stale; nothing was changed.
            let actual = count_rows(&tx)?;
            drop(tx);
            session.set_record_count(actual);
            return Err(VaultError::IndexOutOfRange {
                index,
                count: actual,
            });
        };

        tx.execute("DELETE FROM credentials WHERE id = ?1", params![id])?;
        tx.commit()?;

        session.record_removed();
        self.refresh(session);

        debug!(index, records = session.record_count(), "credential deleted");
        Ok(())
    }

    /// Edit record `index` in place. Always fails with `NotSupported`.
    pub fn update_by_index(&mut self, _session: &mut Session, _index: usize) -> Result<()> {
        Err(VaultError::NotSupported(
            "editing an existing record".into(),
        ))
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        count_rows(&self.conn)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Re-read the record count into the session.
    ///
    /// Runs after a committed write, so a failure here must not report
    /// the write as failed; the incremental count is kept instead.
    fn refresh(&self, session: &mut Session) {
        match self.count() {
            Ok(count) => session.set_record_count(count),
            Err(e) => warn!(error = %e, "could not refresh record count"),
        }
    }
}

fn count_rows(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))?;
    usize::try_from(count)
        .map_err(|_| VaultError::SchemaError(format!("invalid record count {count}")))
}

fn open_row(row: &SealedRow, key: &SessionKey) -> Result<Credential> {
    let service = open_text(&row.service, key)?;
    let secret = open_text(&row.secret, key)?;
    Ok(Credential { service, secret })
}

fn open_text(sealed: &Value, key: &SessionKey) -> Result<String> {
    let Value::Blob(sealed) = sealed else {
        return Err(VaultError::DecryptionFailed);
    };
    let plaintext = open(sealed, key.as_bytes())?;
    // A field that authenticates but is not UTF-8 was not written by us.
    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::DecryptionFailed
    })
}

fn parse_timestamp(raw: &Value) -> DateTime<Utc> {
    match raw {
        Value::Text(text) => DateTime::parse_from_rfc3339(text)
            .map_or(DateTime::<Utc>::UNIX_EPOCH, |dt| dt.with_timezone(&Utc)),
        _ => DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked() -> (Vault, Session) {
        let vault = Vault::open_in_memory().unwrap();
        vault.bootstrap().unwrap();
        let session = vault
            .authenticate("master", &Argon2Params::minimum())
            .unwrap();
        (vault, session)
    }

    fn services(vault: &Vault, session: &Session) -> Vec<(usize, String)> {
        vault
            .list(session)
            .unwrap()
            .into_iter()
            .map(|l| (l.index, l.record.unwrap().service))
            .collect()
    }

    #[test]
    fn create_rejects_blank_service() {
        let (vault, mut session) = unlocked();
        let result = vault.create(&mut session, "   ", "pw");
        assert!(matches!(result, Err(VaultError::EmptyService)));
        assert_eq!(vault.count().unwrap(), 0);
        assert_eq!(session.record_count(), 0);
    }

    #[test]
    fn create_rejects_empty_secret() {
        let (vault, mut session) = unlocked();
        let result = vault.create(&mut session, "email", "");
        assert!(matches!(result, Err(VaultError::EmptySecret)));
        assert_eq!(vault.count().unwrap(), 0);
    }

    #[test]
    fn create_returns_new_index() {
        let (vault, mut session) = unlocked();
        assert_eq!(vault.create(&mut session, "a", "1").unwrap(), 1);
        assert_eq!(vault.create(&mut session, "b", "2").unwrap(), 2);
        assert_eq!(session.record_count(), 2);
    }

    #[test]
    fn nothing_is_stored_in_plaintext() {
        let (vault, mut session) = unlocked();
        vault.create(&mut session, "email", "p@ss1").unwrap();

        let (service, secret): (Vec<u8>, Vec<u8>) = vault
            .conn
            .query_row("SELECT service, secret FROM credentials", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert!(!service.windows(5).any(|w| w == b"email"));
        assert!(!secret.windows(5).any(|w| w == b"p@ss1"));
        assert_ne!(
            crate::crypto::encryption::nonce_of(&service),
            crate::crypto::encryption::nonce_of(&secret)
        );
    }

    #[test]
    fn delete_zero_is_out_of_range() {
        let (mut vault, mut session) = unlocked();
        vault.create(&mut session, "a", "1").unwrap();
        let result = vault.delete_by_index(&mut session, 0);
        assert!(matches!(
            result,
            Err(VaultError::IndexOutOfRange { index: 0, count: 1 })
        ));
        assert_eq!(vault.count().unwrap(), 1);
    }

    #[test]
    fn delete_past_end_is_out_of_range() {
        let (mut vault, mut session) = unlocked();
        vault.create(&mut session, "a", "1").unwrap();
        assert!(vault.delete_by_index(&mut session, 2).is_err());
        assert_eq!(vault.count().unwrap(), 1);
    }

    #[test]
    fn delete_with_stale_count_changes_nothing() {
        let (mut vault, mut session) = unlocked();
        vault.create(&mut session, "a", "1").unwrap();
        session.set_record_count(3);

        let result = vault.delete_by_index(&mut session, 3);
        assert!(matches!(
            result,
            Err(VaultError::IndexOutOfRange { index: 3, count: 1 })
        ));
        assert_eq!(session.record_count(), 1);
        assert_eq!(vault.count().unwrap(), 1);
    }

    #[test]
    fn delete_middle_shifts_later_records_down() {
        let (mut vault, mut session) = unlocked();
        for name in ["a", "b", "c", "d"] {
            vault.create(&mut session, name, "pw").unwrap();
        }

        vault.delete_by_index(&mut session, 2).unwrap();

        assert_eq!(
            services(&vault, &session),
            vec![
                (1, "a".to_string()),
                (2, "c".to_string()),
                (3, "d".to_string())
            ]
        );
        assert_eq!(session.record_count(), 3);
    }

    #[test]
    fn corrupted_record_is_reported_alone() {
        let (vault, mut session) = unlocked();
        vault.create(&mut session, "a", "1").unwrap();
        vault.create(&mut session, "b", "2").unwrap();
        vault.create(&mut session, "c", "3").unwrap();

        vault
            .conn
            .execute(
                "UPDATE credentials SET secret = x'00' WHERE id = (SELECT id FROM credentials ORDER BY id LIMIT 1 OFFSET 1)",
                [],
            )
            .unwrap();

        let listed = vault.list(&session).unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].record.is_ok());
        assert!(matches!(listed[1].record, Err(VaultError::DecryptionFailed)));
        assert_eq!(listed[1].index, 2);
        assert_eq!(listed[2].record.as_ref().unwrap().service, "c");
    }

    #[test]
    fn wrongly_typed_column_is_reported_alone() {
        let (vault, mut session) = unlocked();
        vault.create(&mut session, "a", "1").unwrap();
        vault.create(&mut session, "b", "2").unwrap();
        vault.create(&mut session, "c", "3").unwrap();

        vault
            .conn
            .execute(
                "UPDATE credentials SET secret = 'garbage', created_at = 42
                 WHERE id = (SELECT id FROM credentials ORDER BY id LIMIT 1 OFFSET 1)",
                [],
            )
            .unwrap();

        let listed = vault.list(&session).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].record.as_ref().unwrap().service, "a");
        assert!(matches!(listed[1].record, Err(VaultError::DecryptionFailed)));
        assert_eq!(listed[1].created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(listed[2].index, 3);
        assert_eq!(listed[2].record.as_ref().unwrap().secret, "3");
    }

    #[test]
    fn update_is_not_supported() {
        let (mut vault, mut session) = unlocked();
        vault.create(&mut session, "a", "1").unwrap();
        let result = vault.update_by_index(&mut session, 1);
        assert!(matches!(result, Err(VaultError::NotSupported(_))));
    }

    #[test]
    fn list_of_empty_store_is_empty() {
        let (vault, session) = unlocked();
        assert!(vault.list(&session).unwrap().is_empty());
    }
}
