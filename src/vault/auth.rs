//! Master password gate.
//!
//! The master password itself is never stored.  Enrollment derives an
//! Argon2id master key from the password and a random salt, then stores
//! only the salt, the Argon2 parameters and an HKDF-derived verifier.
//! Verification repeats the derivation with the stored salt/params and
//! compares verifiers in constant time.
//!
//! Enrollment and verification share `authenticate`; which one runs is
//! decided by whether the `auth` row exists.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::crypto::kdf::{derive_master_key, generate_salt, Argon2Params};
use crate::crypto::keys::{derive_verifier, SessionKey};
use crate::errors::{Result, VaultError};

/// What is stored in the single `auth` row.
pub(crate) struct StoredVerifier {
    salt: Vec<u8>,
    verifier: Vec<u8>,
    params: Argon2Params,
}

/// Whether a master password has been enrolled.
pub(crate) enum GateState {
    Uninitialized,
    Initialized(StoredVerifier),
}

/// Read the gate state from the `auth` table.
pub(crate) fn state(conn: &Connection) -> Result<GateState> {
    let row = conn
        .query_row(
            "SELECT salt, verifier, memory_kib, iterations, parallelism FROM auth WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, Vec<u8>>(0)?,
                    row.get::<_, Vec<u8>>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((salt, verifier, memory_kib, iterations, parallelism)) = row else {
        return Ok(GateState::Uninitialized);
    };

    let params = Argon2Params {
        memory_kib: stored_u32("memory_kib", memory_kib)?,
        iterations: stored_u32("iterations", iterations)?,
        parallelism: stored_u32("parallelism", parallelism)?,
    };

    Ok(GateState::Initialized(StoredVerifier {
        salt,
        verifier,
        params,
    }))
}

fn stored_u32(column: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| VaultError::SchemaError(format!("auth.{column} out of range: {value}")))
}

/// Enroll `candidate` on first use, otherwise verify it.
///
/// `params` only applies to enrollment; verification always uses the
/// parameters stored at enrollment time.
pub(crate) fn authenticate(
    conn: &Connection,
    candidate: &str,
    params: &Argon2Params,
) -> Result<SessionKey> {
    match state(conn)? {
        GateState::Uninitialized => enroll(conn, candidate, params),
        GateState::Initialized(stored) => verify(&stored, candidate),
    }
}

fn enroll(conn: &Connection, candidate: &str, params: &Argon2Params) -> Result<SessionKey> {
    if candidate.is_empty() {
        return Err(VaultError::EmptyMasterPassword);
    }

    let salt = generate_salt();
    let mut master = derive_master_key(candidate.as_bytes(), &salt, params)?;
    let derived = derive_verifier(&master).and_then(|verifier| {
        SessionKey::from_master(&master).map(|key| (verifier, key))
    });
    master.zeroize();
    let (verifier, key) = derived?;

    // Plain INSERT: the primary key makes a second enrollment fail
    // instead of replacing the first.
    conn.execute(
        "INSERT INTO auth (id, salt, verifier, memory_kib, iterations, parallelism, created_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            salt.to_vec(),
            verifier.to_vec(),
            params.memory_kib,
            params.iterations,
            params.parallelism,
            Utc::now().to_rfc3339(),
        ],
    )?;

    info!(
        memory_kib = params.memory_kib,
        iterations = params.iterations,
        parallelism = params.parallelism,
        "master password enrolled"
    );
    Ok(key)
}

fn verify(stored: &StoredVerifier, candidate: &str) -> Result<SessionKey> {
    let mut master = derive_master_key(candidate.as_bytes(), &stored.salt, &stored.params)?;
    let derived = derive_verifier(&master);
    let result = match derived {
        Ok(mut verifier) => {
            let matches: bool = verifier.as_slice().ct_eq(&stored.verifier).into();
            verifier.zeroize();
            if matches {
                SessionKey::from_master(&master)
            } else {
                Err(VaultError::AuthenticationFailed)
            }
        }
        Err(e) => Err(e),
    };
    master.zeroize();

    match &result {
        Ok(_) => debug!("master password verified"),
        Err(_) => warn!("master password rejected"),
    }
    result
}
