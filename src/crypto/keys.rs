//! Key derivation helpers using HKDF-SHA256.
//!
//! From the Argon2id master key we derive two independent sub-keys:
//! - A **verifier** stored in the database to check the master password.
//! - The **record key** used to seal and open every credential field.
//!
//! Knowing the verifier reveals nothing about the record key, so the
//! stored verifier cannot be used to decrypt the vault.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of derived sub-keys (256 bits).
pub const KEY_LEN: usize = 32;

const VERIFIER_INFO: &[u8] = b"passvault-verifier";
const RECORD_KEY_INFO: &[u8] = b"passvault-record-key";

/// Derive the password verifier from the master key.
pub fn derive_verifier(master_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master_key, VERIFIER_INFO)
}

/// Derive the record encryption key from the master key.
pub fn derive_record_key(master_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master_key, RECORD_KEY_INFO)
}

/// Run HKDF-SHA256 expand with the given `info`.
///
/// The extract step uses a zero salt; the input already came out of
/// Argon2id and carries full entropy.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// The 32-byte key that seals and opens credential fields for one session.
///
/// Zeroed when dropped; never printed.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SessionKey {
    bytes: [u8; KEY_LEN],
}

impl SessionKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive the session key from an Argon2id master key.
    pub fn from_master(master_key: &[u8]) -> Result<Self> {
        let mut bytes = derive_record_key(master_key)?;
        let key = Self::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}
