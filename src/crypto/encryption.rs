//! AES-256-GCM authenticated encryption of single record fields.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce and
//! prepends it, together with a format version byte, to the ciphertext.
//! `open` splits them back out before decrypting.
//!
//! Layout of a sealed field:
//!   [ 1-byte version | 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, VaultError};

/// Current sealed-field format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Bytes added on top of the plaintext length by `seal`.
pub const OVERHEAD: usize = 1 + NONCE_LEN + TAG_LEN;

/// Encrypt `plaintext` under a 32-byte `key`.
///
/// Returns `version || nonce || ciphertext`.
pub fn seal(plaintext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    output.push(FORMAT_VERSION);
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt a field produced by `seal`.
///
/// Fails with `DecryptionFailed` when the blob is too short to hold a
/// nonce and tag, or when the tag does not verify under `key`.
pub fn open(sealed: &[u8], key: &[u8; 32]) -> Result<Vec<u8>> {
    if sealed.len() < OVERHEAD {
        return Err(VaultError::DecryptionFailed);
    }

    let (version, rest) = sealed.split_at(1);
    if version[0] != FORMAT_VERSION {
        return Err(VaultError::UnsupportedFormat(version[0]));
    }

    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}

/// Return the nonce embedded in a sealed field, if the blob is long enough.
#[cfg(test)]
pub(crate) fn nonce_of(sealed: &[u8]) -> Option<&[u8]> {
    sealed.get(1..1 + NONCE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];

    #[test]
    fn sealed_length_is_plaintext_plus_overhead() {
        let sealed = seal(b"hunter2", &KEY).unwrap();
        assert_eq!(sealed.len(), 7 + OVERHEAD);
        assert_eq!(sealed[0], FORMAT_VERSION);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let sealed = seal(b"", &KEY).unwrap();
        assert_eq!(sealed.len(), OVERHEAD);
        assert_eq!(open(&sealed, &KEY).unwrap(), b"");
    }

    #[test]
    fn one_byte_short_is_rejected() {
        let sealed = seal(b"", &KEY).unwrap();
        let result = open(&sealed[..OVERHEAD - 1], &KEY);
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut sealed = seal(b"abc", &KEY).unwrap();
        sealed[0] = 0x7f;
        assert!(matches!(
            open(&sealed, &KEY),
            Err(VaultError::UnsupportedFormat(0x7f))
        ));
    }

    #[test]
    fn nonce_of_returns_the_prefix_after_version() {
        let sealed = seal(b"abc", &KEY).unwrap();
        assert_eq!(nonce_of(&sealed).unwrap(), &sealed[1..13]);
        assert!(nonce_of(&[1u8, 2, 3]).is_none());
    }
}
