//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM sealing and opening of record fields (`encryption`)
//! - Argon2id password-based key derivation (`kdf`)
//! - HKDF-based verifier and session key derivation (`keys`)
//! - Random password generation (`generator`)

pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

pub use encryption::{open, seal};
pub use generator::generate_password;
pub use kdf::{derive_master_key, generate_salt, Argon2Params};
pub use keys::SessionKey;
