//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - Schema bootstrap for the SQLite database (`schema`)
//! - The master password gate (`auth`)
//! - `Credential` and `ListedCredential` types (`record`)
//! - The per-run `Session` (`session`)
//! - The `Vault` handle for creating, listing and deleting records (`store`)

mod auth;
pub mod record;
pub mod schema;
pub mod session;
pub mod store;

pub use record::{Credential, ListedCredential};
pub use session::Session;
pub use store::Vault;
