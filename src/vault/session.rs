//! State for one authenticated run.

use crate::crypto::SessionKey;

/// Holds the session key and the cached record count.
///
/// Only `Vault::authenticate` creates one, so holding a `Session` is proof
/// the master password was verified. Never persisted.
#[derive(Debug)]
pub struct Session {
    key: SessionKey,
    record_count: usize,
}

impl Session {
    pub(crate) fn new(key: SessionKey, record_count: usize) -> Self {
        Self { key, record_count }
    }

    /// The key credential fields are sealed under.
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Number of records in the store as of the last refresh.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub(crate) fn record_added(&mut self) {
        self.record_count += 1;
    }

    pub(crate) fn record_removed(&mut self) {
        self.record_count = self.record_count.saturating_sub(1);
    }

    pub(crate) fn set_record_count(&mut self, count: usize) {
        self.record_count = count;
    }
}
