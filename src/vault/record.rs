//! Credential types returned by the vault.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::errors::Result;

/// A decrypted service/secret pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// User-chosen label (e.g. "email").
    pub service: String,
    /// The stored password.
    pub secret: String,
}

impl Credential {
    pub fn new(service: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("service", &self.service)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// One row of a listing.
///
/// `index` is the dense 1-based position among the records present right
/// now; it changes when earlier records are deleted.  `record` is an
/// error when this row failed to decrypt, without affecting other rows.
#[derive(Debug)]
pub struct ListedCredential {
    pub index: usize,
    pub created_at: DateTime<Utc>,
    pub record: Result<Credential>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secret() {
        let c = Credential::new("email", "p@ss1");
        let shown = format!("{c:?}");
        assert!(shown.contains("email"));
        assert!(!shown.contains("p@ss1"));
    }
}
