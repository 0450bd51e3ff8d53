use thiserror::Error;

/// Broad classes of failure, used by callers to decide whether an error
/// ends the session or is reported and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input. Nothing was changed.
    Validation,
    /// Wrong master password, or a record that failed tag verification.
    Authentication,
    /// Database or filesystem failure. The operation was not applied.
    Storage,
    /// Everything else (prompts, configuration, unsupported operations).
    Other,
}

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Validation errors ---
    #[error("Service name cannot be empty")]
    EmptyService,

    #[error("Secret cannot be empty")]
    EmptySecret,

    #[error("Master password cannot be empty")]
    EmptyMasterPassword,

    #[error("No record #{index} — valid range is 1..={count}")]
    IndexOutOfRange { index: usize, count: usize },

    // --- Authentication errors ---
    #[error("Authentication failed — wrong master password")]
    AuthenticationFailed,

    #[error("Decryption failed — wrong key or corrupted record")]
    DecryptionFailed,

    #[error("Unsupported record format version {0}")]
    UnsupportedFormat(u8),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Storage errors ---
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("{0} is not supported")]
    NotSupported(String),
}

impl VaultError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyService
            | Self::EmptySecret
            | Self::EmptyMasterPassword
            | Self::IndexOutOfRange { .. } => ErrorKind::Validation,

            Self::AuthenticationFailed | Self::DecryptionFailed | Self::UnsupportedFormat(_) => {
                ErrorKind::Authentication
            }

            Self::Database(_) | Self::SchemaError(_) | Self::Io(_) => ErrorKind::Storage,

            Self::EncryptionFailed(_)
            | Self::KeyDerivationFailed(_)
            | Self::ConfigError(_)
            | Self::CommandFailed(_)
            | Self::UserCancelled
            | Self::NotSupported(_) => ErrorKind::Other,
        }
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert_eq!(VaultError::EmptyService.kind(), ErrorKind::Validation);
        assert_eq!(
            VaultError::IndexOutOfRange { index: 4, count: 3 }.kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn record_and_gate_failures_are_authentication() {
        assert_eq!(
            VaultError::AuthenticationFailed.kind(),
            ErrorKind::Authentication
        );
        assert_eq!(VaultError::DecryptionFailed.kind(), ErrorKind::Authentication);
        assert_eq!(
            VaultError::UnsupportedFormat(9).kind(),
            ErrorKind::Authentication
        );
    }

    #[test]
    fn sqlite_errors_are_storage() {
        let err: VaultError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn index_error_message_names_the_range() {
        let msg = VaultError::IndexOutOfRange { index: 7, count: 2 }.to_string();
        assert!(msg.contains("#7"));
        assert!(msg.contains("1..=2"));
    }
}
