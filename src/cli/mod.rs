//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{Session, Vault};

/// Environment variable read before prompting for the master password.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "passvault", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (default: from .passvault.toml, else passvault.db)
    #[arg(long, env = "PASSVAULT_DB", global = true)]
    pub db: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a password for a service
    Add {
        /// Service name (e.g. email)
        service: String,
        /// Password (omit for interactive prompt)
        secret: Option<String>,
    },

    /// Generate a random password for a service and store it
    Generate {
        /// Service name (e.g. bank)
        service: String,
    },

    /// List all stored passwords
    List,

    /// Delete a password by its number in `list`
    Delete {
        /// Record number as shown by `list`
        index: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Edit a stored password (not supported yet)
    Edit {
        /// Record number as shown by `list`
        index: usize,
    },

    /// Interactive menu
    Shell,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the database path: `--db`/`PASSVAULT_DB`, else settings.
pub fn database_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.db {
        Some(db) => cwd.join(db),
        None => settings.database_path(&cwd),
    })
}

/// Open the vault, bootstrap its schema and authenticate.
///
/// Prompts for a new master password (with confirmation) when none is
/// enrolled yet, otherwise for the existing one.
pub fn unlock(cli: &Cli) -> Result<(Vault, Session)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let path = database_path(cli, &settings)?;
    debug!(path = %path.display(), "using database");

    let vault = Vault::open(&path)?;
    vault.bootstrap()?;

    let enrolled = vault.is_enrolled()?;
    let password = if enrolled {
        prompt_password()?
    } else {
        output::info("No master password set — choose one to create the vault.");
        prompt_new_password()?
    };

    let session = vault.authenticate(&password, &settings.argon2_params())?;
    if !enrolled {
        output::success(&format!("Vault created at {}", path.display()));
    }
    Ok((vault, session))
}

/// Get the master password from `PASSVAULT_PASSWORD` or an interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (first run).
///
/// Also respects `PASSVAULT_PASSWORD` for scripted usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Choose master password")
        .with_confirmation(
            "Confirm master password",
            "Passwords do not match, try again",
        )
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}
