//! `passvault delete` — remove a password by its listed number.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{Session, Vault};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, index: usize, force: bool) -> Result<()> {
    let (mut vault, mut session) = unlock(cli)?;
    delete(&mut vault, &mut session, index, force)
}

/// Confirm (unless `force`) and delete record `index`.
///
/// Shared with the interactive shell.
pub fn delete(vault: &mut Vault, session: &mut Session, index: usize, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete password #{index}?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.delete_by_index(session, index)?;
    output::success(&format!(
        "Deleted #{index} ({} remaining)",
        session.record_count()
    ));

    Ok(())
}
