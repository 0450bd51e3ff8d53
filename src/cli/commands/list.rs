//! `passvault list` — display all stored passwords in a table.

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (vault, session) = unlock(cli)?;

    let listed = vault.list(&session)?;
    output::info(&format!("{} password(s)", listed.len()));
    output::print_credentials(&listed);

    Ok(())
}
