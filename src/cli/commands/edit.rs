//! `passvault edit` — editing a stored password is not supported yet.

use crate::cli::{unlock, Cli};
use crate::errors::Result;

/// Execute the `edit` command.
pub fn execute(cli: &Cli, index: usize) -> Result<()> {
    let (mut vault, mut session) = unlock(cli)?;
    vault.update_by_index(&mut session, index)
}
