//! `passvault generate` — create a random password for a service and store it.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::crypto::generate_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, service: &str) -> Result<()> {
    let (vault, mut session) = unlock(cli)?;

    let password = Zeroizing::new(generate_password());
    let index = vault.create(&mut session, service, &password)?;

    output::success(&format!("Stored '{}' as #{index}", service.trim()));
    println!("{}: {}", service.trim(), password.as_str());

    Ok(())
}
