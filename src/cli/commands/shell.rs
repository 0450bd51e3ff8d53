//! `passvault shell` — interactive menu over one unlocked session.
//!
//! Vault errors are reported and the menu is shown again.  Only a failing
//! prompt (e.g. stdin closed) ends the loop.

use dialoguer::{Input, Password, Select};
use zeroize::Zeroizing;

use crate::cli::commands::delete;
use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::crypto::generate_password;
use crate::errors::{Result, VaultError};
use crate::vault::{Session, Vault};

/// One entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Generate,
    Add,
    View,
    Delete,
    Edit,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Generate,
        MenuItem::Add,
        MenuItem::View,
        MenuItem::Delete,
        MenuItem::Edit,
        MenuItem::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Generate => "Generate new password",
            MenuItem::Add => "Add existing password",
            MenuItem::View => "View passwords",
            MenuItem::Delete => "Delete password",
            MenuItem::Edit => "Edit password",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (mut vault, mut session) = unlock(cli)?;
    let labels: Vec<&str> = MenuItem::ALL.iter().map(|m| m.label()).collect();

    loop {
        let choice = Select::new()
            .with_prompt("Password Manager")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("menu prompt: {e}")))?;

        let item = MenuItem::ALL[choice];
        if item == MenuItem::Exit {
            output::info("Exiting...");
            return Ok(());
        }

        match run_item(item, &mut vault, &mut session) {
            Ok(()) => {}
            Err(e @ VaultError::CommandFailed(_)) => return Err(e),
            Err(e) => output::error(&e.to_string()),
        }
    }
}

fn run_item(item: MenuItem, vault: &mut Vault, session: &mut Session) -> Result<()> {
    match item {
        MenuItem::Generate => {
            let service = ask_service()?;
            let password = Zeroizing::new(generate_password());
            let index = vault.create(session, &service, &password)?;
            output::success(&format!("Stored '{}' as #{index}", service.trim()));
            println!("{}: {}", service.trim(), password.as_str());
        }
        MenuItem::Add => {
            let service = ask_service()?;
            let secret = Password::new()
                .with_prompt(format!("Enter password for {}", service.trim()))
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
            let secret = Zeroizing::new(secret);
            let index = vault.create(session, &service, &secret)?;
            output::success(&format!("Stored '{}' as #{index}", service.trim()));
        }
        MenuItem::View => {
            let listed = vault.list(session)?;
            output::print_credentials(&listed);
        }
        MenuItem::Delete => {
            let index = ask_index(session)?;
            delete::delete(vault, session, index, false)?;
        }
        MenuItem::Edit => {
            let index = ask_index(session)?;
            vault.update_by_index(session, index)?;
        }
        MenuItem::Exit => {}
    }
    Ok(())
}

fn ask_service() -> Result<String> {
    Input::<String>::new()
        .with_prompt("Enter service")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}

fn ask_index(session: &Session) -> Result<usize> {
    Input::<usize>::new()
        .with_prompt(format!("Record number (1-{})", session.record_count()))
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_is_last_menu_item() {
        assert_eq!(MenuItem::ALL.last(), Some(&MenuItem::Exit));
    }

    #[test]
    fn menu_labels_are_unique() {
        let mut labels: Vec<_> = MenuItem::ALL.iter().map(|m| m.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), MenuItem::ALL.len());
    }
}
