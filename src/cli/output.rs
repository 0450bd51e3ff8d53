//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::ListedCredential;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Build the table of listed credentials (#, Service, Password, Created).
///
/// Rows that failed to decrypt show the error instead of their contents.
pub fn credentials_table(listed: &[ListedCredential]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Service", "Password", "Created"]);

    for entry in listed {
        let created = entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let row = match &entry.record {
            Ok(c) => vec![
                entry.index.to_string(),
                c.service.clone(),
                c.secret.clone(),
                created,
            ],
            Err(e) => vec![
                entry.index.to_string(),
                format!("<{e}>"),
                String::new(),
                created,
            ],
        };
        table.add_row(row);
    }

    table
}

/// Print all listed credentials, or a hint when there are none.
pub fn print_credentials(listed: &[ListedCredential]) {
    if listed.is_empty() {
        info("No passwords stored yet.");
        tip("Run `passvault generate <SERVICE>` to add your first password.");
        return;
    }

    println!("{}", credentials_table(listed));

    let failed = listed.iter().filter(|l| l.record.is_err()).count();
    if failed > 0 {
        warning(&format!("{failed} record(s) could not be decrypted."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VaultError;
    use crate::vault::Credential;
    use chrono::Utc;

    #[test]
    fn table_shows_records_and_failures() {
        let listed = vec![
            ListedCredential {
                index: 1,
                created_at: Utc::now(),
                record: Ok(Credential::new("email", "p@ss1")),
            },
            ListedCredential {
                index: 2,
                created_at: Utc::now(),
                record: Err(VaultError::DecryptionFailed),
            },
        ];

        let rendered = credentials_table(&listed).to_string();
        assert!(rendered.contains("email"));
        assert!(rendered.contains("p@ss1"));
        assert!(rendered.contains("Decryption"));
    }
}
