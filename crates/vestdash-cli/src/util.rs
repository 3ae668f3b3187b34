//! Utility functions for CLI operations.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use dialoguer::{Input, Password, theme::ColorfulTheme};
use vestdash_core::{CredentialTable, Session};

use crate::cli::CredentialArgs;

/// Username and password for a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Fill in missing credentials by prompting when attached to a terminal.
/// In non-interactive contexts (scripts, piped input) it fails with a hint.
pub fn resolve_credentials(args: &CredentialArgs) -> Result<Credentials> {
    if let (Some(username), Some(password)) = (&args.user, &args.password) {
        return Ok(Credentials {
            username: username.clone(),
            password: password.clone(),
        });
    }

    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        bail!(
            "No credentials given. Use --user and --password or set VESTDASH_USER and \
             VESTDASH_PASSWORD."
        );
    }

    let theme = ColorfulTheme::default();
    let username = match &args.user {
        Some(user) => user.clone(),
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    Ok(Credentials { username, password })
}

/// Log `session` in, failing when no logins are configured or the credentials
/// are rejected. The rejection itself is reported through the session.
pub fn login(session: &mut Session, table: &CredentialTable, credentials: &Credentials) -> Result<()> {
    if table.is_empty() {
        bail!(
            "No logins configured. Run 'vestdash config init' and edit the [[users]] entries."
        );
    }
    if !session.login(table, &credentials.username, &credentials.password) {
        bail!("Login failed for '{}'", credentials.username);
    }
    Ok(())
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Current terminal width, or 80 when not attached to one.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}
