//! `passvault store` — add or replace a password in the vault.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::{open_vault, output, prompt, Cli};
use crate::config::Settings;
use crate::crypto::KeyObfuscator;
use crate::errors::{Result, VaultError};

/// Execute the `store` command.
pub fn execute(
    cli: &Cli,
    settings: &Settings,
    obfuscator: &KeyObfuscator,
    service: &str,
    password: Option<&str>,
) -> Result<()> {
    if !crate::cli::is_valid_service(service) {
        return Err(VaultError::CommandFailed(
            "service name must be non-empty printable text".into(),
        ));
    }

    let mut vault = open_vault(cli, settings, obfuscator)?;

    // Determine the password from one of three sources.
    let password = if let Some(p) = password {
        // Source 1: Inline value on the command line.
        output::warning("Password provided on command line — it may appear in shell history.");
        Zeroizing::new(p.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(strip_line_ending(&buf).to_string())
    } else {
        // Source 3: Interactive hidden prompt (default).
        prompt::ask_secret(
            &format!("Password for {service}"),
            None,
            |p| !p.is_empty(),
            "The password cannot be empty.",
        )?
    };

    if password.is_empty() {
        return Err(VaultError::CommandFailed("password cannot be empty".into()));
    }

    vault.store(service, &password)?;
    output::success(&format!("Saved password for '{service}'."));

    Ok(())
}

/// Drop the single `\n` or `\r\n` that ends a piped line.
///
/// Anything else, trailing spaces included, is part of the password.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_one_line_ending() {
        assert_eq!(strip_line_ending("secret\n"), "secret");
        assert_eq!(strip_line_ending("secret\r\n"), "secret");
        assert_eq!(strip_line_ending("secret"), "secret");
        assert_eq!(strip_line_ending("secret\n\n"), "secret\n");
    }

    #[test]
    fn keeps_trailing_whitespace() {
        assert_eq!(strip_line_ending("pass word  \n"), "pass word  ");
        assert_eq!(strip_line_ending("tab\t"), "tab\t");
    }
}
