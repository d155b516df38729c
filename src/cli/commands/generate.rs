//! `passvault generate` — create a random password, store it, print it.

use crate::cli::{open_vault, output, Cli, MAX_GENERATED_LEN};
use crate::config::Settings;
use crate::crypto::KeyObfuscator;
use crate::errors::{Result, VaultError};
use crate::password::Complexity;

/// Execute the `generate` command.
pub fn execute(
    cli: &Cli,
    settings: &Settings,
    obfuscator: &KeyObfuscator,
    service: &str,
    length: Option<usize>,
    complexity: Option<&str>,
) -> Result<()> {
    if !crate::cli::is_valid_service(service) {
        return Err(VaultError::CommandFailed(
            "service name must be non-empty printable text".into(),
        ));
    }

    let length = length.unwrap_or(settings.default_length);
    if !(1..=MAX_GENERATED_LEN).contains(&length) {
        return Err(VaultError::CommandFailed(format!(
            "length must be between 1 and {MAX_GENERATED_LEN}"
        )));
    }

    let complexity: Complexity = match complexity {
        Some(code) => code.parse()?,
        None => settings.complexity()?,
    };

    // Reject an empty charset before asking for the passphrase.
    if complexity.charset().is_empty() {
        return Err(VaultError::EmptyCharset);
    }

    let mut vault = open_vault(cli, settings, obfuscator)?;
    let password = vault.generate_and_store(service, length, &complexity)?;

    println!("{}", password.as_str());
    output::success(&format!("Also stored in the vault as '{service}'."));

    Ok(())
}
