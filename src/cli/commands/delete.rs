//! `passvault delete` — remove a service from the vault.

use dialoguer::Confirm;

use crate::cli::{open_vault, output, Cli};
use crate::config::Settings;
use crate::crypto::KeyObfuscator;
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(
    cli: &Cli,
    settings: &Settings,
    obfuscator: &KeyObfuscator,
    service: &str,
    force: bool,
) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete password for '{service}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut vault = open_vault(cli, settings, obfuscator)?;

    if vault.delete(service)? {
        output::success(&format!("Deleted '{service}'."));
    } else {
        output::info(&format!("'{service}' was not in the vault — nothing to delete."));
    }

    Ok(())
}
