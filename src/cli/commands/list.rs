//! `passvault list` — show the stored service names.

use crate::cli::{open_vault, output, Cli};
use crate::config::Settings;
use crate::crypto::KeyObfuscator;
use crate::errors::{Result, VaultError};

/// Execute the `list` command.
pub fn execute(cli: &Cli, settings: &Settings, obfuscator: &KeyObfuscator, json: bool) -> Result<()> {
    let mut vault = open_vault(cli, settings, obfuscator)?;
    let services = vault.list_services()?;

    if json {
        let rendered = serde_json::to_string_pretty(&services)
            .map_err(|e| VaultError::CommandFailed(format!("JSON output: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    output::info(&format!("{} service(s) in {}", services.len(), vault.path().display()));
    output::print_services_table(&services);

    Ok(())
}
