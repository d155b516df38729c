//! `passvault get` — print (or copy) the password for one service.

use crate::cli::{open_vault, output, Cli};
use crate::config::Settings;
use crate::crypto::KeyObfuscator;
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(
    cli: &Cli,
    settings: &Settings,
    obfuscator: &KeyObfuscator,
    service: &str,
    copy: bool,
) -> Result<()> {
    let mut vault = open_vault(cli, settings, obfuscator)?;
    let password = vault.retrieve(service)?;

    if copy {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| VaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
        clipboard
            .set_text(password.as_str())
            .map_err(|e| VaultError::CommandFailed(format!("clipboard write failed: {e}")))?;
        output::success(&format!("Copied password for '{service}' to the clipboard."));
    } else {
        println!("{}", password.as_str());
    }

    Ok(())
}
