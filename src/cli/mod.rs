//! CLI module — Clap argument parser, prompts, output helpers, and commands.

pub mod commands;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::KeyObfuscator;
use crate::errors::{Result, VaultError};
use crate::vault::Vault;

/// Shortest passphrase accepted for a vault.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Longest passphrase accepted for a vault.
pub const MAX_PASSPHRASE_LEN: usize = 32;

/// Longest password `generate` will produce.
pub const MAX_GENERATED_LEN: usize = 1024;

/// Environment variable checked for the passphrase before prompting.
pub const PASSPHRASE_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: single-file encrypted password vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Encrypted personal password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: vault_file from .passvault.toml, or vault.edb)
    #[arg(long, global = true)]
    pub vault: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a password for a service (add or replace)
    Store {
        /// Service name (case-insensitive)
        service: String,
        /// Password (omit for interactive prompt)
        password: Option<String>,
    },

    /// Generate a random password, store it, and print it
    Generate {
        /// Service name (case-insensitive)
        service: String,
        /// Password length
        #[arg(short, long)]
        length: Option<usize>,
        /// Complexity code: letters 0-3, digits 0-1, symbols 0-1 (e.g. 311)
        #[arg(short, long)]
        complexity: Option<String>,
    },

    /// Print the password stored for a service
    Get {
        /// Service name (case-insensitive)
        service: String,
        /// Copy to the clipboard instead of printing
        #[arg(long)]
        copy: bool,
    },

    /// Delete a service from the vault
    Delete {
        /// Service name (case-insensitive)
        service: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List stored service names
    List {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Interactive menu
    Shell,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.passvault.toml` from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the vault file path: `--vault` wins over the config file.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.vault {
        Some(path) => cwd.join(path),
        None => settings.vault_path(&cwd),
    })
}

/// Returns `true` if `passphrase` is 8–32 printable characters.
pub fn is_valid_passphrase(passphrase: &str) -> bool {
    let len = passphrase.chars().count();
    (MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&len) && is_printable(passphrase)
}

/// Returns `true` if `service` is a non-empty printable name.
pub fn is_valid_service(service: &str) -> bool {
    !service.trim().is_empty() && is_printable(service)
}

fn is_printable(s: &str) -> bool {
    s.chars().all(|c| !c.is_control())
}

/// Get the vault passphrase, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripting)
/// 2. Interactive hidden prompt (with confirmation when creating a vault)
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase(new_vault: bool) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        let pw = Zeroizing::new(pw);
        if !pw.is_empty() {
            if !is_valid_passphrase(&pw) {
                return Err(VaultError::CommandFailed(format!(
                    "{PASSPHRASE_ENV} must be {MIN_PASSPHRASE_LEN}-{MAX_PASSPHRASE_LEN} printable characters"
                )));
            }
            return Ok(pw);
        }
    }

    if new_vault {
        output::info("No existing vault found — choose a passphrase for a new one.");
        prompt::ask_secret(
            "Passphrase for new vault",
            Some("Confirm passphrase"),
            is_valid_passphrase,
            "It needs 8 to 32 printable characters.",
        )
    } else {
        prompt::ask_secret(
            "Vault passphrase",
            None,
            is_valid_passphrase,
            "It has 8 to 32 printable characters.",
        )
    }
}

/// Open the vault for a command.
///
/// For an existing file this runs one unlock/lock cycle up front, so a
/// wrong passphrase is reported before any other prompting happens.
pub fn open_vault<'o>(
    cli: &Cli,
    settings: &Settings,
    obfuscator: &'o KeyObfuscator,
) -> Result<Vault<'o>> {
    let path = vault_path(cli, settings)?;
    let exists = path.try_exists()?;

    let passphrase = prompt_passphrase(!exists)?;
    let mut vault = Vault::new(
        passphrase.as_bytes(),
        &path,
        &settings.argon2_params(),
        obfuscator,
    )?;
    drop(passphrase);

    if exists {
        vault.unlock()?;
        vault.lock()?;
    }

    Ok(vault)
}
