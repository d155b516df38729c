//! `passvault shell` — interactive menu over a single vault.
//!
//! The passphrase is asked once; every menu action is still a full
//! unlock → act → lock cycle, so quitting at any prompt leaves a
//! consistent file behind.

use crate::cli::prompt::{ask, ask_number};
use crate::cli::{is_valid_service, open_vault, output, Cli, MAX_GENERATED_LEN};
use crate::config::Settings;
use crate::crypto::KeyObfuscator;
use crate::errors::{Result, VaultError};
use crate::password::Complexity;
use crate::vault::Vault;

/// Menu entries, in the order they are numbered.
const MENU: &[&str] = &[
    "0: Exit and lock the vault.",
    "1: Store a new password.",
    "2: Generate a new password.",
    "3: Retrieve a password.",
    "4: Delete a password.",
    "5: Show the list of saved services.",
];

/// Execute the `shell` command.
pub fn execute(cli: &Cli, settings: &Settings, obfuscator: &KeyObfuscator) -> Result<()> {
    let mut vault = open_vault(cli, settings, obfuscator)?;
    output::success(&format!("Logged into {}", vault.path().display()));

    loop {
        println!("\nPlease choose what you want to do.");
        for line in MENU {
            println!("{line}");
        }

        match ask_number(">", 0..=5)? {
            0 => {
                vault.lock()?;
                output::success("Vault locked.");
                return Ok(());
            }
            1 => store(&mut vault)?,
            2 => generate(&mut vault)?,
            3 => retrieve(&mut vault)?,
            4 => delete(&mut vault)?,
            _ => list(&mut vault)?,
        }
    }
}

fn ask_service() -> Result<String> {
    ask(
        "Service name",
        is_valid_service,
        "Enter a non-empty name without control characters.",
    )
}

fn store(vault: &mut Vault<'_>) -> Result<()> {
    let service = ask_service()?;
    let password = crate::cli::prompt::ask_secret(
        "Password",
        None,
        |p| !p.is_empty(),
        "The password cannot be empty.",
    )?;

    vault.store(&service, &password)?;
    output::success("Saved!");
    Ok(())
}

fn generate(vault: &mut Vault<'_>) -> Result<()> {
    let service = ask_service()?;
    let length = ask_number("Length of the password", 1..=MAX_GENERATED_LEN)?;

    println!("\nLetter complexity: 0 = none, 1 = lowercase, 2 = uppercase, 3 = mixed case.");
    let letters = ask_number(">", 0..=3)?;
    println!("Digits: 0 = no, 1 = yes.");
    let digits = ask_number(">", 0..=1)?;
    println!("Symbols: 0 = no, 1 = yes.");
    let symbols = ask_number(">", 0..=1)?;

    let complexity: Complexity = format!("{letters}{digits}{symbols}").parse()?;

    match vault.generate_and_store(&service, length, &complexity) {
        Ok(password) => {
            println!("Your generated password: {}", password.as_str());
            output::info("Also stored in the vault.");
        }
        Err(VaultError::EmptyCharset) => {
            output::warning("Pick at least one of letters, digits or symbols.");
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

fn retrieve(vault: &mut Vault<'_>) -> Result<()> {
    let service = ask_service()?;

    match vault.retrieve(&service) {
        Ok(password) => println!("Your password for {service}: {}", password.as_str()),
        Err(VaultError::NotFound(_)) => output::info("That service is not stored in the vault."),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn delete(vault: &mut Vault<'_>) -> Result<()> {
    let service = ask_service()?;

    if vault.delete(&service)? {
        output::success(&format!("Deleted {service}."));
    } else {
        output::info("That service is not stored in the vault.");
    }
    Ok(())
}

fn list(vault: &mut Vault<'_>) -> Result<()> {
    let services = vault.list_services()?;
    println!("Your services ({}):", services.len());
    output::print_services_table(&services);
    Ok(())
}
