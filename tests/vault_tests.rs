//! Integration tests for the PassVault vault state machine.

use std::fs;

use passvault::crypto::kdf::{derive_vault_key, Argon2Params};
use passvault::crypto::secret_box;
use passvault::crypto::KeyObfuscator;
use passvault::errors::VaultError;
use passvault::password::{Complexity, LetterMode};
use passvault::vault::format::{self, PREFIX_LEN};
use passvault::vault::{PasswordTable, Vault};
use tempfile::TempDir;

/// Cheap Argon2 parameters so the suite stays fast.
const FAST: Argon2Params = Argon2Params {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
};

const PASSPHRASE: &[u8] = b"correct-horse-battery";

/// Helper: create a vault file path inside a fresh temp dir.
fn vault_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("vault.edb");
    (dir, path)
}

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn stored_table_survives_a_new_process() {
    let (_dir, path) = vault_path();

    {
        let obfuscator = KeyObfuscator::new();
        let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
        vault.store("github", "gh-pass").unwrap();
        vault.store("email", "mail pass with spaces").unwrap();
        vault.store("bank", "b@nk!").unwrap();
    }

    // Fresh obfuscation key, same passphrase: the file still opens.
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    assert_eq!(vault.list_services().unwrap(), vec!["bank", "email", "github"]);
    assert_eq!(vault.retrieve("github").unwrap().as_str(), "gh-pass");
    assert_eq!(vault.retrieve("email").unwrap().as_str(), "mail pass with spaces");
    assert_eq!(vault.retrieve("bank").unwrap().as_str(), "b@nk!");
}

#[test]
fn store_replaces_existing_password() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    vault.store("github", "old").unwrap();
    vault.store("github", "new").unwrap();

    assert_eq!(vault.retrieve("github").unwrap().as_str(), "new");
    assert_eq!(vault.list_services().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Wrong key
// ---------------------------------------------------------------------------

#[test]
fn wrong_passphrase_is_invalid_key() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();

    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("github", "gh-pass").unwrap();

    let mut intruder = Vault::new(b"not-the-passphrase", &path, &FAST, &obfuscator).unwrap();
    assert!(matches!(intruder.unlock(), Err(VaultError::InvalidKey)));
    assert!(!intruder.is_unlocked());

    // Every operation fails the same way and never returns plaintext.
    assert!(matches!(intruder.retrieve("github"), Err(VaultError::InvalidKey)));
    assert!(matches!(intruder.list_services(), Err(VaultError::InvalidKey)));
    assert!(matches!(intruder.store("x", "y"), Err(VaultError::InvalidKey)));

    // The file was not touched by the failed attempts.
    assert_eq!(vault.retrieve("github").unwrap().as_str(), "gh-pass");
    assert!(matches!(vault.retrieve("x"), Err(VaultError::NotFound(_))));
}

#[test]
fn different_kdf_params_do_not_open() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();

    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("a", "1").unwrap();

    let slower = Argon2Params {
        iterations: 2,
        ..FAST
    };
    let mut other = Vault::new(PASSPHRASE, &path, &slower, &obfuscator).unwrap();
    assert!(matches!(other.unlock(), Err(VaultError::InvalidKey)));
}

#[test]
fn tampered_file_is_rejected() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();

    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("github", "gh-pass").unwrap();

    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(vault.unlock(), Err(VaultError::InvalidKey)));
    assert!(!vault.is_unlocked());
}

#[test]
fn short_file_is_invalid_format() {
    let (_dir, path) = vault_path();
    fs::write(&path, [0u8; PREFIX_LEN - 1]).unwrap();

    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    assert!(matches!(vault.unlock(), Err(VaultError::InvalidVaultFormat(_))));
    assert!(!vault.is_unlocked());
}

// ---------------------------------------------------------------------------
// Lock/unlock idempotence
// ---------------------------------------------------------------------------

#[test]
fn lock_when_locked_is_a_noop() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    assert!(!vault.is_unlocked());
    vault.lock().unwrap();
    vault.lock().unwrap();

    assert!(!vault.is_unlocked());
    assert!(!path.exists(), "locking a locked vault must not write");
}

#[test]
fn unlock_when_unlocked_is_a_noop() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("github", "gh-pass").unwrap();

    vault.unlock().unwrap();
    assert!(vault.is_unlocked());

    // Replace the file behind the vault's back; a second unlock must not
    // re-read it.
    fs::write(&path, b"garbage").unwrap();
    vault.unlock().unwrap();
    assert!(vault.is_unlocked());

    // Locking writes the in-memory table back over the garbage.
    vault.lock().unwrap();
    assert_eq!(vault.retrieve("github").unwrap().as_str(), "gh-pass");
}

#[test]
fn operations_leave_the_vault_locked() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    vault.store("github", "gh-pass").unwrap();
    assert!(!vault.is_unlocked());

    vault.retrieve("github").unwrap();
    assert!(!vault.is_unlocked());

    assert!(vault.retrieve("missing").is_err());
    assert!(!vault.is_unlocked(), "a failed lookup still re-locks");

    vault.list_services().unwrap();
    assert!(!vault.is_unlocked());

    vault.delete("github").unwrap();
    assert!(!vault.is_unlocked());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_missing_service_is_a_noop() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("github", "gh-pass").unwrap();

    assert!(!vault.delete("gitlab").unwrap());
    assert_eq!(vault.list_services().unwrap(), vec!["github"]);
    assert_eq!(vault.retrieve("github").unwrap().as_str(), "gh-pass");
}

#[test]
fn delete_removes_entry() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("github", "gh-pass").unwrap();

    assert!(vault.delete("GitHub").unwrap());
    assert!(vault.list_services().unwrap().is_empty());
    assert!(matches!(vault.retrieve("github"), Err(VaultError::NotFound(_))));
}

// ---------------------------------------------------------------------------
// New vault bootstrap
// ---------------------------------------------------------------------------

#[test]
fn new_vault_lists_nothing_and_writes_documented_layout() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    assert!(!vault.exists().unwrap());
    assert!(vault.list_services().unwrap().is_empty());
    assert!(vault.exists().unwrap(), "the lock at the end of list creates the file");

    // nonce(16) || tag(16) || sealed empty table
    let bytes = fs::read(&path).unwrap();
    let empty_table = PasswordTable::new().encode().unwrap();
    assert_eq!(bytes.len(), PREFIX_LEN + empty_table.len());

    let sealed = format::from_bytes(&bytes).unwrap();
    let key = derive_vault_key(PASSPHRASE, &FAST).unwrap();
    let plaintext = secret_box::open(key.as_bytes(), &sealed).unwrap();
    assert_eq!(plaintext.as_slice(), empty_table.as_slice());
}

#[test]
fn missing_parent_directory_keeps_vault_unlocked() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("vault.edb");
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    // Unlocking a missing file is fine; the write on lock is not.
    assert!(matches!(vault.store("github", "x"), Err(VaultError::Io(_))));
    assert!(vault.is_unlocked(), "a failed write must not claim a lock");

    // Once the directory exists the pending table can be written.
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    vault.lock().unwrap();
    assert!(!vault.is_unlocked());
    assert_eq!(vault.retrieve("github").unwrap().as_str(), "x");
}

#[test]
fn failed_write_leaves_previous_file_intact() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("github", "gh-pass").unwrap();
    let before = fs::read(&path).unwrap();

    // Block the temp file path so the atomic write cannot start.
    let tmp = format::temp_path(&path);
    fs::create_dir(&tmp).unwrap();

    assert!(vault.store("gitlab", "gl-pass").is_err());
    assert_eq!(fs::read(&path).unwrap(), before);

    fs::remove_dir(&tmp).unwrap();
    vault.lock().unwrap();
    assert_eq!(vault.list_services().unwrap(), vec!["github", "gitlab"]);
}

#[cfg(unix)]
#[test]
fn unreadable_vault_path_is_an_error_not_a_new_vault() {
    let (dir, path) = vault_path();
    let other = dir.path().join("other");
    std::os::unix::fs::symlink(&other, &path).unwrap();
    std::os::unix::fs::symlink(&path, &other).unwrap();

    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    assert!(matches!(vault.unlock(), Err(VaultError::Io(_))));
    assert!(!vault.is_unlocked());
    assert!(vault.exists().is_err());
    assert!(matches!(vault.store("x", "y"), Err(VaultError::Io(_))));

    // The loop is still in place; nothing was written over it.
    assert!(fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
    assert!(!format::temp_path(&path).exists());
}

#[cfg(unix)]
#[test]
fn symlinked_vault_keeps_its_link() {
    let (dir, path) = vault_path();
    let synced = dir.path().join("synced");
    fs::create_dir(&synced).unwrap();
    let target = synced.join("vault.edb");
    std::os::unix::fs::symlink(&target, &path).unwrap();

    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();
    vault.store("github", "gh-pass").unwrap();
    vault.store("gitlab", "gl-pass").unwrap();

    assert!(fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
    assert!(target.exists());

    let mut through_target = Vault::new(PASSPHRASE, &target, &FAST, &obfuscator).unwrap();
    assert_eq!(through_target.list_services().unwrap(), vec!["github", "gitlab"]);
}

// ---------------------------------------------------------------------------
// Case normalization and generation
// ---------------------------------------------------------------------------

#[test]
fn service_names_are_case_insensitive() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    vault.store("GitHub", "gh-pass").unwrap();
    assert_eq!(vault.retrieve("github").unwrap().as_str(), "gh-pass");
    assert_eq!(vault.retrieve("GITHUB").unwrap().as_str(), "gh-pass");
    assert_eq!(vault.list_services().unwrap(), vec!["github"]);
}

#[test]
fn generate_and_store_persists_the_password() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    let generated = vault
        .generate_and_store("Email", 24, &Complexity::default())
        .unwrap();
    assert_eq!(generated.chars().count(), 24);
    assert_eq!(vault.retrieve("email").unwrap(), generated);
}

#[test]
fn generate_with_empty_charset_stores_nothing() {
    let (_dir, path) = vault_path();
    let obfuscator = KeyObfuscator::new();
    let mut vault = Vault::new(PASSPHRASE, &path, &FAST, &obfuscator).unwrap();

    let none = Complexity {
        letters: LetterMode::None,
        digits: false,
        symbols: false,
    };
    assert!(matches!(
        vault.generate_and_store("email", 10, &none),
        Err(VaultError::EmptyCharset)
    ));
    assert!(!path.exists());
}
