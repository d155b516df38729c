//! The vault: lock/unlock state machine over an encrypted password table.
//!
//! A `Vault` is created locked.  Every public operation runs a full
//! cycle: `unlock` (read + decrypt the file), act on the in-memory table,
//! `lock` (encrypt + atomically rewrite the file, then drop the table).
//! There is no long-lived unlocked session.
//!
//! There is no file locking: two processes working on the same vault file
//! race and the last writer wins.  Within one process a `&mut Vault` is
//! needed for every operation, so cycles never interleave.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::kdf::{derive_vault_key, Argon2Params};
use crate::crypto::obfuscator::{KeyObfuscator, VaultKeyMaterial};
use crate::crypto::secret_box;
use crate::errors::{Result, VaultError};
use crate::password::{self, Complexity};

use super::format;
use super::table::PasswordTable;

/// Lock state.  The table only exists while unlocked.
enum VaultState {
    Locked,
    Unlocked(PasswordTable),
}

/// The main vault handle.
///
/// Holds the working key only in obfuscated form; the plaintext key exists
/// for the duration of a single `lock` or `unlock` call.
pub struct Vault<'o> {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// The working key, sealed under the process obfuscation key.
    key_material: VaultKeyMaterial,

    /// Process obfuscation key used to open `key_material`.
    obfuscator: &'o KeyObfuscator,

    state: VaultState,
}

impl<'o> Vault<'o> {
    /// Create a locked vault handle for the file at `path`.
    ///
    /// Derives the working key from `passphrase` and obfuscates it right
    /// away.  Nothing is read or written yet; a wrong passphrase is only
    /// detected by the first `unlock`.
    pub fn new(
        passphrase: &[u8],
        path: &Path,
        argon2_params: &Argon2Params,
        obfuscator: &'o KeyObfuscator,
    ) -> Result<Self> {
        let key_material = {
            let working_key = derive_vault_key(passphrase, argon2_params)?;
            obfuscator.obfuscate(&working_key)?
        };

        Ok(Self {
            path: path.to_path_buf(),
            key_material,
            obfuscator,
            state: VaultState::Locked,
        })
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    /// Load and decrypt the vault file.
    ///
    /// No-op when already unlocked.  A missing file is a fresh, empty vault
    /// and involves no cryptography.  A path whose existence cannot be
    /// determined (permissions, symlink loop) is an I/O error, not a new
    /// vault.  A file that fails authentication yields `InvalidKey` and the
    /// vault stays locked.
    pub fn unlock(&mut self) -> Result<()> {
        if self.is_unlocked() {
            return Ok(());
        }

        if !self.path.try_exists()? {
            debug!(path = %self.path.display(), "no vault file, starting empty");
            self.state = VaultState::Unlocked(PasswordTable::new());
            return Ok(());
        }

        let sealed = format::read_vault(&self.path)?;

        let plaintext = {
            let working_key = self.obfuscator.deobfuscate(&self.key_material)?;
            secret_box::open(working_key.as_bytes(), &sealed).map_err(|e| match e {
                VaultError::AuthenticationFailed => VaultError::InvalidKey,
                other => other,
            })?
        };

        let table = PasswordTable::decode(&plaintext)?;
        debug!(entries = table.len(), "vault unlocked");
        self.state = VaultState::Unlocked(table);
        Ok(())
    }

    /// Encrypt the table and atomically rewrite the vault file.
    ///
    /// No-op when already locked.  The table is only dropped once the file
    /// has been written; if the write fails the vault stays unlocked and the
    /// previous file is untouched.
    pub fn lock(&mut self) -> Result<()> {
        let VaultState::Unlocked(table) = &self.state else {
            return Ok(());
        };

        let sealed = {
            let plaintext = table.encode()?;
            let working_key = self.obfuscator.deobfuscate(&self.key_material)?;
            secret_box::seal(working_key.as_bytes(), &plaintext)?
        };

        format::write_vault(&self.path, &sealed)?;
        debug!(
            bytes = format::PREFIX_LEN + sealed.ciphertext.len(),
            "vault locked"
        );

        self.state = VaultState::Locked;
        Ok(())
    }

    /// Run `f` against the unlocked table, then lock again.
    ///
    /// The vault is re-locked even when `f` fails.  If both `f` and the
    /// lock fail, the lock error is returned.
    fn with_table<T>(&mut self, f: impl FnOnce(&mut PasswordTable) -> Result<T>) -> Result<T> {
        self.unlock()?;
        let result = match &mut self.state {
            VaultState::Unlocked(table) => f(table),
            VaultState::Locked => Err(VaultError::Locked),
        };
        self.lock()?;
        result
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Add or replace the password for `service`.
    pub fn store(&mut self, service: &str, password: &str) -> Result<()> {
        self.with_table(|table| {
            table.upsert(service, password);
            Ok(())
        })?;
        info!("password stored");
        Ok(())
    }

    /// Return the password stored for `service`.
    pub fn retrieve(&mut self, service: &str) -> Result<Zeroizing<String>> {
        self.with_table(|table| {
            table
                .get(service)
                .map(|p| Zeroizing::new(p.to_string()))
                .ok_or_else(|| VaultError::NotFound(service.to_string()))
        })
    }

    /// Remove `service`.  Deleting a missing service succeeds.
    ///
    /// Returns whether an entry was actually removed.
    pub fn delete(&mut self, service: &str) -> Result<bool> {
        let removed = self.with_table(|table| Ok(table.remove(service)))?;
        info!(removed, "delete finished");
        Ok(removed)
    }

    /// Sorted snapshot of stored (normalized) service names.
    pub fn list_services(&mut self) -> Result<Vec<String>> {
        self.with_table(|table| Ok(table.services()))
    }

    /// Generate a password per `complexity`, store it, and return it.
    pub fn generate_and_store(
        &mut self,
        service: &str,
        length: usize,
        complexity: &Complexity,
    ) -> Result<Zeroizing<String>> {
        let password = password::generate(length, complexity)?;
        self.store(service, &password)?;
        Ok(password)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` while the table is loaded in memory.
    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, VaultState::Unlocked(_))
    }

    /// Returns `true` if a vault file exists at the configured path.
    ///
    /// Fails if the path cannot be checked.
    pub fn exists(&self) -> Result<bool> {
        Ok(self.path.try_exists()?)
    }
}

impl std::fmt::Debug for Vault<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("path", &self.path)
            .field("unlocked", &self.is_unlocked())
            .field("key_material", &"[REDACTED]")
            .finish()
    }
}
