//! In-memory obfuscation of the vault's working key.
//!
//! A [`KeyObfuscator`] owns one random key generated when it is created.
//! The vault's working key is sealed under it the moment it is derived and
//! is only opened for the duration of a single lock or unlock.
//!
//! This is best-effort hygiene, not a security boundary: anyone able to read
//! process memory can also read the obfuscation key.  What it buys is that
//! the working key does not sit in one long-lived plaintext buffer.

use super::keys::SecretKey;
use super::secret_box::{self, Sealed};
use crate::errors::Result;

/// The obfuscated form of a key: ciphertext, tag and nonce from `secret_box`.
///
/// Only [`KeyObfuscator::deobfuscate`] can turn it back into key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultKeyMaterial {
    sealed: Sealed,
}

impl std::fmt::Debug for VaultKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKeyMaterial([REDACTED])")
    }
}

/// Process-lifetime obfuscation key.
///
/// Create one at startup and pass it by reference to every `Vault`.
/// It is never persisted and its `Debug` output is redacted.
pub struct KeyObfuscator {
    key: SecretKey,
}

impl KeyObfuscator {
    /// Generate a fresh random obfuscation key.
    pub fn new() -> Self {
        Self {
            key: SecretKey::random(),
        }
    }

    /// Seal `plaintext_key` under the obfuscation key.
    ///
    /// The caller still owns `plaintext_key` and should drop it right away.
    pub fn obfuscate(&self, plaintext_key: &SecretKey) -> Result<VaultKeyMaterial> {
        let sealed = secret_box::seal(self.key.as_bytes(), plaintext_key.as_bytes())?;
        Ok(VaultKeyMaterial { sealed })
    }

    /// Recover the plaintext key.  The returned key wipes itself on drop;
    /// keep it in the smallest scope possible.
    pub fn deobfuscate(&self, material: &VaultKeyMaterial) -> Result<SecretKey> {
        let plaintext = secret_box::open(self.key.as_bytes(), &material.sealed)?;
        SecretKey::from_slice(&plaintext)
    }
}

impl Default for KeyObfuscator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyObfuscator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyObfuscator")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
