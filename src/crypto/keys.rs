//! Key buffers that wipe themselves.
//!
//! Every 32-byte key the vault handles (the working key derived from the
//! passphrase, the process obfuscation key) lives in a [`SecretKey`], which
//! overwrites its bytes when dropped.  This holds on every exit path,
//! including early returns through `?`.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// Length of every key handled by the vault (256 bits).
pub const KEY_LEN: usize = 32;

/// A 32-byte key that is zeroed when dropped.
///
/// `Debug` never prints the bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; KEY_LEN],
}

impl SecretKey {
    /// Take ownership of raw key bytes.  The caller should wipe its own copy.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Copy a key out of a slice, failing if it is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LEN {
            return Err(VaultError::InvalidVaultFormat(format!(
                "key material has {} bytes, expected {KEY_LEN}",
                bytes.len()
            )));
        }
        let mut key = Self { bytes: [0u8; KEY_LEN] };
        key.bytes.copy_from_slice(bytes);
        Ok(key)
    }

    /// Generate a key from the operating system CSPRNG.
    pub fn random() -> Self {
        let mut key = Self { bytes: [0u8; KEY_LEN] };
        OsRng.fill_bytes(&mut key.bytes);
        key
    }

    /// Access the raw key bytes (e.g. to pass to `secret_box`).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}
