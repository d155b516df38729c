//! Passphrase-based key derivation using Argon2id.
//!
//! The vault file has no header, so there is nowhere to keep a per-vault
//! salt.  Derivation uses a fixed application salt instead; Argon2id's
//! memory hardness is what slows down guessing.  Parameters are
//! configurable via `Argon2Params` (loaded from `.passvault.toml` or
//! defaults) and must match the ones the vault was written with.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroize;

use super::keys::{SecretKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Fixed salt mixed into every derivation.
const APP_SALT: &[u8] = b"passvault/vault.edb/argon2id";

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Derive the 32-byte working key from a passphrase.
///
/// The same passphrase + params always produce the same key.
/// Enforces minimum Argon2 parameters to prevent dangerously weak settings.
pub fn derive_vault_key(passphrase: &[u8], argon2_params: &Argon2Params) -> Result<SecretKey> {
    if argon2_params.memory_kib < MIN_MEMORY_KIB {
        return Err(VaultError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            argon2_params.memory_kib
        )));
    }
    if argon2_params.iterations < 1 {
        return Err(VaultError::KeyDerivationFailed(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if argon2_params.parallelism < 1 {
        return Err(VaultError::KeyDerivationFailed(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut raw = [0u8; KEY_LEN];
    let hashed = argon2.hash_password_into(passphrase, APP_SALT, &mut raw);
    let key = SecretKey::new(raw);
    raw.zeroize();
    hashed.map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}
