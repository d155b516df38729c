//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM seal/open with a detached tag (`secret_box`)
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - Self-wiping key buffers (`keys`)
//! - In-memory obfuscation of the working key (`obfuscator`)

pub mod kdf;
pub mod keys;
pub mod obfuscator;
pub mod secret_box;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, KeyObfuscator, ...};
pub use kdf::{derive_vault_key, Argon2Params};
pub use keys::SecretKey;
pub use obfuscator::{KeyObfuscator, VaultKeyMaterial};
pub use secret_box::{open, seal, Sealed};
