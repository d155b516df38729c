//! Vault module — the encrypted password store.
//!
//! This module provides:
//! - The password table and its binary encoding (`table`)
//! - The `nonce || tag || ciphertext` vault file layout (`format`)
//! - The lock/unlock state machine and operations (`store`)

pub mod format;
pub mod store;
pub mod table;

// Re-export the most commonly used items.
pub use store::Vault;
pub use table::{normalize, PasswordEntry, PasswordTable};
