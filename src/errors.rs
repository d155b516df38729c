use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — ciphertext was tampered with or the key is wrong")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Invalid vault key — the passphrase does not open this vault")]
    InvalidKey,

    #[error("Vault is locked")]
    Locked,

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Service '{0}' is not stored in the vault")]
    NotFound(String),

    // --- Password generation errors ---
    #[error("Cannot generate a password with no character classes enabled")]
    EmptyCharset,

    #[error("Invalid complexity '{0}' — expected three digits: letters 0-3, digits 0-1, symbols 0-1")]
    InvalidComplexity(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
