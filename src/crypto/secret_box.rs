//! Authenticated encryption with a detached tag.
//!
//! Each call to `seal` generates a fresh random 16-byte nonce and returns
//! the three parts separately so callers can lay them out however they
//! need (the vault file stores them as `nonce || tag || ciphertext`).
//!
//! Cipher: AES-256-GCM with a 128-bit nonce and a 128-bit tag.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

use super::keys::KEY_LEN;

/// AES-256-GCM instantiated with a 16-byte nonce.
type Cipher = AesGcm<Aes256, U16>;

/// Size of the nonce in bytes.
pub const NONCE_LEN: usize = 16;

/// Size of the authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of [`seal`]: ciphertext plus the tag and nonce needed to open it.
#[derive(Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
    pub nonce: [u8; NONCE_LEN],
}

impl std::fmt::Debug for Sealed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sealed")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

/// Encrypt `plaintext` under a 32-byte `key` with a fresh random nonce.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Sealed> {
    let cipher = Cipher::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Cipher::generate_nonce(&mut OsRng);

    // Encrypted in place; wiped on drop if encryption bails out midway.
    let mut buffer = Zeroizing::new(plaintext.to_vec());
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", buffer.as_mut_slice())
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);

    Ok(Sealed {
        ciphertext: std::mem::take(&mut *buffer),
        tag: tag_bytes,
        nonce: nonce_bytes,
    })
}

/// Decrypt and verify data produced by [`seal`].
///
/// Fails closed: on any tag mismatch the partially decrypted buffer is
/// wiped and `AuthenticationFailed` is returned.
pub fn open(key: &[u8; KEY_LEN], sealed: &Sealed) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Cipher::new_from_slice(key).map_err(|_| VaultError::AuthenticationFailed)?;

    let nonce = GenericArray::from_slice(&sealed.nonce);
    let tag = GenericArray::from_slice(&sealed.tag);

    let mut buffer = Zeroizing::new(sealed.ciphertext.clone());
    cipher
        .decrypt_in_place_detached(nonce, b"", buffer.as_mut_slice(), tag)
        .map_err(|_| VaultError::AuthenticationFailed)?;

    Ok(buffer)
}
