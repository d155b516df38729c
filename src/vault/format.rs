//! On-disk layout of a vault file.
//!
//! ```text
//! [nonce: 16 bytes][tag: 16 bytes][ciphertext: rest of file]
//! ```
//!
//! There is no magic, no version byte and no integrity check besides the
//! AEAD tag.  The ciphertext is the sealed password table (see `table`).

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::crypto::secret_box::{Sealed, NONCE_LEN, TAG_LEN};
use crate::errors::{Result, VaultError};

/// Size of the fixed `nonce || tag` prefix.
pub const PREFIX_LEN: usize = NONCE_LEN + TAG_LEN;

/// Lay out a sealed table as file bytes.
pub fn to_bytes(sealed: &Sealed) -> Vec<u8> {
    let mut buf = Vec::with_capacity(PREFIX_LEN + sealed.ciphertext.len());
    buf.extend_from_slice(&sealed.nonce);
    buf.extend_from_slice(&sealed.tag);
    buf.extend_from_slice(&sealed.ciphertext);
    buf
}

/// Split file bytes back into nonce, tag and ciphertext.
pub fn from_bytes(data: &[u8]) -> Result<Sealed> {
    if data.len() < PREFIX_LEN {
        return Err(VaultError::InvalidVaultFormat(format!(
            "file is {} bytes, too small to be a vault",
            data.len()
        )));
    }

    let (nonce, rest) = data.split_at(NONCE_LEN);
    let (tag, ciphertext) = rest.split_at(TAG_LEN);

    let mut sealed = Sealed {
        ciphertext: ciphertext.to_vec(),
        tag: [0u8; TAG_LEN],
        nonce: [0u8; NONCE_LEN],
    };
    sealed.nonce.copy_from_slice(nonce);
    sealed.tag.copy_from_slice(tag);
    Ok(sealed)
}

/// Read and split a vault file.
pub fn read_vault(path: &Path) -> Result<Sealed> {
    let data = fs::read(path)?;
    from_bytes(&data)
}

/// Write a vault file to disk **atomically**.
///
/// 1. Write the bytes to a temp file in the same directory and fsync it.
/// 2. Restrict permissions to the owner (Unix).
/// 3. Rename the temp file over the target path and fsync the directory.
///
/// If `path` is a symlink the file it points to is replaced, so the link
/// itself survives.  If any step before the rename fails the temp file is
/// removed and the previous vault file, if any, is left exactly as it was.
pub fn write_vault(path: &Path, sealed: &Sealed) -> Result<()> {
    let target = resolve_target(path)?;
    let tmp_path = temp_path(&target);

    let result = write_and_rename(&tmp_path, &target, &to_bytes(sealed));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(tmp_path, path)?;

    // Persist the rename itself.
    #[cfg(unix)]
    File::open(parent_dir(path))?.sync_all()?;

    Ok(())
}

/// The file a write to `path` should replace: the link target when `path`
/// is a symlink, `path` itself otherwise.
///
/// A dangling link resolves one hop, so the first write creates the file
/// the link points at.
fn resolve_target(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(parent_dir(path).join(fs::read_link(path)?))
            }
            Err(e) => Err(e.into()),
        },
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e.into()),
    }
}

/// Directory holding `path`; `.` for a bare file name.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Temp file next to the vault: `<dir>/.<name>.tmp`.
///
/// Same directory, so the final rename stays on one filesystem.
pub fn temp_path(path: &Path) -> PathBuf {
    parent_dir(path).join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}
