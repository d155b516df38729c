//! The in-memory password table and its binary encoding.
//!
//! The table is what gets sealed into the vault file.  Its plaintext
//! encoding is:
//!
//! ```text
//! [format: u8 = 1][count: u32 LE]
//!   count × ([name_len: u32 LE][name utf-8][password_len: u32 LE][password utf-8])
//! ```
//!
//! Entries are written sorted by service name so the same table always
//! produces the same bytes.

use std::collections::HashMap;

use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Current table encoding version.
pub const TABLE_FORMAT: u8 = 1;

/// Normalize a service name into its lookup key.
pub fn normalize(service: &str) -> String {
    service.to_lowercase()
}

/// A single stored credential.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordEntry {
    /// Normalized (lower-cased) service name.
    pub service: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("service", &self.service)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Map of normalized service name -> password.
///
/// Passwords are held in `Zeroizing` strings so dropping the table wipes them.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct PasswordTable {
    entries: HashMap<String, Zeroizing<String>>,
}

impl PasswordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the password for `service`.
    pub fn upsert(&mut self, service: &str, password: &str) {
        self.entries
            .insert(normalize(service), Zeroizing::new(password.to_string()));
    }

    /// Look up the password for `service`.
    pub fn get(&self, service: &str) -> Option<&str> {
        self.entries.get(&normalize(service)).map(|p| p.as_str())
    }

    /// Remove `service`; returns whether it was present.
    pub fn remove(&mut self, service: &str) -> bool {
        self.entries.remove(&normalize(service)).is_some()
    }

    /// Sorted snapshot of the stored service names.
    pub fn services(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// All entries, sorted by service name.
    pub fn entries(&self) -> Vec<PasswordEntry> {
        let mut list: Vec<PasswordEntry> = self
            .entries
            .iter()
            .map(|(service, password)| PasswordEntry {
                service: service.clone(),
                password: password.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.service.cmp(&b.service));
        list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the table into the length-prefixed binary form.
    ///
    /// The returned buffer holds plaintext passwords and is wiped on drop.
    pub fn encode(&self) -> Result<Zeroizing<Vec<u8>>> {
        let mut buf = Zeroizing::new(Vec::new());
        buf.push(TABLE_FORMAT);
        put_len(&mut buf, self.entries.len())?;

        for entry in self.entries() {
            put_len(&mut buf, entry.service.len())?;
            buf.extend_from_slice(entry.service.as_bytes());
            put_len(&mut buf, entry.password.len())?;
            buf.extend_from_slice(entry.password.as_bytes());
        }

        Ok(buf)
    }

    /// Parse bytes produced by [`PasswordTable::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader { bytes, pos: 0 };

        let format = reader.take(1)?[0];
        if format != TABLE_FORMAT {
            return Err(VaultError::InvalidVaultFormat(format!(
                "unsupported table format {format}, expected {TABLE_FORMAT}"
            )));
        }

        let count = reader.read_len()?;
        let mut table = Self::new();
        for _ in 0..count {
            let service = reader.string()?;
            let password = Zeroizing::new(reader.string()?);
            if normalize(&service) != service {
                return Err(VaultError::InvalidVaultFormat(
                    "service name in table is not normalized".into(),
                ));
            }
            if table.entries.insert(service, password).is_some() {
                return Err(VaultError::InvalidVaultFormat(
                    "duplicate service name in table".into(),
                ));
            }
        }

        if reader.pos != bytes.len() {
            return Err(VaultError::InvalidVaultFormat(
                "trailing bytes after password table".into(),
            ));
        }

        Ok(table)
    }
}

impl std::fmt::Debug for PasswordTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

fn put_len(buf: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| {
        VaultError::InvalidVaultFormat(format!("length {len} exceeds u32::MAX"))
    })?;
    buf.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

/// Cursor over an encoded table.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| VaultError::InvalidVaultFormat("password table is truncated".into()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_len(&mut self) -> Result<usize> {
        let raw: [u8; 4] = self
            .take(4)?
            .try_into()
            .map_err(|_| VaultError::InvalidVaultFormat("bad length prefix".into()))?;
        usize::try_from(u32::from_le_bytes(raw))
            .map_err(|_| VaultError::InvalidVaultFormat("length exceeds address space".into()))
    }

    fn string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| VaultError::InvalidVaultFormat("entry is not valid UTF-8".into()))
    }
}
