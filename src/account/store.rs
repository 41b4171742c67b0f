//! Filesystem-backed account catalog.
//!
//! One directory per handle under the accounts root:
//! `<root>/<handle>/identity.json`, `<root>/<handle>/keys` (encrypted blob),
//! plus `data/` (runtime node storage) and `keeper/` (keeper storage).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::types::Identity;
use crate::error::SextantError;

const IDENTITY_FILE: &str = "identity.json";
const KEYS_FILE: &str = "keys";
const DATA_DIR: &str = "data";

pub struct AccountStore {
    root: PathBuf,
    index: HashMap<String, Identity>,
}

impl AccountStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: HashMap::new(),
        }
    }

    /// Handles are lower-cased before any use; uniqueness is enforced on
    /// the normalized form.
    fn normalize(handle: &str) -> String {
        handle.to_lowercase()
    }

    pub fn account_dir(&self, handle: &str) -> PathBuf {
        self.root.join(Self::normalize(handle))
    }

    /// Enumerate account directories and build the in-memory index.
    /// A directory missing either artifact or with an unparseable identity
    /// document is skipped with a warning (best-effort cataloging).
    pub fn load_catalog(&mut self) -> Result<usize, SextantError> {
        self.index.clear();
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            return Ok(0);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(handle) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match Self::load_identity(&path) {
                Ok(identity) => {
                    self.index.insert(Self::normalize(handle), identity);
                }
                Err(e) => {
                    warn!("Skipping account directory '{}': {}", path.display(), e);
                }
            }
        }

        info!("Catalog loaded: {} account(s)", self.index.len());
        Ok(self.index.len())
    }

    fn load_identity(dir: &Path) -> Result<Identity, SextantError> {
        // A directory is only a valid account with both artifacts present.
        if !dir.join(KEYS_FILE).exists() {
            return Err(SextantError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "key blob missing",
            )));
        }
        let contents = fs::read_to_string(dir.join(IDENTITY_FILE))?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.index.contains_key(&Self::normalize(handle))
    }

    pub fn identity(&self, handle: &str) -> Option<&Identity> {
        self.index.get(&Self::normalize(handle))
    }

    pub fn handles(&self) -> Vec<String> {
        let mut handles: Vec<String> = self.index.keys().cloned().collect();
        handles.sort();
        handles
    }

    /// Create an account on disk and register it in the index. Each file is
    /// written atomically; the index only sees the account once both files
    /// are in place, so a crash between the two writes leaves nothing the
    /// next catalog load would treat as valid.
    pub fn create(
        &mut self,
        handle: &str,
        identity: &Identity,
        encrypted_keys: &[u8],
    ) -> Result<(), SextantError> {
        let handle = Self::normalize(handle);
        if self.index.contains_key(&handle) {
            return Err(SextantError::AlreadyExists(handle));
        }

        let dir = self.root.join(&handle);
        fs::create_dir_all(dir.join(DATA_DIR))?;

        let identity_json = serde_json::to_vec_pretty(identity)?;
        write_atomic(&dir.join(IDENTITY_FILE), &identity_json)?;
        write_atomic(&dir.join(KEYS_FILE), encrypted_keys)?;

        self.index.insert(handle, identity.clone());
        Ok(())
    }

    pub fn load_encrypted_keys(&self, handle: &str) -> Result<Vec<u8>, SextantError> {
        let handle = Self::normalize(handle);
        if !self.index.contains_key(&handle) {
            return Err(SextantError::NotFound(handle));
        }
        Ok(fs::read(self.root.join(&handle).join(KEYS_FILE))?)
    }

    /// Remove an account's entire directory and its index entry. Callers
    /// must gate this behind a password check; the store itself does no
    /// authentication.
    pub fn delete(&mut self, handle: &str) -> Result<(), SextantError> {
        let handle = Self::normalize(handle);
        if !self.index.contains_key(&handle) {
            return Err(SextantError::NotFound(handle));
        }

        fs::remove_dir_all(self.root.join(&handle))?;
        self.index.remove(&handle);
        info!("Account '{}' deleted", handle);
        Ok(())
    }
}

/// Atomic replace: write to a sibling temp file, then rename over the
/// target. A crash mid-write leaves any previous file untouched.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SextantError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SextantError::Serialization("invalid file path".to_string()))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
