//! Device identity persistence.
//!
//! The signed-in guide is identified by an opaque user key stored in a
//! plain file under the Pink Tower home directory. Signing in writes
//! the key; signing out removes the file. A missing or unreadable file
//! simply means no one is signed in.

use std::fs;
use std::path::PathBuf;

use crate::config::identity_path;
use crate::error::{PinkTowerError, Result};

/// Handle to the on-device identity file.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    path: PathBuf,
}

impl DeviceIdentity {
    /// Open the identity at the default location
    /// (`<pinktower_home>/identity`).
    pub fn new() -> Result<Self> {
        let path = identity_path().ok_or_else(|| {
            PinkTowerError::config("Could not determine identity path (no home directory)")
        })?;
        Ok(Self { path })
    }

    /// Open an identity file at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The currently signed-in user key, if any.
    ///
    /// Unreadable or empty files are treated as signed-out.
    pub fn current(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let key = content.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    /// Record a sign-in by persisting the user key.
    pub fn set(&self, user_key: &str) -> Result<()> {
        let key = user_key.trim();
        if key.is_empty() {
            return Err(PinkTowerError::invalid_input("user key cannot be empty"));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| PinkTowerError::storage(parent, e))?;
            }
        }
        fs::write(&self.path, key).map_err(|e| PinkTowerError::storage(&self.path, e))?;
        Ok(())
    }

    /// Record a sign-out by removing the identity file.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PinkTowerError::storage(&self.path, e)),
        }
    }
}
