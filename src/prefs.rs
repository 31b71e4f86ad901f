//! Persisted player preferences.
//!
//! The only setting that outlives a session is the mute flag. It is
//! presentation state: the round logic never reads it.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PreferenceError;

/// Key the mute flag is stored under.
pub const MUTE_KEY: &str = "memgame_muted";

/// Storage for the mute flag.
pub trait PreferenceStore {
    /// Read the stored flag. Unset means not muted.
    fn load_muted(&self) -> Result<bool, PreferenceError>;

    /// Persist the flag.
    fn save_muted(&mut self, muted: bool) -> Result<(), PreferenceError>;
}

/// Keeps the flag in memory only. Useful for tests and ephemeral sessions.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryPreferences {
    muted: bool,
}

impl MemoryPreferences {
    /// Create a store holding `muted`.
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load_muted(&self) -> Result<bool, PreferenceError> {
        Ok(self.muted)
    }

    fn save_muted(&mut self, muted: bool) -> Result<(), PreferenceError> {
        self.muted = muted;
        Ok(())
    }
}

/// JSON object on disk, `{"memgame_muted": true}`.
///
/// Other keys in the file are preserved on save.
#[derive(Clone, Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    /// Use the file at `path`. It need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, serde_json::Value>, PreferenceError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn load_muted(&self) -> Result<bool, PreferenceError> {
        let map = self.read_map()?;
        Ok(map.get(MUTE_KEY).and_then(serde_json::Value::as_bool).unwrap_or(false))
    }

    fn save_muted(&mut self, muted: bool) -> Result<(), PreferenceError> {
        let mut map = self.read_map()?;
        map.insert(MUTE_KEY.to_string(), serde_json::Value::Bool(muted));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        debug!(path = ?self.path, muted, "saved mute preference");
        Ok(())
    }
}
