// SPDX-License-Identifier: MIT OR Apache-2.0
//! Key-value preference storage.
//!
//! Values are plain strings under fixed keys. [`FilePrefStore`] keeps them in
//! a RON map on disk and re-reads the file on every access, so independent
//! readers always see the persisted value.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key of the debug mode flag (`"true"` / `"false"`)
pub const DEBUG_MODE_KEY: &str = "deepdata-debug-mode";
/// Key of the selected language code
pub const LANGUAGE_KEY: &str = "lang";
/// Key of the selected theme (`"dark"` / `"light"`)
pub const THEME_KEY: &str = "theme";

/// Preference storage errors
#[derive(Debug, Error)]
pub enum PrefError {
    /// Reading or writing the backing file failed
    #[error("Preference I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid preference map
    #[error("Failed to parse preferences: {0}")]
    Decode(#[from] ron::error::SpannedError),

    /// The preference map could not be serialized
    #[error("Failed to serialize preferences: {0}")]
    Encode(#[from] ron::Error),

    /// The store refuses access (test stores simulate broken media with it)
    #[error("Preference store unavailable")]
    Unavailable,
}

/// Result type for preference operations
pub type Result<T> = std::result::Result<T, PrefError>;

/// String key-value store shared by the shell's stores.
pub trait PrefStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Preferences persisted as a RON map in a single file.
#[derive(Debug, Clone)]
pub struct FilePrefStore {
    path: PathBuf,
}

impl FilePrefStore {
    /// File name used inside the config directory
    pub const FILE_NAME: &'static str = "prefs.ron";

    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `prefs.ron` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(ron::from_str(&content)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = ron::ser::to_string_pretty(map, ron::ser::PrettyConfig::default())?;
        let staging = self.path.with_extension("ron.tmp");
        std::fs::write(&staging, content)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl PrefStore for FilePrefStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(PrefError::Decode(e)) => {
                tracing::warn!(path = %self.path.display(), "Discarding unreadable preferences: {}", e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_owned(), value.to_owned());
        self.write_map(&map)?;
        tracing::debug!(key, value, "preference saved");
        Ok(())
    }
}

/// In-memory preferences, for tests and for running without a config dir.
#[derive(Debug, Default)]
pub struct MemoryPrefStore {
    values: RefCell<BTreeMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryPrefStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent access fail with [`PrefError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.get() {
            Err(PrefError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl PrefStore for MemoryPrefStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Read a `"true"`/`"false"` flag. Anything but `"true"` and any read error
/// count as `false`.
pub fn read_flag(store: &dyn PrefStore, key: &str) -> bool {
    match store.get(key) {
        Ok(value) => value.as_deref() == Some("true"),
        Err(e) => {
            tracing::warn!(key, "Failed to read preference, assuming false: {}", e);
            false
        }
    }
}
