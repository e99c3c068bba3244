//! Storage backends.
//!
//! The portal persists its state as named string entries, the same shape
//! as browser local storage: one entry for the whole document, one for the
//! session user. [`FileStorage`] keeps each entry as a JSON file under a
//! data directory; [`MemoryStorage`] keeps them in a map and exists so
//! tests and embedding applications can run without touching disk.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;

use crate::error::{Result, StoreError};

/// A named-string-entry store. Entries are whole payloads; there are no
/// partial writes.
pub trait StorageBackend {
    /// Read an entry, `None` if it has never been written or was removed.
    fn read_entry(&self, name: &str) -> Result<Option<String>>;

    /// Write an entry, unconditionally overwriting prior content.
    fn write_entry(&self, name: &str, payload: &str) -> Result<()>;

    /// Remove an entry. Removing an absent entry is not an error.
    fn remove_entry(&self, name: &str) -> Result<()>;
}

/// One JSON file per entry under a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (or create) storage in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/silverhome/`
    /// - macOS:   `~/Library/Application Support/com.silverhome.silverhome/`
    /// - Windows: `{FOLDERID_RoamingAppData}\silverhome\silverhome\data\`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "silverhome", "silverhome").ok_or(StoreError::NoDataDir)?;
        Self::open_at(project_dirs.data_dir())
    }

    /// Open (or create) storage at an explicit directory.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        tracing::info!(path = %dir.display(), "opening storage");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn read_entry(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.entry_path(name)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entry(&self, name: &str, payload: &str) -> Result<()> {
        fs::write(self.entry_path(name), payload)?;
        Ok(())
    }

    fn remove_entry(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process entry map, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Single-writer usage; a poisoned lock still holds valid entries.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemoryStorage {
    fn read_entry(&self, name: &str) -> Result<Option<String>> {
        Ok(self.entries().get(name).cloned())
    }

    fn write_entry(&self, name: &str, payload: &str) -> Result<()> {
        self.entries().insert(name.to_string(), payload.to_string());
        Ok(())
    }

    fn remove_entry(&self, name: &str) -> Result<()> {
        self.entries().remove(name);
        Ok(())
    }
}
