//! Local key-value persistence for favorites.
//!
//! Values are JSON strings stored under fixed keys. The file-backed store
//! writes one `<key>.json` file per key in the user data directory:
//! `~/.local/share/bookfinder/` (or `$XDG_DATA_HOME/bookfinder/`).

use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::Favorites;
use crate::book::Book;

/// Storage key holding the serialized favorites array.
pub const FAVORITES_KEY: &str = "favorites";

const APP_DIR_NAME: &str = "bookfinder";

/// Errors for persisted key-value storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No suitable user data directory is available.
    #[error(
        "unable to determine data directory\n  Suggestion: Set XDG_DATA_HOME or HOME, or pass --data-dir"
    )]
    DataDirUnavailable,
    /// Keys become file names and must stay inside the data directory.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    /// Filesystem I/O failed.
    #[error(
        "storage I/O failed for '{path}': {source}\n  Suggestion: Check that the data directory exists and is writable"
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// In-memory store lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Durable string key-value storage.
pub trait KeyValueStorage: Send {
    /// Reads the value stored under `key`, `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as a JSON file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the default user data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DataDirUnavailable`] when no data dir can be resolved.
    pub fn in_default_dir() -> Result<Self, StorageError> {
        Ok(Self::new(default_data_dir()?))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for keys that are not simple names.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Write-then-rename so a crash mid-write never leaves a truncated value.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = value.len(), "Stored value");
        Ok(())
    }
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads favorites from storage.
///
/// Never fails: an absent value yields an empty list, and an unreadable or
/// malformed value is logged and treated as empty.
pub fn load_favorites(storage: &dyn KeyValueStorage) -> Favorites {
    let raw = match storage.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored favorites; starting empty");
            return Favorites::new();
        }
        Err(error) => {
            warn!(error = %error, "Could not read stored favorites; starting empty");
            return Favorites::new();
        }
    };

    match serde_json::from_str::<Vec<Book>>(&raw) {
        Ok(books) => {
            let favorites = Favorites::from_books(books);
            debug!(count = favorites.len(), "Loaded favorites");
            favorites
        }
        Err(error) => {
            warn!(error = %error, "Stored favorites are malformed; starting empty");
            Favorites::new()
        }
    }
}

/// Serializes the whole favorites list and stores it under [`FAVORITES_KEY`].
///
/// # Errors
///
/// Returns [`StorageError`] when serialization or the write fails.
pub fn save_favorites(
    storage: &dyn KeyValueStorage,
    favorites: &Favorites,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(favorites)?;
    storage.set(FAVORITES_KEY, &raw)
}

/// Returns the default data directory (`~/.local/share/bookfinder`).
///
/// # Errors
///
/// Returns [`StorageError::DataDirUnavailable`] if no usable base dir is found.
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    resolve_data_dir(
        sanitize_env_path(env::var_os("XDG_DATA_HOME")),
        sanitize_env_path(env::var_os("HOME")),
        sanitize_env_path(env::var_os("APPDATA")),
    )
}

fn sanitize_env_path(value: Option<OsString>) -> Option<PathBuf> {
    let value = value?;
    if value.to_string_lossy().trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(value))
}

fn resolve_data_dir(
    xdg_data_home: Option<PathBuf>,
    home: Option<PathBuf>,
    app_data: Option<PathBuf>,
) -> Result<PathBuf, StorageError> {
    if let Some(xdg) = xdg_data_home {
        return Ok(xdg.join(APP_DIR_NAME));
    }
    if let Some(home) = home {
        return Ok(home.join(".local").join("share").join(APP_DIR_NAME));
    }
    if let Some(app_data) = app_data {
        return Ok(app_data.join(APP_DIR_NAME));
    }
    Err(StorageError::DataDirUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dune() -> Book {
        Book {
            key: "/works/OL1W".to_string(),
            title: "Dune".to_string(),
            author_name: Some(vec!["Frank Herbert".to_string()]),
            first_publish_year: Some(1965),
            cover_i: None,
            subject: None,
        }
    }

    #[test]
    fn test_resolve_data_dir_priority() {
        let dir = resolve_data_dir(
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
            None,
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/xdg/bookfinder"));

        let dir = resolve_data_dir(None, Some(PathBuf::from("/home/u")), None).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.local/share/bookfinder"));

        let dir = resolve_data_dir(None, None, Some(PathBuf::from("C:/AppData"))).unwrap();
        assert_eq!(dir, PathBuf::from("C:/AppData/bookfinder"));

        assert!(matches!(
            resolve_data_dir(None, None, None),
            Err(StorageError::DataDirUnavailable)
        ));
    }

    #[test]
    fn test_sanitize_env_path_rejects_blank() {
        assert!(sanitize_env_path(Some(OsString::from("  "))).is_none());
        assert!(sanitize_env_path(None).is_none());
    }

    #[test]
    fn test_file_storage_get_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path().join("nested"));
        assert!(storage.get(FAVORITES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_set_creates_dir_and_round_trips() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path().join("nested"));
        storage.set(FAVORITES_KEY, "[]").unwrap();
        assert_eq!(storage.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(temp.path().join("nested").join("favorites.json").exists());
        assert!(!temp.path().join("nested").join("favorites.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let storage = FileStorage::new("/tmp/unused");
        for key in ["", "../escape", "a/b", "a.b"] {
            assert!(
                matches!(storage.path_for(key), Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_load_favorites_absent_is_empty() {
        let storage = MemoryStorage::new();
        assert!(load_favorites(&storage).is_empty());
    }

    #[test]
    fn test_load_favorites_malformed_is_empty() {
        let storage = MemoryStorage::new();
        storage.set(FAVORITES_KEY, "{not json").unwrap();
        assert!(load_favorites(&storage).is_empty());

        storage.set(FAVORITES_KEY, r#"{"key":"x"}"#).unwrap();
        assert!(load_favorites(&storage).is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let storage = MemoryStorage::new();
        let mut favorites = Favorites::new();
        favorites.toggle(&dune());
        favorites.toggle(&Book::new("/works/OL2W", "Emma"));
        save_favorites(&storage, &favorites).unwrap();

        let loaded = load_favorites(&storage);
        assert_eq!(loaded, favorites);
    }

    #[test]
    fn test_load_favorites_drops_duplicate_keys() {
        let storage = MemoryStorage::new();
        storage
            .set(
                FAVORITES_KEY,
                r#"[{"key":"a","title":"First"},{"key":"a","title":"Second"}]"#,
            )
            .unwrap();
        let loaded = load_favorites(&storage);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("a").unwrap().title, "First");
    }
}
