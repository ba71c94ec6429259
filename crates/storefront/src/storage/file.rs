use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{LocalStorage, StorageError, StorageKey};

/// Directory-backed storage: each key lives in `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file which is synced and then renamed over
/// the target, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Open {
            path: dir.display().to_string(),
            source,
        })?;
        debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// The directory values are kept in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { key, source }),
        }
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let target = self.path(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&staging)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&staging, &target)
        };
        write().map_err(|source| {
            match fs::remove_file(&staging) {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    debug!(key = %key, error = %e, "Could not remove staging file");
                }
                _ => {}
            }
            StorageError::Io { key, source }
        })
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { key, source }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("shop");
        let storage = FileStorage::open(&dir).unwrap();
        assert!(storage.dir().is_dir());
    }

    #[test]
    fn test_values_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        FileStorage::open(tmp.path())
            .unwrap()
            .set(StorageKey::Categories, r#"["Books"]"#)
            .unwrap();

        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(
            reopened.get(StorageKey::Categories).unwrap().as_deref(),
            Some(r#"["Books"]"#)
        );
        assert!(tmp.path().join("categories.json").is_file());
    }

    #[test]
    fn test_set_replaces_and_leaves_no_staging_file() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        storage.set(StorageKey::CheckoutForm, "{}").unwrap();
        storage.set(StorageKey::CheckoutForm, r#"{"name":"Ada"}"#).unwrap();

        assert_eq!(
            storage.get(StorageKey::CheckoutForm).unwrap().as_deref(),
            Some(r#"{"name":"Ada"}"#)
        );
        assert!(!tmp.path().join(".checkoutForm.json.tmp").exists());
    }

    #[test]
    fn test_missing_key_reads_none_and_removes_quietly() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(storage.get(StorageKey::Wishlist).unwrap(), None);
        storage.remove(StorageKey::Wishlist).unwrap();
    }

    #[test]
    fn test_each_key_has_its_own_file() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        for key in StorageKey::ALL {
            storage.set(key, key.as_str()).unwrap();
        }
        for key in StorageKey::ALL {
            assert_eq!(storage.get(key).unwrap().as_deref(), Some(key.as_str()));
            assert!(tmp.path().join(format!("{key}.json")).is_file());
        }
    }

    #[test]
    fn test_failed_write_removes_staging_file() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        fs::create_dir(tmp.path().join("cart.json")).unwrap();

        let err = storage.set(StorageKey::Cart, "[]").unwrap_err();
        assert!(matches!(err, StorageError::Io { key: StorageKey::Cart, .. }));
        assert!(!tmp.path().join(".cart.json.tmp").exists());
        assert!(tmp.path().join("cart.json").is_dir());
    }
}
