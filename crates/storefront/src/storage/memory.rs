use std::collections::HashMap;

use parking_lot::Mutex;

use super::{LocalStorage, StorageError, StorageKey};

/// In-process storage. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw values, e.g. records written by an older version.
    #[must_use]
    pub fn with_values<'a>(values: impl IntoIterator<Item = (StorageKey, &'a str)>) -> Self {
        let storage = Self::new();
        {
            let mut map = storage.values.lock();
            for (key, value) in values {
                map.insert(key, value.to_owned());
            }
        }
        storage
    }

    /// Raw value under `key`, for assertions.
    #[must_use]
    pub fn raw(&self, key: StorageKey) -> Option<String> {
        self.values.lock().get(&key).cloned()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.values.lock().insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.values.lock().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(StorageKey::Cart).unwrap(), None);

        storage.set(StorageKey::Cart, "[]").unwrap();
        assert_eq!(storage.get(StorageKey::Cart).unwrap().as_deref(), Some("[]"));

        storage.remove(StorageKey::Cart).unwrap();
        storage.remove(StorageKey::Cart).unwrap();
        assert_eq!(storage.get(StorageKey::Cart).unwrap(), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = MemoryStorage::with_values([(StorageKey::Wishlist, "[1]")]);
        assert_eq!(storage.raw(StorageKey::Products), None);
        assert_eq!(storage.raw(StorageKey::Wishlist).as_deref(), Some("[1]"));
    }
}
