// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory store fake for testing without filesystem I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::store::{validate_key, SceneStore, StoreError};

/// In-memory implementation of [`SceneStore`] for testing.
///
/// Clones share the same data, so a test can hand one clone to a
/// [`crate::SceneRepository`] and inspect the other. It also tracks call counts.
///
/// # Example
///
/// ```
/// use assembly_codec::SceneDocument;
/// use assembly_store::{InMemorySceneStore, SceneRepository};
///
/// let store = InMemorySceneStore::new();
/// let repo = SceneRepository::new(store.clone());
///
/// repo.save("demo", &SceneDocument::new("demo", "2025-01-01T00:00:00Z", vec![])).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key("demo/config.json"));
/// ```
#[derive(Clone, Default)]
pub struct InMemorySceneStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemorySceneStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given key-value pairs.
    pub fn with_data(data: HashMap<String, Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                data,
                ..Inner::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Configure the store to fail on load operations.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Configure the store to fail on save operations.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Number of `load_raw` attempts, including failed ones.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` attempts, including failed ones.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// All keys currently present, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.lock().data.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Check if a key exists in the store.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Raw bytes under `key`, bypassing counters.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }
}

impl SceneStore for InMemorySceneStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let mut inner = self.lock();
        inner.load_count += 1;
        validate_key(key)?;

        if inner.fail_on_load {
            return Err(StoreError::Other("simulated load failure".into()));
        }

        inner.data.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.save_count += 1;
        validate_key(key)?;

        if inner.fail_on_save {
            return Err(StoreError::Other("simulated save failure".into()));
        }

        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.lock()
            .data
            .remove(key)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_save_load() {
        let store = InMemorySceneStore::new();
        store.save_raw("test", b"hello").unwrap();
        assert_eq!(store.load_raw("test").unwrap(), b"hello");
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn missing_key_returns_not_found() {
        let store = InMemorySceneStore::new();
        assert!(matches!(store.load_raw("missing"), Err(StoreError::NotFound)));
        assert!(matches!(store.delete_raw("missing"), Err(StoreError::NotFound)));
    }

    #[test]
    fn simulated_failures() {
        let store = InMemorySceneStore::new();
        store.save_raw("test", b"data").unwrap();
        store.set_fail_on_load(true);
        assert!(matches!(store.load_raw("test"), Err(StoreError::Other(_))));
        store.set_fail_on_save(true);
        assert!(matches!(store.save_raw("test", b"x"), Err(StoreError::Other(_))));
        assert_eq!(store.raw("test").unwrap(), b"data");
    }

    #[test]
    fn with_data_prepopulates_store() {
        let store = InMemorySceneStore::with_data(HashMap::from([
            ("b".to_owned(), b"2".to_vec()),
            ("a".to_owned(), b"1".to_vec()),
        ]));
        assert_eq!(store.keys(), vec!["a", "b"]);
        store.delete_raw("a").unwrap();
        assert!(!store.contains_key("a"));
    }
}
