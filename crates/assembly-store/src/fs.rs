// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `SceneStore` (uses platform data dir).

use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::store::{validate_key, SceneStore, StoreError};

/// Store blobs as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsSceneStore {
    base: PathBuf,
}

impl FsSceneStore {
    /// Create a store rooted at the user data directory (e.g., `~/.local/share/assembly`).
    pub fn new() -> Result<Self, StoreError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "assembly")
            .ok_or_else(|| StoreError::Other("could not resolve data dir".into()))?;
        Self::at(proj.data_dir().join("scenes"))
    }

    /// Create a store rooted at `base`, creating it if needed.
    pub fn at(base: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Root directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.base.clone(), |path, segment| path.join(segment)))
    }
}

fn not_found_or(err: std::io::Error) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound
    } else {
        StoreError::Io(err)
    }
}

impl SceneStore for FsSceneStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        fs::read(self.path_for(key)?).map_err(not_found_or)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::remove_file(&path).map_err(not_found_or)?;
        if let Some(parent) = path.parent().filter(|p| *p != self.base) {
            // Leave non-empty directories alone.
            let _ = fs::remove_dir(parent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_keys_create_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSceneStore::at(dir.path()).unwrap();
        store.save_raw("abc/config.json", b"{}").unwrap();
        assert!(dir.path().join("abc").join("config.json").is_file());
        assert_eq!(store.load_raw("abc/config.json").unwrap(), b"{}");
    }

    #[test]
    fn missing_files_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSceneStore::at(dir.path()).unwrap();
        assert!(matches!(store.load_raw("nope/config.json"), Err(StoreError::NotFound)));
        assert!(matches!(store.delete_raw("nope/config.json"), Err(StoreError::NotFound)));
    }

    #[test]
    fn delete_removes_file_and_empty_scene_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSceneStore::at(dir.path()).unwrap();
        store.save_raw("abc/config.json", b"{}").unwrap();
        store.delete_raw("abc/config.json").unwrap();
        assert!(!dir.path().join("abc").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn traversal_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSceneStore::at(dir.path().join("root")).unwrap();
        assert!(matches!(
            store.save_raw("../escape.json", b"x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(!dir.path().join("escape.json").exists());
    }
}
