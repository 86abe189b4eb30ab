// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage port for raw document blobs.

use assembly_codec::SceneError;
use thiserror::Error;

/// Reserved key for codec settings. Never usable as a scene id.
pub const SETTINGS_KEY: &str = "settings";

/// Storage port for raw blobs keyed by a relative, `/`-separated path.
pub trait SceneStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    /// Persist a raw blob, replacing any previous value.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
    /// Remove a blob. Returns `NotFound` when missing.
    fn delete_raw(&self, key: &str) -> Result<(), StoreError>;
}

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// Key is not a safe relative path, or a scene id is unusable.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Settings (de)serialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The stored scene document could not be encoded or decoded.
    #[error("document error: {0}")]
    Document(#[from] SceneError),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Reject keys that could escape the store root.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.contains('\\')
        || key.starts_with('/')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        Err(StoreError::InvalidKey(key.to_owned()))
    } else {
        Ok(())
    }
}

/// Storage key of a scene's document: `{scene_id}/config.json`.
pub fn scene_key(scene_id: &str) -> Result<String, StoreError> {
    if scene_id.contains('/') || scene_id == SETTINGS_KEY {
        return Err(StoreError::InvalidKey(scene_id.to_owned()));
    }
    let key = format!("{scene_id}/config.json");
    validate_key(&key)?;
    Ok(key)
}
