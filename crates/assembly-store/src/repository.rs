// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene document service over a [`SceneStore`].

use assembly_codec::{AssemblySettings, SceneDocument};
use tracing::{debug, info};

use crate::store::{scene_key, SceneStore, StoreError, SETTINGS_KEY};

/// Thin service that encodes documents and delegates storage to a `SceneStore`.
pub struct SceneRepository<S> {
    store: S,
    settings: AssemblySettings,
}

impl<S> SceneRepository<S> {
    /// Create a repository using default codec settings for decoding.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, AssemblySettings::default())
    }

    /// Create a repository that decodes with `settings` (suffix for compact input).
    pub fn with_settings(store: S, settings: AssemblySettings) -> Self {
        Self { store, settings }
    }

    /// Settings used for decoding.
    pub fn settings(&self) -> &AssemblySettings {
        &self.settings
    }

    /// Replace the decoding settings.
    pub fn set_settings(&mut self, settings: AssemblySettings) {
        self.settings = settings;
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the repository and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> SceneRepository<S>
where
    S: SceneStore,
{
    /// Persist `document` as pretty JSON for `scene_id`, overwriting.
    pub fn save(&self, scene_id: &str, document: &SceneDocument) -> Result<(), StoreError> {
        let key = scene_key(scene_id)?;
        let json = document.to_json_pretty()?;
        info!(scene_id, parts = document.parts.len(), %key, "saving scene document");
        self.store.save_raw(&key, json.as_bytes())
    }

    /// Load the document for `scene_id`. `Ok(None)` means nothing saved yet.
    pub fn load(&self, scene_id: &str) -> Result<Option<SceneDocument>, StoreError> {
        let key = scene_key(scene_id)?;
        match self.store.load_raw(&key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let document = SceneDocument::parse_slice(&bytes, &self.settings)?;
                info!(scene_id, parts = document.parts.len(), "scene document loaded");
                Ok(Some(document))
            }
            Err(StoreError::NotFound) => {
                debug!(scene_id, "no saved scene document");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the document for `scene_id`. Missing documents are not an error.
    pub fn delete(&self, scene_id: &str) -> Result<(), StoreError> {
        let key = scene_key(scene_id)?;
        match self.store.delete_raw(&key) {
            Ok(()) | Err(StoreError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Load saved codec settings. `Ok(None)` if none were saved.
    pub fn load_settings(&self) -> Result<Option<AssemblySettings>, StoreError> {
        match self.store.load_raw(SETTINGS_KEY) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Persist codec settings.
    pub fn save_settings(&self, settings: &AssemblySettings) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(settings)?;
        self.store.save_raw(SETTINGS_KEY, &data)
    }
}
