// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistence for scene documents and codec settings.
//! Keeps storage adapters thin: a raw-bytes port plus a JSON service on top.

pub mod fs;
pub mod memory;
pub mod repository;
pub mod store;

pub use fs::FsSceneStore;
pub use memory::InMemorySceneStore;
pub use repository::SceneRepository;
pub use store::{scene_key, validate_key, SceneStore, StoreError, SETTINGS_KEY};
