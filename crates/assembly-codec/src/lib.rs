// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene document codec for assembly-port engines.
//!
//! This crate provides:
//! - The versioned [`SceneDocument`] format (JSON) and its compact variant
//! - [`serialize_scene`]: live engine graph → document
//! - [`deserialize_scene`]: document → rebuilt graph + fresh [`ProvenanceTracker`]
//! - [`MockViewer`] for headless testing against a substitute engine
//!
//! # Design
//!
//! Node ids never survive a round trip. A document records the ids of the
//! session that wrote it as plain integers; loading always assigns new ones
//! and returns a new tracker keyed by them.

mod catalog;
mod compact;
mod deserializer;
mod document;
mod error;
mod mock_viewer;
mod normalize;
mod provenance;
mod serializer;
mod settings;

pub use catalog::PresetCatalog;
pub use compact::{CompactDocument, CompactPart, COMPACT_SCENE_ID, PLACEHOLDER_NODE_ID_BASE};
pub use deserializer::{deserialize_scene, LoadReport, LoadedScene, PartOutcome};
pub use document::{PartRecord, SceneDocument, SceneMetadata, DOCUMENT_VERSION};
pub use error::{PartError, SceneError};
pub use mock_viewer::{MockAsset, MockModel, MockNode, MockViewer};
pub use normalize::{base_name, has_suffix, to_file_name, DEFAULT_SUFFIX};
pub use provenance::{Provenance, ProvenanceTracker};
pub use serializer::{scene_part_files, serialize_scene, serialize_scene_at};
pub use settings::AssemblySettings;
