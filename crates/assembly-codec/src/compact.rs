// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compact interchange variant for human-editable viewers.
//!
//! `{"parts":[{"name","visibility","matrix","cadUrl"?,"isPreset"?}, ...]}`,
//! one part object per line. No version, no ids, no timestamp.

use serde::{Deserialize, Serialize};

use crate::document::{
    lenient_matrix, lenient_text, PartRecord, SceneDocument, SceneMetadata, DOCUMENT_VERSION,
};
use crate::error::SceneError;
use crate::normalize::base_name;
use crate::settings::AssemblySettings;

/// First placeholder node id assigned to compact input.
pub const PLACEHOLDER_NODE_ID_BASE: i64 = 1000;

/// Scene id given to documents expanded from compact input.
pub const COMPACT_SCENE_ID: &str = "loaded";

const fn default_visible() -> bool {
    true
}

/// One part in the compact variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactPart {
    /// Part name without suffix (spaces or underscores).
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Display visibility; defaults to visible. Also read from `visible`.
    #[serde(default = "default_visible", alias = "visible")]
    pub visibility: bool,
    /// 4×4 transform.
    #[serde(default, deserialize_with = "lenient_matrix")]
    pub matrix: Vec<f64>,
    /// Exact load location, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cad_url: Option<String>,
    /// Catalog part vs. user-supplied asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_preset: Option<bool>,
}

/// Compact document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactDocument {
    /// Parts in replay order.
    pub parts: Vec<CompactPart>,
}

impl CompactDocument {
    /// Compact view of a full document.
    pub fn from_document(document: &SceneDocument, suffix: &str) -> Self {
        let parts = document
            .parts
            .iter()
            .map(|part| CompactPart {
                name: base_name(part.label(), suffix).to_owned(),
                visibility: part.visible,
                matrix: part.matrix.clone(),
                cad_url: part.cad_url.clone(),
                is_preset: part.is_preset,
            })
            .collect();
        Self { parts }
    }

    /// Expand into a full document with placeholder node ids.
    ///
    /// The ids are never used: real ids always come from the fresh load.
    pub fn into_document(self, settings: &AssemblySettings, saved_at: String) -> SceneDocument {
        let parts = self
            .parts
            .into_iter()
            .zip(PLACEHOLDER_NODE_ID_BASE..)
            .map(|(part, node_id)| PartRecord {
                node_id,
                file_name: settings.file_name_for(&part.name),
                name: part.name,
                matrix: part.matrix,
                visible: part.visibility,
                cad_url: part.cad_url,
                is_preset: part.is_preset,
            })
            .collect();
        SceneDocument {
            version: DOCUMENT_VERSION.to_owned(),
            parts,
            metadata: SceneMetadata {
                scene_id: COMPACT_SCENE_ID.to_owned(),
                saved_at,
            },
        }
    }

    /// Compact JSON, one part per line.
    pub fn to_json(&self) -> Result<String, SceneError> {
        if self.parts.is_empty() {
            return Ok(r#"{"parts":[]}"#.to_owned());
        }
        let lines = self
            .parts
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{{\"parts\":[\n{}\n]}}", lines.join(",\n")))
    }
}
