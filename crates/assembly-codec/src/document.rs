// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene Document: the persisted unit.
//!
//! JSON layout (field names are part of the format):
//!
//! ```text
//! { "version": "1.0",
//!   "parts": [ { "nodeId", "name", "fileName", "matrix": [16], "visible",
//!                "cadUrl"?, "isPreset"? } ],
//!   "metadata": { "sceneId", "savedAt" } }
//! ```

use assembly_port::NodeMatrix;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::compact::CompactDocument;
use crate::error::{PartError, SceneError};
use crate::normalize::to_file_name;
use crate::settings::AssemblySettings;

/// Version tag written by this codec.
pub const DOCUMENT_VERSION: &str = "1.0";

const fn default_visible() -> bool {
    true
}

/// Reads a `matrix` without failing the whole document: `null` or a
/// non-array reads as empty, and non-numeric elements (`null` is how JSON
/// writers emit NaN) are dropped, so the record fails its length check and
/// is skipped on its own.
pub(crate) fn lenient_matrix<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(Value::as_f64).collect(),
        _ => Vec::new(),
    })
}

/// Reads a string field, treating `null` and non-strings as empty.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

/// One placed top-level part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    /// Node id in the session that wrote the document. Historical only.
    #[serde(default)]
    pub node_id: i64,
    /// Display name as reported by the engine.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Canonical file reference derived from `name`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub file_name: String,
    /// 4×4 transform; must hold exactly 16 values.
    #[serde(default, deserialize_with = "lenient_matrix")]
    pub matrix: Vec<f64>,
    /// Display visibility. Also read from the compact `visibility` key.
    #[serde(default = "default_visible", alias = "visibility")]
    pub visible: bool,
    /// Exact location used the first time this part was loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cad_url: Option<String>,
    /// Catalog part vs. user-supplied asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_preset: Option<bool>,
}

impl PartRecord {
    /// The record's transform, if it has exactly 16 values.
    pub fn transform(&self) -> Result<NodeMatrix, PartError> {
        NodeMatrix::try_from_slice(&self.matrix).ok_or(PartError::MatrixLength {
            found: self.matrix.len(),
        })
    }

    /// Canonical file name: `fileName` when present, else derived from `name`.
    pub fn resolved_file_name(&self, suffix: &str) -> Result<String, PartError> {
        [self.file_name.as_str(), self.name.as_str()]
            .into_iter()
            .find(|candidate| !candidate.trim().is_empty())
            .map(|candidate| to_file_name(candidate, suffix))
            .ok_or(PartError::MissingName)
    }

    /// Best human-readable label, even for malformed records.
    pub fn label(&self) -> &str {
        if self.file_name.is_empty() {
            &self.name
        } else {
            &self.file_name
        }
    }

    /// Structural check: a usable name and a 16-element matrix.
    pub fn check(&self, suffix: &str) -> Result<(), PartError> {
        self.resolved_file_name(suffix)?;
        self.transform()?;
        Ok(())
    }
}

/// Document provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMetadata {
    /// Owning scene (opaque).
    #[serde(default)]
    pub scene_id: String,
    /// RFC 3339 serialization timestamp.
    #[serde(default)]
    pub saved_at: String,
}

/// Versioned, persisted representation of a scene's parts.
///
/// Immutable once produced: the deserializer only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format-compatibility tag. Missing reads as empty (pre-versioning).
    #[serde(default)]
    pub version: String,
    /// Parts in replay order.
    pub parts: Vec<PartRecord>,
    /// Owning scene and save time.
    #[serde(default)]
    pub metadata: SceneMetadata,
}

impl SceneDocument {
    /// Current-version document.
    pub fn new(
        scene_id: impl Into<String>,
        saved_at: impl Into<String>,
        parts: Vec<PartRecord>,
    ) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_owned(),
            parts,
            metadata: SceneMetadata {
                scene_id: scene_id.into(),
                saved_at: saved_at.into(),
            },
        }
    }

    /// Whether the version tag is the one this codec writes.
    pub fn is_current_version(&self) -> bool {
        AssemblySettings::recognizes_version(&self.version)
    }

    /// Every structural problem, by part index. Empty when the document is clean.
    pub fn validate(&self, suffix: &str) -> Vec<(usize, PartError)> {
        self.parts
            .iter()
            .enumerate()
            .filter_map(|(index, part)| part.check(suffix).err().map(|err| (index, err)))
            .collect()
    }

    /// Pretty-printed JSON, as persisted.
    pub fn to_json_pretty(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse either layout using default settings.
    pub fn from_json_str(input: &str) -> Result<Self, SceneError> {
        Self::parse(input, &AssemblySettings::default())
    }

    /// Parse either layout: an object with `version` or `metadata` is a full
    /// document, anything else is read as the compact variant.
    pub fn parse(input: &str, settings: &AssemblySettings) -> Result<Self, SceneError> {
        Self::from_value(serde_json::from_str(input)?, settings)
    }

    /// [`Self::parse`] over raw bytes.
    pub fn parse_slice(bytes: &[u8], settings: &AssemblySettings) -> Result<Self, SceneError> {
        Self::from_value(serde_json::from_slice(bytes)?, settings)
    }

    /// [`Self::from_json_str`] over raw bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SceneError> {
        Self::parse_slice(bytes, &AssemblySettings::default())
    }

    /// Compact interchange JSON; part names are file names without `suffix`.
    pub fn to_compact_json(&self, suffix: &str) -> Result<String, SceneError> {
        CompactDocument::from_document(self, suffix).to_json()
    }

    fn from_value(value: Value, settings: &AssemblySettings) -> Result<Self, SceneError> {
        let object = value
            .as_object()
            .ok_or_else(|| SceneError::InvalidDocument("expected a JSON object".into()))?;
        if !object.contains_key("parts") {
            return Err(SceneError::InvalidDocument("missing parts array".into()));
        }
        if object.contains_key("version") || object.contains_key("metadata") {
            Ok(serde_json::from_value(value)?)
        } else {
            let compact: CompactDocument = serde_json::from_value(value)?;
            Ok(compact.into_document(settings, now_rfc3339()?))
        }
    }
}

/// Current UTC time as RFC 3339.
pub(crate) fn now_rfc3339() -> Result<String, SceneError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
