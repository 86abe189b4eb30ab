// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Codec settings shared by the serializer and deserializer.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::PresetCatalog;
use crate::document::DOCUMENT_VERSION;
use crate::normalize::{base_name, to_file_name, DEFAULT_SUFFIX};

/// Saved codec settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    /// Canonical file suffix.
    pub suffix: String,
    /// Preset catalog used for provenance fallback and URL synthesis.
    pub presets: PresetCatalog,
    /// Settle delay handed to the viewer's fit-view request (milliseconds).
    pub fit_view_settle_ms: u64,
    /// Reject documents with an unrecognized `version` instead of loading best-effort.
    pub strict_version: bool,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_owned(),
            presets: PresetCatalog::default(),
            fit_view_settle_ms: 200,
            strict_version: false,
        }
    }
}

impl AssemblySettings {
    /// Settings using `presets` and defaults for everything else.
    pub fn with_presets(presets: PresetCatalog) -> Self {
        Self {
            presets,
            ..Self::default()
        }
    }

    /// Settle delay as a [`Duration`].
    pub fn fit_view_settle(&self) -> Duration {
        Duration::from_millis(self.fit_view_settle_ms)
    }

    /// Canonical file reference for a display name.
    pub fn file_name_for(&self, display_name: &str) -> String {
        to_file_name(display_name, &self.suffix)
    }

    /// Whether a canonical file name refers to a catalog part.
    pub fn is_preset_file(&self, file_name: &str) -> bool {
        self.presets.contains(base_name(file_name, &self.suffix))
    }

    /// Whether documents tagged `version` are read without a warning.
    pub fn recognizes_version(version: &str) -> bool {
        version == DOCUMENT_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalog_conventions() {
        let settings = AssemblySettings::default();
        assert_eq!(settings.suffix, ".scs");
        assert_eq!(settings.fit_view_settle(), Duration::from_millis(200));
        assert!(!settings.strict_version);
        assert!(settings.is_preset_file("bearing_pr_up.scs"));
        assert!(!settings.is_preset_file("housing.scs"));
    }

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let settings: AssemblySettings =
            serde_json::from_str(r#"{"strict_version":true}"#).unwrap();
        assert!(settings.strict_version);
        assert_eq!(settings.presets, PresetCatalog::default());
        assert_eq!(settings.fit_view_settle_ms, 200);
    }

    #[test]
    fn file_name_for_uses_configured_suffix() {
        let settings = AssemblySettings {
            suffix: ".step".into(),
            ..AssemblySettings::default()
        };
        assert_eq!(settings.file_name_for("gear box"), "gear_box.step");
    }
}
