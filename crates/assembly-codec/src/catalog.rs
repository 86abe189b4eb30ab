// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Built-in preset part catalog.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Base names shipped with the default catalog.
const DEFAULT_PRESETS: [&str; 4] = ["axe", "bearing_CS", "bearing_pr_dw", "bearing_pr_up"];

/// Known preset parts and where the catalog serves them from.
///
/// Passed into every codec operation instead of living in a global, so
/// callers can vary the catalog without touching the codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetCatalog {
    /// URL prefix for catalog files (e.g. `/preset_parts/`).
    pub base_path: String,
    /// Base names (no suffix) of the catalog parts.
    pub names: BTreeSet<String>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new("/preset_parts/", DEFAULT_PRESETS)
    }
}

impl PresetCatalog {
    /// Create a catalog served from `base_path`.
    pub fn new<I, S>(base_path: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_path: base_path.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Catalog with no known presets.
    pub fn empty(base_path: impl Into<String>) -> Self {
        Self::new(base_path, core::iter::empty::<String>())
    }

    /// Whether `base_name` (file name without suffix) is a catalog part.
    pub fn contains(&self, base_name: &str) -> bool {
        self.names.contains(base_name)
    }

    /// Catalog location for `file_name`.
    pub fn catalog_url(&self, file_name: &str) -> String {
        if self.base_path.is_empty() || self.base_path.ends_with('/') {
            format!("{}{file_name}", self.base_path)
        } else {
            format!("{}/{file_name}", self.base_path)
        }
    }
}
