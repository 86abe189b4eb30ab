// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Display-name ↔ file-reference normalization.
//!
//! Engines report display names with spaces where the file had underscores
//! (`bearing CS` for `bearing_CS.scs`). Both directions of the codec go
//! through [`to_file_name`] so either spelling lands on the same canonical
//! file reference.

/// File suffix carried by every canonical file reference.
pub const DEFAULT_SUFFIX: &str = ".scs";

/// Canonical file reference for a display name.
///
/// Trims the name, keeps its last `/`-separated segment, collapses each
/// whitespace run to a single `_`, then appends `suffix` unless it is already
/// present (ASCII case-insensitive). Idempotent.
pub fn to_file_name(display_name: &str, suffix: &str) -> String {
    let segment = display_name
        .rsplit('/')
        .find(|s| !s.trim().is_empty())
        .unwrap_or("");
    let collapsed = segment.split_whitespace().collect::<Vec<_>>().join("_");
    if has_suffix(&collapsed, suffix) {
        collapsed
    } else {
        collapsed + suffix
    }
}

/// Whether `name` ends with `suffix`, ignoring ASCII case.
pub fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len()
        .checked_sub(suffix.len())
        .and_then(|start| name.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// `file_name` with `suffix` removed (ASCII case-insensitive), for catalog lookups.
pub fn base_name<'a>(file_name: &'a str, suffix: &str) -> &'a str {
    if has_suffix(file_name, suffix) {
        &file_name[..file_name.len() - suffix.len()]
    } else {
        file_name
    }
}
