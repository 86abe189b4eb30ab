// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Live engine graph → Scene Document.
//!
//! Synchronous: reads already-resident engine state, no suspension points.

use assembly_port::{CadViewer, NodeId, NodeMatrix, SceneModel};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::document::{PartRecord, SceneDocument};
use crate::error::{PartError, SceneError};
use crate::provenance::ProvenanceTracker;
use crate::settings::AssemblySettings;

/// Serialize the scene's top-level parts, stamped with the current UTC time.
///
/// `tracker` is a provenance hint for the current session; nodes it does not
/// know fall back to a catalog membership test on their base name.
pub fn serialize_scene<V: CadViewer>(
    viewer: &V,
    scene_id: &str,
    tracker: Option<&ProvenanceTracker>,
    settings: &AssemblySettings,
) -> Result<SceneDocument, SceneError> {
    serialize_scene_at(viewer, scene_id, tracker, settings, OffsetDateTime::now_utc())
}

/// [`serialize_scene`] with an explicit save timestamp.
///
/// Fails only when the viewer has no model. Unnamed or malformed nodes are
/// logged and left out; output order is the engine's child order.
pub fn serialize_scene_at<V: CadViewer>(
    viewer: &V,
    scene_id: &str,
    tracker: Option<&ProvenanceTracker>,
    settings: &AssemblySettings,
    saved_at: OffsetDateTime,
) -> Result<SceneDocument, SceneError> {
    let model = viewer.model().ok_or(SceneError::ModelNotReady)?;
    let saved_at = saved_at.format(&Rfc3339)?;
    let children = model.node_children(model.root_node());

    let mut parts = Vec::with_capacity(children.len());
    for node in children {
        match serialize_part(model, node, tracker, settings) {
            Ok(part) => {
                debug!(
                    node = %node,
                    file_name = %part.file_name,
                    is_preset = ?part.is_preset,
                    "serialized part"
                );
                parts.push(part);
            }
            Err(err) => warn!(node = %node, error = %err, "skipping node"),
        }
    }

    info!(scene_id, parts = parts.len(), "scene serialized");
    Ok(SceneDocument::new(scene_id, saved_at, parts))
}

fn serialize_part<M: SceneModel>(
    model: &M,
    node: NodeId,
    tracker: Option<&ProvenanceTracker>,
    settings: &AssemblySettings,
) -> Result<PartRecord, PartError> {
    let name = model
        .node_name(node)
        .filter(|name| !name.trim().is_empty())
        .ok_or(PartError::MissingName)?;
    let raw = model.node_matrix(node)?;
    let matrix =
        NodeMatrix::try_from_slice(&raw).ok_or(PartError::MatrixLength { found: raw.len() })?;
    let visible = model.node_visibility(node)?;
    let file_name = settings.file_name_for(&name);

    let known = tracker.and_then(|t| t.get(node));
    let is_preset = known.map_or_else(|| settings.is_preset_file(&file_name), |p| p.is_preset);
    let cad_url = known
        .map(|p| p.cad_url.clone())
        .filter(|url| !url.is_empty());

    Ok(PartRecord {
        node_id: node.get(),
        name,
        file_name,
        matrix: matrix.0.to_vec(),
        visible,
        cad_url,
        is_preset: Some(is_preset),
    })
}

/// Canonical file names of every named top-level part, in engine order.
pub fn scene_part_files<V: CadViewer>(
    viewer: &V,
    settings: &AssemblySettings,
) -> Result<Vec<String>, SceneError> {
    let model = viewer.model().ok_or(SceneError::ModelNotReady)?;
    Ok(model
        .node_children(model.root_node())
        .into_iter()
        .filter_map(|node| {
            let name = model.node_name(node).filter(|n| !n.trim().is_empty());
            if name.is_none() {
                warn!(node = %node, "skipping node without a name");
            }
            name
        })
        .map(|name| settings.file_name_for(&name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_viewer::MockViewer;
    use crate::provenance::Provenance;
    use time::macros::datetime;

    #[test]
    fn model_not_ready_is_fatal() {
        let viewer = MockViewer::not_ready();
        let err = serialize_scene(&viewer, "s", None, &AssemblySettings::default()).unwrap_err();
        assert!(matches!(err, SceneError::ModelNotReady));
        let err = scene_part_files(&viewer, &AssemblySettings::default()).unwrap_err();
        assert!(matches!(err, SceneError::ModelNotReady));
    }

    #[test]
    fn empty_scene_yields_no_parts() {
        let viewer = MockViewer::new();
        let doc = serialize_scene(&viewer, "empty", None, &AssemblySettings::default()).unwrap();
        assert!(doc.parts.is_empty());
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.metadata.scene_id, "empty");
    }

    #[test]
    fn records_follow_engine_order_and_timestamp() {
        let mut viewer = MockViewer::new();
        let model = viewer.model_mut().unwrap();
        model.add_part(Some("housing"), NodeMatrix::IDENTITY, true);
        model.add_part(Some("bearing CS"), NodeMatrix::translation(0.0, 5.0, 0.0), false);

        let doc = serialize_scene_at(
            &viewer,
            "s",
            None,
            &AssemblySettings::default(),
            datetime!(2025-03-04 05:06:07 UTC),
        )
        .unwrap();
        assert_eq!(doc.metadata.saved_at, "2025-03-04T05:06:07Z");
        let names: Vec<_> = doc.parts.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["housing.scs", "bearing_CS.scs"]);
        assert_eq!(doc.parts[1].name, "bearing CS");
        assert!(!doc.parts[1].visible);
        assert_eq!(doc.parts[1].matrix[13], 5.0);
    }

    #[test]
    fn unnamed_and_malformed_nodes_are_skipped() {
        let mut viewer = MockViewer::new();
        let model = viewer.model_mut().unwrap();
        model.add_part(None, NodeMatrix::IDENTITY, true);
        model.add_part(Some(""), NodeMatrix::IDENTITY, true);
        let bad = model.add_part(Some("warped"), NodeMatrix::IDENTITY, true);
        model.set_raw_matrix(bad, vec![1.0; 12]);
        model.add_part(Some("axe"), NodeMatrix::IDENTITY, true);

        let doc = serialize_scene(&viewer, "s", None, &AssemblySettings::default()).unwrap();
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].file_name, "axe.scs");
    }

    #[test]
    fn tracker_wins_over_catalog_fallback() {
        let mut viewer = MockViewer::new();
        let model = viewer.model_mut().unwrap();
        let uploaded_axe = model.add_part(Some("axe"), NodeMatrix::IDENTITY, true);
        let plain_axe = model.add_part(Some("axe"), NodeMatrix::IDENTITY, true);
        let unknown = model.add_part(Some("widget"), NodeMatrix::IDENTITY, true);

        let mut tracker = ProvenanceTracker::new();
        tracker.record(uploaded_axe, Provenance::uploaded("https://cdn.example/u/axe.scs"));

        let doc =
            serialize_scene(&viewer, "s", Some(&tracker), &AssemblySettings::default()).unwrap();
        let by_id = |id: NodeId| doc.parts.iter().find(|p| p.node_id == id.get()).unwrap();

        let first = by_id(uploaded_axe);
        assert_eq!(first.is_preset, Some(false));
        assert_eq!(first.cad_url.as_deref(), Some("https://cdn.example/u/axe.scs"));

        let second = by_id(plain_axe);
        assert_eq!(second.is_preset, Some(true));
        assert_eq!(second.cad_url, None);

        assert_eq!(by_id(unknown).is_preset, Some(false));
    }

    #[test]
    fn nested_nodes_are_not_parts() {
        let mut viewer = MockViewer::new();
        let model = viewer.model_mut().unwrap();
        let part = model.add_part(Some("assembly"), NodeMatrix::IDENTITY, true);
        model.add_child(part, Some("screw"));

        let files = scene_part_files(&viewer, &AssemblySettings::default()).unwrap();
        assert_eq!(files, vec!["assembly.scs"]);
        let doc = serialize_scene(&viewer, "s", None, &AssemblySettings::default()).unwrap();
        assert_eq!(doc.parts.len(), 1);
    }
}
