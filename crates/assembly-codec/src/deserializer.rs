// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene Document → rebuilt engine graph.
//!
//! Records are replayed strictly in document order, one load at a time.
//! The engine is not known to tolerate concurrent subtree loads, and a fixed
//! order keeps node-id assignment reproducible for log correlation.
//!
//! Cancellation is not supported. A caller abandoning a load drops the
//! future; nodes created so far stay in the engine.

use assembly_port::{CadViewer, NodeId, SceneModel};
use tracing::{debug, error, info, warn};

use crate::document::{PartRecord, SceneDocument, DOCUMENT_VERSION};
use crate::error::{PartError, SceneError};
use crate::normalize::base_name;
use crate::provenance::{Provenance, ProvenanceTracker};
use crate::settings::AssemblySettings;

/// What happened to one record, keyed by its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOutcome {
    /// The part was loaded and placed.
    Loaded {
        /// Index of the record in the document.
        index: usize,
        /// Node id recorded when the document was written (historical).
        previous_node_id: i64,
        /// Node id assigned by this load.
        node_id: NodeId,
        /// URL the part was loaded from.
        cad_url: String,
        /// Further top-level nodes created by a multi-body file. Not tracked.
        extra_nodes: Vec<NodeId>,
    },
    /// The record was skipped.
    Skipped {
        /// Index of the record in the document.
        index: usize,
        /// Node id recorded when the document was written (historical).
        previous_node_id: i64,
        /// File name (or name) of the record, for messages.
        file_name: String,
        /// Why it was skipped.
        reason: PartError,
        /// Nodes the engine created before placement failed. They stay in the
        /// engine untracked; the caller decides whether to remove them.
        created_nodes: Vec<NodeId>,
    },
}

impl PartOutcome {
    /// Whether the record produced a tracked node.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Per-record results of one deserialize pass, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// One outcome per input record.
    pub outcomes: Vec<PartOutcome>,
    /// Set when the document version was not recognized.
    pub version_warning: Option<String>,
}

impl LoadReport {
    /// Number of records attempted (always the document's part count).
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of records that produced a node.
    pub fn loaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    /// Whether any record was skipped.
    pub fn is_partial(&self) -> bool {
        self.loaded() < self.attempted()
    }

    /// Skipped records.
    pub fn skipped(&self) -> impl Iterator<Item = &PartOutcome> + '_ {
        self.outcomes.iter().filter(|o| !o.is_loaded())
    }

    /// Old id → new id for every loaded record.
    pub fn remapped_ids(&self) -> Vec<(i64, NodeId)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                PartOutcome::Loaded {
                    previous_node_id,
                    node_id,
                    ..
                } => Some((*previous_node_id, *node_id)),
                PartOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    /// User-facing status line, e.g. `Loaded 2 of 3 parts`.
    pub fn status_message(&self) -> String {
        format!("Loaded {} of {} parts", self.loaded(), self.attempted())
    }
}

/// Result of a deserialize pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedScene {
    /// Provenance of every node created by this pass, keyed by new ids.
    pub tracker: ProvenanceTracker,
    /// Per-record outcomes.
    pub report: LoadReport,
}

impl LoadedScene {
    /// Drop the report and keep the tracker for the editing session.
    pub fn into_tracker(self) -> ProvenanceTracker {
        self.tracker
    }
}

struct PlacedPart {
    node_id: NodeId,
    extra_nodes: Vec<NodeId>,
    provenance: Provenance,
}

struct PlaceFailure {
    reason: PartError,
    created_nodes: Vec<NodeId>,
}

impl From<PartError> for PlaceFailure {
    fn from(reason: PartError) -> Self {
        Self {
            reason,
            created_nodes: Vec::new(),
        }
    }
}

/// Rebuild `document`'s parts under the scene root.
///
/// Fails only when the viewer has no model, or when `strict_version` is set
/// and the version is unrecognized. Per-record failures are logged, reported
/// and leave the record out of the returned tracker; the remaining records
/// are still attempted. Finishes with an advisory fit-view request.
pub async fn deserialize_scene<V: CadViewer>(
    viewer: &mut V,
    document: &SceneDocument,
    settings: &AssemblySettings,
) -> Result<LoadedScene, SceneError> {
    let model = viewer.model_mut().ok_or(SceneError::ModelNotReady)?;
    let version_warning = check_version(document, settings)?;
    let root = model.root_node();

    info!(
        scene_id = %document.metadata.scene_id,
        parts = document.parts.len(),
        "deserializing scene"
    );

    let mut scene = LoadedScene {
        tracker: ProvenanceTracker::new(),
        report: LoadReport {
            outcomes: Vec::with_capacity(document.parts.len()),
            version_warning,
        },
    };

    for (index, part) in document.parts.iter().enumerate() {
        let outcome = match place_part(model, root, part, settings).await {
            Ok(placed) => {
                debug!(
                    index,
                    previous_node_id = part.node_id,
                    node = %placed.node_id,
                    url = %placed.provenance.cad_url,
                    "part loaded and positioned"
                );
                let cad_url = placed.provenance.cad_url.clone();
                scene.tracker.record(placed.node_id, placed.provenance);
                PartOutcome::Loaded {
                    index,
                    previous_node_id: part.node_id,
                    node_id: placed.node_id,
                    cad_url,
                    extra_nodes: placed.extra_nodes,
                }
            }
            Err(PlaceFailure {
                reason,
                created_nodes,
            }) => {
                match &reason {
                    PartError::MissingName | PartError::MatrixLength { .. } => warn!(
                        index,
                        part = part.label(),
                        error = %reason,
                        "skipping malformed part"
                    ),
                    _ if !created_nodes.is_empty() => error!(
                        index,
                        part = part.label(),
                        error = %reason,
                        orphaned = ?created_nodes,
                        "failed to place loaded part; nodes left untracked"
                    ),
                    _ => error!(index, part = part.label(), error = %reason, "failed to load part"),
                }
                PartOutcome::Skipped {
                    index,
                    previous_node_id: part.node_id,
                    file_name: part.label().to_owned(),
                    reason,
                    created_nodes,
                }
            }
        };
        scene.report.outcomes.push(outcome);
    }

    viewer.fit_view_to_all(settings.fit_view_settle());
    info!(status = %scene.report.status_message(), "scene deserialization complete");
    Ok(scene)
}

fn check_version(
    document: &SceneDocument,
    settings: &AssemblySettings,
) -> Result<Option<String>, SceneError> {
    if document.is_current_version() {
        return Ok(None);
    }
    if settings.strict_version {
        return Err(SceneError::VersionMismatch {
            found: document.version.clone(),
            expected: DOCUMENT_VERSION,
        });
    }
    warn!(version = %document.version, "unrecognized document version; loading best-effort");
    Ok(Some(format!(
        "unrecognized document version {:?}; loaded best-effort",
        document.version
    )))
}

/// Load URL precedence: recorded `cadUrl`, then the catalog path for a known
/// preset, then the catalog path anyway (with a warning).
fn resolve_url(part: &PartRecord, file_name: &str, settings: &AssemblySettings) -> String {
    if let Some(url) = part.cad_url.as_deref().filter(|url| !url.is_empty()) {
        return url.to_owned();
    }
    if !settings.is_preset_file(file_name) {
        warn!(file_name, "unknown part source; trying the preset catalog path");
    }
    settings.presets.catalog_url(file_name)
}

async fn place_part<M: SceneModel>(
    model: &mut M,
    root: NodeId,
    part: &PartRecord,
    settings: &AssemblySettings,
) -> Result<PlacedPart, PlaceFailure> {
    let file_name = part.resolved_file_name(&settings.suffix)?;
    let matrix = part.transform()?;
    let url = resolve_url(part, &file_name, settings);

    debug!(%url, "loading part");
    let node_ids = model
        .load_subtree_from_file(root, &url)
        .await
        .map_err(|source| PartError::AssetLoadFailure {
            url: url.clone(),
            source,
        })?;
    let Some((&node_id, extra)) = node_ids.split_first() else {
        return Err(PartError::EmptyLoad { url }.into());
    };
    if !extra.is_empty() {
        // TODO: track sibling bodies so they can be moved/deleted with the part.
        warn!(
            %url,
            node = %node_id,
            extra = extra.len(),
            "multi-body load; only the first node is tracked"
        );
    }

    let applied = model
        .set_node_matrix(node_id, &matrix)
        .and_then(|()| model.set_nodes_visibility(&[node_id], part.visible));
    if let Err(source) = applied {
        return Err(PlaceFailure {
            reason: PartError::Engine(source),
            created_nodes: node_ids,
        });
    }

    let is_preset = part
        .is_preset
        .unwrap_or_else(|| settings.presets.contains(base_name(&file_name, &settings.suffix)));
    Ok(PlacedPart {
        node_id,
        extra_nodes: node_ids[1..].to_vec(),
        provenance: Provenance {
            cad_url: url,
            is_preset,
        },
    })
}
