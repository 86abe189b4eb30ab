// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Engine port traits consumed by the scene codec.

use core::future::Future;
use core::time::Duration;

use crate::{EngineError, NodeId, NodeMatrix};

/// Engine handle.
///
/// Owns (at most) one active model plus the view that displays it.
///
/// # Design
///
/// This trait is a hexagonal port. The codec reads and drives the engine
/// through it; adapters (web viewer bridge, headless mock) implement it.
/// The codec never holds onto the handle between calls.
pub trait CadViewer {
    /// Node graph type exposed by this engine.
    type Model: SceneModel;

    /// Active model, or `None` while the engine is still initializing.
    fn model(&self) -> Option<&Self::Model>;

    /// Mutable access to the active model.
    fn model_mut(&mut self) -> Option<&mut Self::Model>;

    /// Fit the camera to all content.
    ///
    /// Advisory and fire-and-forget: the adapter may defer the fit by
    /// `settle` so the engine can finish its own bookkeeping. Must not block.
    fn fit_view_to_all(&mut self, settle: Duration);
}

/// Node graph of the active model.
pub trait SceneModel {
    /// Scene root; top-level parts are its immediate children.
    fn root_node(&self) -> NodeId;

    /// Immediate children of `node`, in engine order.
    fn node_children(&self, node: NodeId) -> Vec<NodeId>;

    /// Display name. `None` (or an empty string) means unnamed.
    fn node_name(&self, node: NodeId) -> Option<String>;

    /// Raw transform values. Well-behaved engines return 16 values;
    /// callers must not assume it.
    fn node_matrix(&self, node: NodeId) -> Result<Vec<f64>, EngineError>;

    /// Replace the node's transform.
    fn set_node_matrix(&mut self, node: NodeId, matrix: &NodeMatrix) -> Result<(), EngineError>;

    /// Display visibility of `node`.
    fn node_visibility(&self, node: NodeId) -> Result<bool, EngineError>;

    /// Set display visibility of every node in `nodes`.
    fn set_nodes_visibility(&mut self, nodes: &[NodeId], visible: bool)
        -> Result<(), EngineError>;

    /// Load a subtree from `url` beneath `parent`.
    ///
    /// Resolves to the ids of the created top-level nodes. Multi-body files
    /// may produce more than one; an empty list means nothing was created.
    fn load_subtree_from_file(
        &mut self,
        parent: NodeId,
        url: &str,
    ) -> impl Future<Output = Result<Vec<NodeId>, EngineError>>;
}
