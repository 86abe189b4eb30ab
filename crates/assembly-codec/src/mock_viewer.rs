// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock viewer for headless testing of the codec.
//!
//! MockModel keeps the node graph in a BTreeMap without any rendering.
//! Use it to verify serialize/deserialize behavior and load sequencing.

use core::future::{ready, Future};
use core::time::Duration;
use std::collections::{BTreeMap, HashMap, HashSet};

use assembly_port::{CadViewer, EngineError, NodeId, NodeMatrix, SceneModel};

/// Node state tracked by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    /// Display name (`None` = unnamed).
    pub name: Option<String>,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in insertion order.
    pub children: Vec<NodeId>,
    /// Raw transform values.
    pub matrix: Vec<f64>,
    /// Display visibility.
    pub visible: bool,
    /// URL the node was loaded from, if it came from a load.
    pub source_url: Option<String>,
}

impl MockNode {
    fn new(name: Option<String>, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            matrix: NodeMatrix::IDENTITY.0.to_vec(),
            visible: true,
            source_url: None,
        }
    }
}

/// Asset the mock can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockAsset {
    /// Display name the engine reports for the first body.
    pub display_name: String,
    /// Number of top-level nodes a load creates (0 = loads nothing).
    pub bodies: usize,
}

/// Mock node graph.
///
/// Loads succeed for registered URLs (or any URL in `accept_any` mode) and
/// fail with [`EngineError::LoadRejected`] otherwise. Like real engines, the
/// display name of a loaded part uses spaces where the file name had
/// underscores.
#[derive(Debug, Clone)]
pub struct MockModel {
    root: NodeId,
    next_id: i64,
    nodes: BTreeMap<NodeId, MockNode>,
    assets: HashMap<String, MockAsset>,
    rejected: HashSet<String>,
    locked: HashSet<String>,
    accept_any: bool,
    load_calls: Vec<String>,
    visibility_calls: Vec<(Vec<NodeId>, bool)>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModel {
    /// Empty model: root is node 0, new nodes start at 1.
    pub fn new() -> Self {
        Self::with_first_id(1)
    }

    /// Empty model whose new nodes start at `first_id`.
    ///
    /// Use distinct values to simulate separate engine sessions.
    pub fn with_first_id(first_id: i64) -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, MockNode::new(Some("root".into()), None));
        Self {
            root,
            next_id: first_id.max(1),
            nodes,
            assets: HashMap::new(),
            rejected: HashSet::new(),
            locked: HashSet::new(),
            accept_any: false,
            load_calls: Vec::new(),
            visibility_calls: Vec::new(),
        }
    }

    /// Load any unregistered, non-rejected URL as a single body.
    pub fn accept_any_url(&mut self) {
        self.accept_any = true;
    }

    /// Make `url` loadable, creating one node named `display_name`.
    pub fn register_asset(&mut self, url: impl Into<String>, display_name: impl Into<String>) {
        self.register_multi_body(url, display_name, 1);
    }

    /// Make `url` loadable, creating `bodies` sibling nodes.
    pub fn register_multi_body(
        &mut self,
        url: impl Into<String>,
        display_name: impl Into<String>,
        bodies: usize,
    ) {
        self.assets.insert(
            url.into(),
            MockAsset {
                display_name: display_name.into(),
                bodies,
            },
        );
    }

    /// Make `url` load successfully but create no nodes.
    pub fn register_empty(&mut self, url: impl Into<String>) {
        self.register_multi_body(url, "", 0);
    }

    /// Make every load of `url` fail.
    pub fn reject_url(&mut self, url: impl Into<String>) {
        self.rejected.insert(url.into());
    }

    /// Let loads of `url` succeed but make every later transform or
    /// visibility change on the created nodes fail.
    pub fn lock_nodes_from(&mut self, url: impl Into<String>) {
        self.locked.insert(url.into());
    }

    /// Place a part directly under the root (as a user drag-in would).
    pub fn add_part(&mut self, name: Option<&str>, matrix: NodeMatrix, visible: bool) -> NodeId {
        let id = self.insert_node(self.root, name.map(str::to_owned));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.matrix = matrix.0.to_vec();
            node.visible = visible;
        }
        id
    }

    /// Add a nested node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: Option<&str>) -> NodeId {
        self.insert_node(parent, name.map(str::to_owned))
    }

    /// Overwrite a node's transform with arbitrary values.
    pub fn set_raw_matrix(&mut self, node: NodeId, values: Vec<f64>) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.matrix = values;
        }
    }

    /// Remove `node` and its subtree.
    pub fn remove_node(&mut self, node: NodeId) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        if let Some(parent) = removed.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
        for child in removed.children {
            self.remove_node(child);
        }
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&MockNode> {
        self.nodes.get(&id)
    }

    /// Number of top-level parts.
    pub fn part_count(&self) -> usize {
        self.nodes.get(&self.root).map_or(0, |root| root.children.len())
    }

    /// Every URL passed to `load_subtree_from_file`, in call order.
    pub fn load_calls(&self) -> &[String] {
        &self.load_calls
    }

    /// Every `set_nodes_visibility` call, in order.
    pub fn visibility_calls(&self) -> &[(Vec<NodeId>, bool)] {
        &self.visibility_calls
    }

    fn insert_node(&mut self, parent: NodeId, name: Option<String>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, MockNode::new(name, Some(parent)));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MockNode, EngineError> {
        let node = self.nodes.get_mut(&id).ok_or(EngineError::NodeNotFound(id))?;
        let locked = node
            .source_url
            .as_ref()
            .is_some_and(|url| self.locked.contains(url));
        if locked {
            return Err(EngineError::Backend(format!("node {id} is locked")));
        }
        Ok(node)
    }

    fn load_now(&mut self, parent: NodeId, url: &str) -> Result<Vec<NodeId>, EngineError> {
        self.load_calls.push(url.to_owned());
        if !self.nodes.contains_key(&parent) {
            return Err(EngineError::NodeNotFound(parent));
        }
        if self.rejected.contains(url) {
            return Err(rejected(url, "simulated load failure"));
        }
        let asset = match self.assets.get(url) {
            Some(asset) => asset.clone(),
            None if self.accept_any => MockAsset {
                display_name: display_name_for(url),
                bodies: 1,
            },
            None => return Err(rejected(url, "asset not found")),
        };

        let ids = (0..asset.bodies)
            .map(|body| {
                let name = if body == 0 {
                    asset.display_name.clone()
                } else {
                    format!("{} body {body}", asset.display_name)
                };
                let id = self.insert_node(parent, Some(name));
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.source_url = Some(url.to_owned());
                }
                id
            })
            .collect();
        Ok(ids)
    }
}

fn rejected(url: &str, reason: &str) -> EngineError {
    EngineError::LoadRejected {
        url: url.to_owned(),
        reason: reason.to_owned(),
    }
}

/// `/preset_parts/bearing_CS.scs` → `bearing CS`.
fn display_name_for(url: &str) -> String {
    let file = url.rsplit('/').next().unwrap_or(url);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    stem.replace('_', " ")
}

impl SceneModel for MockModel {
    fn root_node(&self) -> NodeId {
        self.root
    }

    fn node_children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn node_name(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node).and_then(|n| n.name.clone())
    }

    fn node_matrix(&self, node: NodeId) -> Result<Vec<f64>, EngineError> {
        self.nodes
            .get(&node)
            .map(|n| n.matrix.clone())
            .ok_or(EngineError::NodeNotFound(node))
    }

    fn set_node_matrix(&mut self, node: NodeId, matrix: &NodeMatrix) -> Result<(), EngineError> {
        self.node_mut(node)?.matrix = matrix.0.to_vec();
        Ok(())
    }

    fn node_visibility(&self, node: NodeId) -> Result<bool, EngineError> {
        self.nodes
            .get(&node)
            .map(|n| n.visible)
            .ok_or(EngineError::NodeNotFound(node))
    }

    fn set_nodes_visibility(
        &mut self,
        nodes: &[NodeId],
        visible: bool,
    ) -> Result<(), EngineError> {
        self.visibility_calls.push((nodes.to_vec(), visible));
        for &node in nodes {
            self.node_mut(node)?.visible = visible;
        }
        Ok(())
    }

    fn load_subtree_from_file(
        &mut self,
        parent: NodeId,
        url: &str,
    ) -> impl Future<Output = Result<Vec<NodeId>, EngineError>> {
        ready(self.load_now(parent, url))
    }
}

/// Mock viewer: an optional model plus a log of fit-view requests.
#[derive(Debug, Clone, Default)]
pub struct MockViewer {
    model: Option<MockModel>,
    fit_view_requests: Vec<Duration>,
}

impl MockViewer {
    /// Viewer with an empty, ready model.
    pub fn new() -> Self {
        Self::with_model(MockModel::new())
    }

    /// Viewer wrapping `model`.
    pub fn with_model(model: MockModel) -> Self {
        Self {
            model: Some(model),
            fit_view_requests: Vec::new(),
        }
    }

    /// Viewer whose model is still initializing.
    pub fn not_ready() -> Self {
        Self::default()
    }

    /// Ready viewer that loads any URL as a single body.
    pub fn accepting_any() -> Self {
        let mut model = MockModel::new();
        model.accept_any_url();
        Self::with_model(model)
    }

    /// Settle delays of every fit-view request, in order.
    pub fn fit_view_requests(&self) -> &[Duration] {
        &self.fit_view_requests
    }
}

impl CadViewer for MockViewer {
    type Model = MockModel;

    fn model(&self) -> Option<&MockModel> {
        self.model.as_ref()
    }

    fn model_mut(&mut self) -> Option<&mut MockModel> {
        self.model.as_mut()
    }

    fn fit_view_to_all(&mut self, settle: Duration) {
        self.fit_view_requests.push(settle);
    }
}
