// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node provenance tracking.
//!
//! The engine does not remember where a node was loaded from, so the
//! session keeps that here. A tracker is only meaningful for the engine
//! session whose ids it holds; [`crate::deserialize_scene`] returns a new one
//! after every load.

use std::collections::BTreeMap;

use assembly_port::NodeId;

/// How a node was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Exact location the node was loaded from.
    pub cad_url: String,
    /// Catalog part (`true`) or user-supplied asset (`false`).
    pub is_preset: bool,
}

impl Provenance {
    /// Provenance of a catalog part.
    pub fn preset(cad_url: impl Into<String>) -> Self {
        Self {
            cad_url: cad_url.into(),
            is_preset: true,
        }
    }

    /// Provenance of a user-supplied asset.
    pub fn uploaded(cad_url: impl Into<String>) -> Self {
        Self {
            cad_url: cad_url.into(),
            is_preset: false,
        }
    }
}

/// Live node id → load origin.
///
/// Plain in-memory map. Callers must not mutate a tracker while a
/// deserialize of the same session is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceTracker {
    entries: BTreeMap<NodeId, Provenance>,
}

impl ProvenanceTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where `node` came from. Returns the previous entry, if any.
    pub fn record(&mut self, node: NodeId, provenance: Provenance) -> Option<Provenance> {
        self.entries.insert(node, provenance)
    }

    /// Provenance of `node`.
    pub fn get(&self, node: NodeId) -> Option<&Provenance> {
        self.entries.get(&node)
    }

    /// Forget `node` (e.g. after the user deleted it).
    pub fn remove(&mut self, node: NodeId) -> Option<Provenance> {
        self.entries.remove(&node)
    }

    /// Whether `node` is tracked.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    /// Number of tracked nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked entries in ascending node-id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Provenance)> + '_ {
        self.entries.iter().map(|(id, p)| (*id, p))
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<(NodeId, Provenance)> for ProvenanceTracker {
    fn from_iter<T: IntoIterator<Item = (NodeId, Provenance)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(NodeId, Provenance)> for ProvenanceTracker {
    fn extend<T: IntoIterator<Item = (NodeId, Provenance)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_replaces_previous_entry() {
        let mut tracker = ProvenanceTracker::new();
        assert!(tracker.record(NodeId(5), Provenance::preset("/preset_parts/axe.scs")).is_none());
        let previous = tracker.record(NodeId(5), Provenance::uploaded("https://cdn/a.scs"));
        assert_eq!(previous, Some(Provenance::preset("/preset_parts/axe.scs")));
        assert_eq!(tracker.len(), 1);
        assert!(!tracker.get(NodeId(5)).unwrap().is_preset);
    }

    #[test]
    fn remove_and_clear() {
        let mut tracker: ProvenanceTracker = [
            (NodeId(1), Provenance::preset("a")),
            (NodeId(2), Provenance::uploaded("b")),
        ]
        .into_iter()
        .collect();
        assert!(tracker.contains(NodeId(2)));
        assert_eq!(tracker.remove(NodeId(2)), Some(Provenance::uploaded("b")));
        assert!(!tracker.contains(NodeId(2)));
        tracker.clear();
        assert!(tracker.is_empty());
    }

    #[test]
    fn iteration_is_ordered_by_node_id() {
        let mut tracker = ProvenanceTracker::new();
        tracker.record(NodeId(9), Provenance::preset("c"));
        tracker.record(NodeId(3), Provenance::preset("a"));
        tracker.extend([(NodeId(6), Provenance::preset("b"))]);
        let ids: Vec<_> = tracker.iter().map(|(id, _)| id.get()).collect();
        assert_eq!(ids, vec![3, 6, 9]);
    }
}
