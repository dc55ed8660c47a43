use meetgraph_core::{ChannelEvent, Edge, EdgeId, NodeId};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

use crate::graph::store::GraphStore;

/// Outcome of applying one channel event, so callers can raise render and
/// sound effects without inspecting store internals.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    NodeInserted(NodeId),
    EdgeInserted(EdgeId),
    NodeRemoved(NodeId),
    /// Transient advisory; forwarded to the annotation surface, the store
    /// is untouched.
    Keyword { speaker: String, keyword: String },
    /// Same id re-sent, absorbed silently.
    Duplicate,
    /// Add of a tombstoned node id; the remove arrived first.
    Suppressed,
    /// Edge parked until its missing endpoint arrives.
    Parked,
    /// Remove of an id that never arrived locally.
    Noop,
    /// Malformed payload, dropped before any mutation.
    Rejected,
}

/// Merges the unordered, possibly-duplicated channel stream into the store.
///
/// The transport gives no ordering guarantee across event types, so a
/// remove arriving before its add is tombstoned and the late add is
/// suppressed instead of resurrecting the node. Tombstones and parked
/// edges live for the session lifetime: ids are never reused within a
/// session, so an unbounded window cannot shadow a legitimate future id,
/// and no expiry timer has to outlive the session.
#[derive(Default)]
pub struct SyncReconciler {
    tombstones: HashSet<NodeId>,
    parked: HashMap<NodeId, SmallVec<[Edge; 2]>>,
    parked_ids: HashSet<EdgeId>,
}

impl SyncReconciler {
    pub fn apply(&mut self, store: &mut GraphStore, event: ChannelEvent) -> Applied {
        match event {
            ChannelEvent::NodeAdded(node) => {
                if node.id.0.trim().is_empty() {
                    tracing::warn!("dropping node_added with blank id");
                    return Applied::Rejected;
                }
                if self.tombstones.contains(&node.id) {
                    return Applied::Suppressed;
                }
                let id = node.id.clone();
                if !store.add_node(node) {
                    return Applied::Duplicate;
                }
                self.flush_parked(store, &id);
                Applied::NodeInserted(id)
            }
            ChannelEvent::EdgeAdded(edge) => {
                if edge.from.0.trim().is_empty() || edge.to.0.trim().is_empty() {
                    tracing::warn!(edge = ?edge.id, "dropping edge_added with blank endpoint");
                    return Applied::Rejected;
                }
                if store.contains_edge(&edge.id) || self.parked_ids.contains(&edge.id) {
                    return Applied::Duplicate;
                }
                if store.contains_node(&edge.from) && store.contains_node(&edge.to) {
                    let id = edge.id.clone();
                    store.add_edge(edge);
                    return Applied::EdgeInserted(id);
                }
                let missing = if store.contains_node(&edge.from) {
                    edge.to.clone()
                } else {
                    edge.from.clone()
                };
                self.parked_ids.insert(edge.id.clone());
                self.parked.entry(missing).or_default().push(edge);
                Applied::Parked
            }
            ChannelEvent::NodeRemoved { id } => {
                if id.0.trim().is_empty() {
                    tracing::warn!("dropping node_removed with blank id");
                    return Applied::Rejected;
                }
                self.tombstones.insert(id.clone());
                if store.remove_node(&id) {
                    Applied::NodeRemoved(id)
                } else {
                    Applied::Noop
                }
            }
            ChannelEvent::Keyword { speaker, keyword } => Applied::Keyword { speaker, keyword },
        }
    }

    /// Edges parked on `id` either complete now or re-park on their other
    /// missing endpoint.
    fn flush_parked(&mut self, store: &mut GraphStore, id: &NodeId) {
        let Some(edges) = self.parked.remove(id) else {
            return;
        };
        for edge in edges {
            if store.contains_node(&edge.from) && store.contains_node(&edge.to) {
                self.parked_ids.remove(&edge.id);
                store.add_edge(edge);
            } else {
                let missing = if store.contains_node(&edge.from) {
                    edge.to.clone()
                } else {
                    edge.from.clone()
                };
                self.parked.entry(missing).or_default().push(edge);
            }
        }
    }

    pub fn parked_edge_count(&self) -> usize {
        self.parked_ids.len()
    }

    /// Session teardown: discard tombstones and parked edges.
    pub fn clear(&mut self) {
        self.tombstones.clear();
        self.parked.clear();
        self.parked_ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetgraph_core::Node;

    fn added(id: &str) -> ChannelEvent {
        ChannelEvent::NodeAdded(Node {
            id: NodeId(id.to_string()),
            label: id.to_string(),
            content: String::new(),
            color: "#5A5A5A".to_string(),
            priority: 0,
        })
    }

    fn edge_added(id: u64, from: &str, to: &str) -> ChannelEvent {
        ChannelEvent::EdgeAdded(Edge {
            id: EdgeId::Num(id),
            from: NodeId(from.to_string()),
            to: NodeId(to.to_string()),
        })
    }

    fn removed(id: &str) -> ChannelEvent {
        ChannelEvent::NodeRemoved {
            id: NodeId(id.to_string()),
        }
    }

    #[test]
    fn duplicate_node_add_is_absorbed() {
        let mut store = GraphStore::default();
        let mut rec = SyncReconciler::default();

        assert!(matches!(
            rec.apply(&mut store, added("a")),
            Applied::NodeInserted(_)
        ));
        assert_eq!(rec.apply(&mut store, added("a")), Applied::Duplicate);
        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn remove_before_add_tombstones_the_late_add() {
        let mut store = GraphStore::default();
        let mut rec = SyncReconciler::default();

        assert_eq!(rec.apply(&mut store, removed("5")), Applied::Noop);
        assert_eq!(rec.apply(&mut store, added("5")), Applied::Suppressed);
        assert!(!store.contains_node(&NodeId("5".to_string())));
    }

    #[test]
    fn edge_arriving_before_its_endpoints_is_parked_then_flushed() {
        let mut store = GraphStore::default();
        let mut rec = SyncReconciler::default();

        assert_eq!(rec.apply(&mut store, edge_added(1, "a", "b")), Applied::Parked);
        assert_eq!(store.edges().len(), 0);

        rec.apply(&mut store, added("a"));
        assert_eq!(store.edges().len(), 0, "still one endpoint short");

        rec.apply(&mut store, added("b"));
        assert_eq!(store.edges().len(), 1);
        assert_eq!(rec.parked_edge_count(), 0);
    }

    #[test]
    fn duplicate_edge_add_is_absorbed_even_while_parked() {
        let mut store = GraphStore::default();
        let mut rec = SyncReconciler::default();

        rec.apply(&mut store, edge_added(1, "a", "b"));
        assert_eq!(rec.apply(&mut store, edge_added(1, "a", "b")), Applied::Duplicate);

        rec.apply(&mut store, added("a"));
        rec.apply(&mut store, added("b"));
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn duplicate_free_batches_converge_regardless_of_order() {
        let batch = vec![
            added("a"),
            added("b"),
            added("c"),
            edge_added(1, "a", "b"),
            edge_added(2, "b", "c"),
        ];

        // A few representative permutations, including edges-first.
        let orders: Vec<Vec<usize>> = vec![
            vec![0, 1, 2, 3, 4],
            vec![4, 3, 2, 1, 0],
            vec![3, 4, 0, 1, 2],
            vec![2, 4, 1, 3, 0],
        ];

        let mut fingerprints = Vec::new();
        for order in orders {
            let mut store = GraphStore::default();
            let mut rec = SyncReconciler::default();
            for i in order {
                rec.apply(&mut store, batch[i].clone());
            }
            let mut nodes: Vec<String> =
                store.nodes().iter().map(|n| n.id.0.clone()).collect();
            nodes.sort();
            let mut edges: Vec<String> =
                store.edges().iter().map(|e| format!("{:?}", e.id)).collect();
            edges.sort();
            fingerprints.push((nodes, edges));
        }

        for fp in &fingerprints[1..] {
            assert_eq!(fp, &fingerprints[0]);
        }
    }

    #[test]
    fn keyword_broadcast_never_touches_the_store() {
        let mut store = GraphStore::default();
        let mut rec = SyncReconciler::default();

        let outcome = rec.apply(
            &mut store,
            ChannelEvent::Keyword {
                speaker: "ana".to_string(),
                keyword: "budget".to_string(),
            },
        );
        assert!(matches!(outcome, Applied::Keyword { .. }));
        assert!(store.nodes().is_empty());
        assert!(store.edges().is_empty());
    }

    #[test]
    fn blank_ids_are_rejected_without_mutation() {
        let mut store = GraphStore::default();
        let mut rec = SyncReconciler::default();

        assert_eq!(rec.apply(&mut store, added("  ")), Applied::Rejected);
        assert_eq!(rec.apply(&mut store, edge_added(1, "", "b")), Applied::Rejected);
        assert_eq!(rec.apply(&mut store, removed("")), Applied::Rejected);
        assert!(store.nodes().is_empty());
        assert_eq!(rec.parked_edge_count(), 0);
    }

    #[test]
    fn clear_discards_tombstones() {
        let mut store = GraphStore::default();
        let mut rec = SyncReconciler::default();

        rec.apply(&mut store, removed("5"));
        rec.clear();
        assert!(matches!(
            rec.apply(&mut store, added("5")),
            Applied::NodeInserted(_)
        ));
    }
}
