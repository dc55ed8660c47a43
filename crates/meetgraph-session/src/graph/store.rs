use meetgraph_core::{Edge, EdgeId, Node, NodeId};
use std::collections::HashSet;

/// Canonical node/edge sets for one meeting session.
///
/// Insertion order is preserved so list rendering stays deterministic.
/// Duplicate ids are absorbed as no-ops (duplication is expected under
/// retry/reconnect), and removing a node leaves its edges in place —
/// dangling edges are a visible, tolerated state, filtered or marked by
/// the renderer rather than cascaded here.
#[derive(Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_ids: HashSet<NodeId>,
    edge_ids: HashSet<EdgeId>,
}

impl GraphStore {
    /// Returns true if the node was inserted, false if the id was already
    /// present. Never fails.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.node_ids.contains(&node.id) {
            return false;
        }
        self.node_ids.insert(node.id.clone());
        self.nodes.push(node);
        true
    }

    /// Same idempotent-insert contract as `add_node`, keyed by edge id.
    /// Endpoint existence is not checked here; the reconciler parks edges
    /// whose endpoints have not arrived yet.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.edge_ids.contains(&edge.id) {
            return false;
        }
        self.edge_ids.insert(edge.id.clone());
        self.edges.push(edge);
        true
    }

    /// Returns true if a node was actually removed. Edges referencing the
    /// node are kept.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        if !self.node_ids.remove(id) {
            return false;
        }
        self.nodes.retain(|n| n.id != *id);
        true
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_ids.contains(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge_ids.contains(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    /// Nodes in insertion order. Read-only view.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order. Read-only view.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// An edge is dangling when either endpoint is no longer present.
    pub fn is_dangling(&self, edge: &Edge) -> bool {
        !self.node_ids.contains(&edge.from) || !self.node_ids.contains(&edge.to)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.node_ids.clear();
        self.edge_ids.clear();
    }
}
