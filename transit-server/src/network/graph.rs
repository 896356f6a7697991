//! The transit multigraph.
//!
//! Nodes are stops and stations; edges are directed, mode-labelled links.
//! Several edges may join the same ordered pair (a bus link and a walking
//! link between two nearby stops, for instance). The graph is built once
//! from the network artifact and never mutated afterwards, so it can be
//! shared freely between concurrent queries.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Mode, Node, NodeId};

/// Errors raised while building a graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Two nodes share an id
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// Node coordinates are not a valid WGS84 position
    #[error("node {id} has invalid position ({lat}, {lon})")]
    InvalidPosition { id: NodeId, lat: f64, lon: f64 },

    /// Edge endpoint is not a known node
    #[error("edge {from} -> {to} references unknown node {missing}")]
    UnknownNode {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// Edge length is negative or not finite
    #[error("edge {from} -> {to} has invalid length {length_m}")]
    InvalidLength {
        from: NodeId,
        to: NodeId,
        length_m: f64,
    },
}

/// Dense index of a node inside one `TransitGraph`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) u32);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A directed edge as stored in the network artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub mode: Mode,
    pub length_m: f64,
    /// Distinguishes parallel edges, e.g. `bus_a_b` and `walk_a_b`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, mode: Mode, length_m: f64) -> Self {
        Self {
            from,
            to,
            mode,
            length_m,
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// An edge resolved to node indices.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub mode: Mode,
    pub length_m: f64,
    pub key: Option<String>,
}

/// Immutable directed multigraph of stops and stations.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    nodes: Vec<Arc<Node>>,
    index: HashMap<NodeId, NodeIndex>,
    edges: Vec<GraphEdge>,
    /// Outgoing edge positions in `edges`, per node, in load order.
    outgoing: Vec<Vec<usize>>,
}

impl TransitGraph {
    /// Build a graph, validating ids, positions and edge lengths.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(nodes.len());
        let mut stored = Vec::with_capacity(nodes.len());

        for node in nodes {
            if !node.has_valid_position() {
                return Err(GraphError::InvalidPosition {
                    id: node.id,
                    lat: node.lat,
                    lon: node.lon,
                });
            }
            let idx = NodeIndex(stored.len() as u32);
            if index.insert(node.id.clone(), idx).is_some() {
                return Err(GraphError::DuplicateNode(node.id));
            }
            stored.push(Arc::new(node));
        }

        let mut outgoing = vec![Vec::new(); stored.len()];
        let mut resolved = Vec::with_capacity(edges.len());

        for edge in edges {
            let lookup = |id: &NodeId| {
                index.get(id).copied().ok_or_else(|| GraphError::UnknownNode {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing: id.clone(),
                })
            };
            let from = lookup(&edge.from)?;
            let to = lookup(&edge.to)?;

            if !edge.length_m.is_finite() || edge.length_m < 0.0 {
                return Err(GraphError::InvalidLength {
                    from: edge.from,
                    to: edge.to,
                    length_m: edge.length_m,
                });
            }

            outgoing[from.index()].push(resolved.len());
            resolved.push(GraphEdge {
                from,
                to,
                mode: edge.mode,
                length_m: edge.length_m,
                key: edge.key,
            });
        }

        Ok(Self {
            nodes: stored,
            index,
            edges: resolved,
            outgoing,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `idx`.
    ///
    /// Panics if `idx` came from a different graph.
    pub fn node(&self, idx: NodeIndex) -> &Arc<Node> {
        &self.nodes[idx.index()]
    }

    /// Look up a node's index by id.
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// All nodes in load order.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.nodes.iter()
    }

    /// All edges in load order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Edges leaving `idx`, parallel edges included.
    pub fn edges_from(&self, idx: NodeIndex) -> impl Iterator<Item = &GraphEdge> {
        self.outgoing[idx.index()].iter().map(|&e| &self.edges[e])
    }

    /// Convert back into the serialisable node and edge lists.
    pub fn to_parts(&self) -> (Vec<Node>, Vec<Edge>) {
        let nodes = self.nodes.iter().map(|n| n.as_ref().clone()).collect();
        let edges = self
            .edges
            .iter()
            .map(|e| Edge {
                from: self.node(e.from).id.clone(),
                to: self.node(e.to).id.clone(),
                mode: e.mode,
                length_m: e.length_m,
                key: e.key.clone(),
            })
            .collect();
        (nodes, edges)
    }
}
