//! Single-pair shortest path over a projection.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use ordered_float::OrderedFloat;

use crate::network::{NodeIndex, Projection};

/// Nodes and arcs hidden from one shortest-path search.
///
/// The projection itself is never modified; a mask is cleared and reused
/// between spur searches.
#[derive(Debug, Clone)]
pub struct ExclusionMask {
    nodes: Vec<bool>,
    edges: HashSet<(NodeIndex, NodeIndex)>,
}

impl ExclusionMask {
    /// An empty mask for a projection with `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            nodes: vec![false; node_count],
            edges: HashSet::new(),
        }
    }

    pub fn exclude_node(&mut self, node: NodeIndex) {
        self.nodes[node.index()] = true;
    }

    pub fn exclude_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        self.edges.insert((from, to));
    }

    pub fn clear(&mut self) {
        self.nodes.fill(false);
        self.edges.clear();
    }

    pub fn is_node_excluded(&self, node: NodeIndex) -> bool {
        self.nodes.get(node.index()).copied().unwrap_or(false)
    }

    pub fn is_edge_excluded(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.edges.contains(&(from, to))
    }
}

/// A simple path and its total search weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeIndex>,
    /// Sum of arc weights in seconds, added left to right.
    pub cost: f64,
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: OrderedFloat<f64>,
    node: NodeIndex,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost, then by node index
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra from `source` to `target`, skipping anything in `mask`.
///
/// Returns `None` if the target is unreachable or either endpoint is
/// excluded. A node's predecessor only changes on a strictly shorter
/// distance, so ties resolve to whichever node was settled first.
pub fn shortest_path(
    projection: &Projection,
    source: NodeIndex,
    target: NodeIndex,
    mask: &ExclusionMask,
) -> Option<Path> {
    let n = projection.node_count();
    if source.index() >= n || target.index() >= n {
        return None;
    }
    if mask.is_node_excluded(source) || mask.is_node_excluded(target) {
        return None;
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[source.index()] = 0.0;
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if node == target {
            break;
        }

        for edge in projection.edges_from(node) {
            let next = edge.to;
            if settled[next.index()]
                || mask.is_node_excluded(next)
                || mask.is_edge_excluded(node, next)
            {
                continue;
            }

            let next_cost = cost.0 + edge.weight;
            if next_cost < dist[next.index()] {
                dist[next.index()] = next_cost;
                prev[next.index()] = Some(node);
                heap.push(State {
                    cost: OrderedFloat(next_cost),
                    node: next,
                });
            }
        }
    }

    if !settled[target.index()] {
        return None;
    }

    let mut nodes = vec![target];
    let mut current = target;
    while let Some(p) = prev[current.index()] {
        nodes.push(p);
        current = p;
    }
    nodes.reverse();

    Some(Path {
        nodes,
        cost: dist[target.index()],
    })
}
