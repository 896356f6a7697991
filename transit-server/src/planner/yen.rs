//! Yen's k-shortest loopless paths.
//!
//! Each round takes the most recently accepted path and, for every node on
//! it except the last, searches for a detour ("spur") that leaves the shared
//! prefix ("root") by an arc no accepted path with that root has used. The
//! cheapest candidate found so far becomes the next accepted path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Instant;

use ordered_float::OrderedFloat;

use super::dijkstra::{ExclusionMask, Path, shortest_path};
use crate::network::{NodeIndex, Projection};

/// Bounds on one k-shortest search.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Maximum number of spur searches.
    pub max_spur_searches: usize,
    /// Stop once this instant has passed.
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self {
            max_spur_searches: usize::MAX,
            deadline: None,
        }
    }

    fn exhausted(&self, spur_searches: usize) -> bool {
        spur_searches >= self.max_spur_searches
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Paths found by `k_shortest_loopless_paths`.
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    /// Accepted paths in non-decreasing cost order.
    pub paths: Vec<Path>,
    /// The search hit its limits before finding k paths or running dry.
    pub truncated: bool,
    /// Number of spur searches performed.
    pub spur_searches: usize,
}

/// Pool entry; the heap pops the cheapest, then the lexicographically
/// smallest node sequence.
#[derive(Debug, PartialEq, Eq)]
struct Candidate {
    cost: OrderedFloat<f64>,
    nodes: Vec<NodeIndex>,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.nodes.cmp(&self.nodes))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Up to `k` loopless paths from `source` to `target` in non-decreasing
/// weight.
///
/// If `source == target` the only loopless path is the single node.
pub fn k_shortest_loopless_paths(
    projection: &Projection,
    source: NodeIndex,
    target: NodeIndex,
    k: usize,
    limits: SearchLimits,
) -> PathSearch {
    let mut search = PathSearch::default();
    if k == 0 {
        return search;
    }

    let mut mask = ExclusionMask::new(projection.node_count());
    let Some(first) = shortest_path(projection, source, target, &mask) else {
        return search;
    };

    let mut seen: HashSet<Vec<NodeIndex>> = HashSet::new();
    seen.insert(first.nodes.clone());
    search.paths.push(first);

    let mut pool = BinaryHeap::new();

    'rounds: while search.paths.len() < k {
        let Some(previous) = search.paths.last() else {
            break;
        };
        let previous = previous.nodes.clone();

        for i in 0..previous.len().saturating_sub(1) {
            if limits.exhausted(search.spur_searches) {
                search.truncated = true;
                break 'rounds;
            }

            let spur = previous[i];
            let root = &previous[..=i];

            mask.clear();
            for path in &search.paths {
                if path.nodes.len() > i + 1 && path.nodes[..=i] == *root {
                    mask.exclude_edge(path.nodes[i], path.nodes[i + 1]);
                }
            }
            for &node in &root[..i] {
                mask.exclude_node(node);
            }

            search.spur_searches += 1;
            let Some(spur_path) = shortest_path(projection, spur, target, &mask) else {
                continue;
            };

            let mut nodes = root[..i].to_vec();
            nodes.extend(spur_path.nodes);
            if seen.contains(&nodes) {
                continue;
            }
            let Some(cost) = projection.path_weight(&nodes) else {
                continue;
            };
            seen.insert(nodes.clone());
            pool.push(Candidate {
                cost: OrderedFloat(cost),
                nodes,
            });
        }

        let Some(best) = pool.pop() else {
            break;
        };
        search.paths.push(Path {
            nodes: best.nodes,
            cost: best.cost.0,
        });
    }

    search
}
