//! Per-query projection of the multigraph onto a simple weighted digraph.
//!
//! Search weights are a quick travel-time guess per edge: length divided by a
//! fixed speed for the mode, with buses running at half speed during the rush
//! windows. Parallel edges are collapsed to the cheapest one. The projection
//! lives for one query only and is never shared.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{GraphEdge, NodeIndex, TransitGraph};
use crate::domain::{Departure, Mode, is_rush_hour};

/// Metro search speed in m/s.
pub const METRO_SPEED_MPS: f64 = 10.0;

/// Walking search speed in m/s.
pub const WALK_SPEED_MPS: f64 = 1.4;

/// Off-peak bus search speed in m/s.
pub const BUS_SPEED_MPS: f64 = 5.0;

/// Bus speed multiplier inside the rush windows.
pub const BUS_RUSH_FACTOR: f64 = 0.5;

/// Search speed for `mode` at `hour`, in m/s.
pub fn search_speed(mode: Mode, hour: u8) -> f64 {
    match mode {
        Mode::Metro => METRO_SPEED_MPS,
        Mode::Walk => WALK_SPEED_MPS,
        Mode::Bus if is_rush_hour(hour) => BUS_SPEED_MPS * BUS_RUSH_FACTOR,
        Mode::Bus => BUS_SPEED_MPS,
    }
}

/// Search weight of an edge, in seconds.
///
/// ```
/// use transit_server::domain::Mode;
/// use transit_server::network::dynamic_time;
///
/// assert_eq!(dynamic_time(Mode::Bus, 500.0, 14), 100.0);
/// assert_eq!(dynamic_time(Mode::Bus, 500.0, 9), 200.0);
/// assert_eq!(dynamic_time(Mode::Metro, 500.0, 9), 50.0);
/// ```
pub fn dynamic_time(mode: Mode, length_m: f64, hour: u8) -> f64 {
    length_m / search_speed(mode, hour).max(1.0)
}

/// The single arc kept for an ordered node pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedEdge {
    pub to: NodeIndex,
    /// Search weight in seconds; never negative.
    pub weight: f64,
    pub mode: Mode,
    pub length_m: f64,
    key: Option<String>,
}

impl ProjectedEdge {
    fn from_edge(edge: &GraphEdge, hour: u8) -> Self {
        Self {
            to: edge.to,
            weight: dynamic_time(edge.mode, edge.length_m, hour),
            mode: edge.mode,
            length_m: edge.length_m,
            key: edge.key.clone(),
        }
    }

    /// Total order used to pick among parallel edges: lowest weight, then
    /// mode, then shortest length, then key.
    fn preference(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then(self.mode.cmp(&other.mode))
            .then(self.length_m.total_cmp(&other.length_m))
            .then_with(|| self.key.cmp(&other.key))
    }
}

/// Simple weighted digraph derived from a `TransitGraph` for one departure.
///
/// Each node's arcs are sorted by target index, so lookups are binary
/// searches and iteration order is independent of how the graph was loaded.
#[derive(Debug, Clone)]
pub struct Projection {
    departure: Departure,
    adjacency: Vec<Vec<ProjectedEdge>>,
}

impl Projection {
    pub fn departure(&self) -> Departure {
        self.departure
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Arcs leaving `from`, sorted by target.
    pub fn edges_from(&self, from: NodeIndex) -> &[ProjectedEdge] {
        &self.adjacency[from.index()]
    }

    /// The arc from `from` to `to`, if any.
    pub fn edge(&self, from: NodeIndex, to: NodeIndex) -> Option<&ProjectedEdge> {
        let arcs = self.adjacency.get(from.index())?;
        arcs.binary_search_by(|e| e.to.cmp(&to))
            .ok()
            .map(|i| &arcs[i])
    }

    /// Total weight along a node sequence, or `None` if an arc is missing.
    pub fn path_weight(&self, path: &[NodeIndex]) -> Option<f64> {
        path.windows(2)
            .map(|w| self.edge(w[0], w[1]).map(|e| e.weight))
            .sum()
    }
}

impl TransitGraph {
    /// Project the multigraph for a departure.
    ///
    /// Every parallel edge is compared against the best one seen so far and
    /// only replaces it if strictly preferred, so the result does not depend
    /// on the order edges were loaded in.
    pub fn project_for_query(&self, departure: Departure) -> Projection {
        let hour = departure.hour();

        let adjacency = (0..self.node_count())
            .map(|i| {
                let mut best: BTreeMap<NodeIndex, ProjectedEdge> = BTreeMap::new();
                for edge in self.edges_from(NodeIndex(i as u32)) {
                    let candidate = ProjectedEdge::from_edge(edge, hour);
                    match best.get_mut(&candidate.to) {
                        Some(current) => {
                            if candidate.preference(current) == Ordering::Less {
                                *current = candidate;
                            }
                        }
                        None => {
                            best.insert(candidate.to, candidate);
                        }
                    }
                }
                best.into_values().collect()
            })
            .collect();

        Projection {
            departure,
            adjacency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Node, NodeId, NodeKind};
    use crate::network::Edge;

    fn id(s: &str) -> NodeId {
        NodeId::parse(s).unwrap()
    }

    fn graph(edges: Vec<Edge>) -> TransitGraph {
        let nodes = ["a", "b", "c"]
            .iter()
            .map(|s| Node::new(id(s), 18.5, 73.8, NodeKind::BusStop))
            .collect();
        TransitGraph::new(nodes, edges).unwrap()
    }

    fn at(hour: u8) -> Departure {
        Departure::new(hour, 0).unwrap()
    }

    #[test]
    fn speeds_per_mode() {
        assert_eq!(search_speed(Mode::Metro, 9), 10.0);
        assert_eq!(search_speed(Mode::Walk, 9), 1.4);
        assert_eq!(search_speed(Mode::Bus, 14), 5.0);
        assert_eq!(search_speed(Mode::Bus, 9), 2.5);
        assert_eq!(search_speed(Mode::Bus, 20), 2.5);
        assert_eq!(search_speed(Mode::Bus, 21), 5.0);
    }

    #[test]
    fn walk_speed_is_floored() {
        // 1.4 m/s is above the 1.0 floor, so it's used as-is
        assert!((dynamic_time(Mode::Walk, 140.0, 0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn rush_hour_doubles_bus_weight() {
        let g = graph(vec![Edge::new(id("a"), id("b"), Mode::Bus, 750.0)]);
        let (a, b) = (g.index_of(&id("a")).unwrap(), g.index_of(&id("b")).unwrap());

        let off_peak = g.project_for_query(at(14)).edge(a, b).unwrap().weight;
        let rush = g.project_for_query(at(9)).edge(a, b).unwrap().weight;

        assert_eq!(rush, 2.0 * off_peak);
    }

    #[test]
    fn collapse_keeps_cheapest_in_any_order() {
        let short = Edge::new(id("a"), id("b"), Mode::Walk, 300.0).with_key("short");
        let long = Edge::new(id("a"), id("b"), Mode::Walk, 500.0).with_key("long");

        for edges in [vec![short.clone(), long.clone()], vec![long, short]] {
            let g = graph(edges);
            let p = g.project_for_query(at(10));
            let (a, b) = (g.index_of(&id("a")).unwrap(), g.index_of(&id("b")).unwrap());

            let arc = p.edge(a, b).unwrap();
            assert_eq!(arc.length_m, 300.0);
            assert_eq!(arc.weight, 300.0 / 1.4);
            assert_eq!(p.edges_from(a).len(), 1);
        }
    }

    #[test]
    fn collapse_prefers_faster_mode() {
        let g = graph(vec![
            Edge::new(id("a"), id("b"), Mode::Walk, 400.0),
            Edge::new(id("a"), id("b"), Mode::Bus, 400.0),
        ]);
        let (a, b) = (g.index_of(&id("a")).unwrap(), g.index_of(&id("b")).unwrap());

        let off_peak = g.project_for_query(at(14));
        assert_eq!(off_peak.edge(a, b).unwrap().mode, Mode::Bus);
    }

    #[test]
    fn equal_weight_tie_is_deterministic() {
        // 280m bus in rush hour (2.5 m/s) = 112s; 1120m metro (10 m/s) = 112s
        let bus = Edge::new(id("a"), id("b"), Mode::Bus, 280.0);
        let metro = Edge::new(id("a"), id("b"), Mode::Metro, 1120.0);

        for edges in [vec![bus.clone(), metro.clone()], vec![metro, bus]] {
            let g = graph(edges);
            let (a, b) = (g.index_of(&id("a")).unwrap(), g.index_of(&id("b")).unwrap());
            let arc = g.project_for_query(at(9)).edge(a, b).cloned().unwrap();
            assert_eq!(arc.mode, Mode::Metro);
        }
    }

    #[test]
    fn directions_are_independent() {
        let g = graph(vec![Edge::new(id("a"), id("b"), Mode::Metro, 1000.0)]);
        let p = g.project_for_query(at(10));
        let (a, b) = (g.index_of(&id("a")).unwrap(), g.index_of(&id("b")).unwrap());

        assert!(p.edge(a, b).is_some());
        assert!(p.edge(b, a).is_none());
    }

    #[test]
    fn path_weight_sums_arcs() {
        let g = graph(vec![
            Edge::new(id("a"), id("b"), Mode::Metro, 1000.0),
            Edge::new(id("b"), id("c"), Mode::Bus, 500.0),
        ]);
        let p = g.project_for_query(at(14));
        let idx: Vec<_> = ["a", "b", "c"].iter().map(|s| g.index_of(&id(s)).unwrap()).collect();

        assert_eq!(p.path_weight(&idx), Some(200.0));
        assert_eq!(p.path_weight(&idx[..1]), Some(0.0));
        assert_eq!(p.path_weight(&[idx[2], idx[0]]), None);
    }

    #[test]
    fn projection_leaves_graph_untouched() {
        let g = graph(vec![
            Edge::new(id("a"), id("b"), Mode::Walk, 300.0),
            Edge::new(id("a"), id("b"), Mode::Walk, 500.0),
        ]);
        let _ = g.project_for_query(at(9));
        assert_eq!(g.edge_count(), 2);
    }
}
