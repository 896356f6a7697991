//! Offline construction of the network artifact from stop lists.

use std::collections::{HashMap, HashSet};

use geo::{HaversineDistance, Point};
use tracing::{debug, info, warn};

use super::{Edge, NetworkArtifact, SpatialIndex};
use crate::domain::{Mode, Node, NodeId, NodeKind};

/// Separator between line names in a station's `line` attribute.
const LINE_SEPARATOR: char = '/';

/// Parameters for `build_network`.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Stops closer than this (haversine metres) are linked by walking, and
    /// by bus when both are bus stops.
    pub walk_radius_m: f64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            walk_radius_m: 400.0,
        }
    }
}

impl BuilderConfig {
    pub fn new(walk_radius_m: f64) -> Self {
        Self { walk_radius_m }
    }
}

/// Great-circle distance between two nodes in metres.
pub fn haversine_m(a: &Node, b: &Node) -> f64 {
    Point::new(a.lon, a.lat).haversine_distance(&Point::new(b.lon, b.lat))
}

/// Build the network from bus stops and metro stations.
///
/// Bus stops come first in the node list, then metro stations. Stops with a
/// duplicate id keep their first occurrence; stops with an invalid position
/// are skipped.
pub fn build_network(
    bus_stops: Vec<Node>,
    metro_stations: Vec<Node>,
    config: &BuilderConfig,
) -> NetworkArtifact {
    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(bus_stops.len() + metro_stations.len());
    let mut metro_ids = Vec::with_capacity(metro_stations.len());

    for (node, is_metro) in bus_stops
        .into_iter()
        .map(|n| (n, false))
        .chain(metro_stations.into_iter().map(|n| (n, true)))
    {
        if !node.has_valid_position() {
            warn!(id = %node.id, lat = node.lat, lon = node.lon, "skipping stop with invalid position");
            continue;
        }
        if !seen.insert(node.id.clone()) {
            warn!(id = %node.id, "skipping duplicate stop id");
            continue;
        }
        if is_metro {
            metro_ids.push(nodes.len());
        }
        nodes.push(node);
    }

    let mut edges = EdgeSet::default();
    chain_metro_lines(&nodes, &metro_ids, &mut edges);
    let metro_edges = edges.len();
    link_nearby_stops(&nodes, config.walk_radius_m, &mut edges);

    info!(
        nodes = nodes.len(),
        metro_edges,
        edges = edges.len(),
        "built network"
    );

    NetworkArtifact {
        nodes,
        edges: edges.into_vec(),
    }
}

/// Edges in insertion order, without repeated keys.
#[derive(Default)]
struct EdgeSet {
    edges: Vec<Edge>,
    keys: HashSet<String>,
}

impl EdgeSet {
    fn push(&mut self, from: &NodeId, to: &NodeId, mode: Mode, length_m: f64) {
        let key = format!("{}_{}_{}", mode.as_str(), from, to);
        if self.keys.insert(key.clone()) {
            self.edges
                .push(Edge::new(from.clone(), to.clone(), mode, length_m).with_key(key));
        }
    }

    fn len(&self) -> usize {
        self.edges.len()
    }

    fn into_vec(self) -> Vec<Edge> {
        self.edges
    }
}

/// Lines a station belongs to, from its `line` attribute.
fn station_lines(node: &Node) -> impl Iterator<Item = &str> {
    node.attribute("line")
        .unwrap_or_default()
        .split(LINE_SEPARATOR)
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Link consecutive stations of each line in both directions.
fn chain_metro_lines(nodes: &[Node], metro_ids: &[usize], edges: &mut EdgeSet) {
    let mut line_order: Vec<&str> = Vec::new();
    let mut lines: HashMap<&str, Vec<&Node>> = HashMap::new();

    for &i in metro_ids {
        let station = &nodes[i];
        for line in station_lines(station) {
            lines
                .entry(line)
                .or_insert_with(|| {
                    line_order.push(line);
                    Vec::new()
                })
                .push(station);
        }
    }

    for line in line_order {
        let stations = &lines[line];
        debug!(line, stations = stations.len(), "chaining metro line");
        for pair in stations.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let length_m = haversine_m(a, b);
            edges.push(&a.id, &b.id, Mode::Metro, length_m);
            edges.push(&b.id, &a.id, Mode::Metro, length_m);
        }
    }
}

/// Add walk (and bus) edges between every ordered pair of nearby stops.
fn link_nearby_stops(nodes: &[Node], radius_m: f64, edges: &mut EdgeSet) {
    let index = SpatialIndex::build(nodes);
    let by_id: HashMap<&NodeId, &Node> = nodes.iter().map(|n| (&n.id, n)).collect();

    // The R-tree works in projected metres; widen the search so no pair
    // within the haversine radius is missed.
    let search_radius = radius_m * 1.01 + 1.0;

    for a in nodes {
        for (id, _) in index.within(a.lat, a.lon, search_radius) {
            let Some(&b) = by_id.get(&id) else {
                continue;
            };
            if b.id == a.id {
                continue;
            }
            let length_m = haversine_m(a, b);
            if length_m > radius_m {
                continue;
            }
            if a.kind == NodeKind::BusStop && b.kind == NodeKind::BusStop {
                edges.push(&a.id, &b.id, Mode::Bus, length_m);
            }
            edges.push(&a.id, &b.id, Mode::Walk, length_m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::TransitGraph;

    fn id(s: &str) -> NodeId {
        NodeId::parse(s).unwrap()
    }

    fn bus(s: &str, lat: f64, lon: f64) -> Node {
        Node::new(id(s), lat, lon, NodeKind::BusStop)
    }

    fn metro(s: &str, lat: f64, lon: f64, line: &str) -> Node {
        Node::new(id(s), lat, lon, NodeKind::MetroStation).with_attribute("line", line)
    }

    fn keys(artifact: &NetworkArtifact) -> Vec<&str> {
        artifact
            .edges
            .iter()
            .filter_map(|e| e.key.as_deref())
            .collect()
    }

    #[test]
    fn bus_stops_come_first() {
        let artifact = build_network(
            vec![bus("b1", 18.50, 73.80)],
            vec![metro("m1", 18.60, 73.90, "Aqua")],
            &BuilderConfig::default(),
        );
        let ids: Vec<_> = artifact.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "m1"]);
    }

    #[test]
    fn nearby_bus_stops_get_bus_and_walk_edges() {
        // About 111 m apart
        let artifact = build_network(
            vec![bus("b1", 18.500, 73.80), bus("b2", 18.501, 73.80)],
            vec![],
            &BuilderConfig::default(),
        );

        assert_eq!(
            keys(&artifact),
            vec!["bus_b1_b2", "walk_b1_b2", "bus_b2_b1", "walk_b2_b1"]
        );
        let len = artifact.edges[0].length_m;
        assert!((len - 111.2).abs() < 0.5, "{len}");
    }

    #[test]
    fn bus_to_metro_is_walk_only() {
        let artifact = build_network(
            vec![bus("b1", 18.500, 73.80)],
            vec![metro("m1", 18.501, 73.80, "Aqua")],
            &BuilderConfig::default(),
        );
        assert_eq!(keys(&artifact), vec!["walk_b1_m1", "walk_m1_b1"]);
    }

    #[test]
    fn distant_stops_are_not_linked() {
        // About 556 m apart
        let artifact = build_network(
            vec![bus("b1", 18.500, 73.80), bus("b2", 18.505, 73.80)],
            vec![],
            &BuilderConfig::default(),
        );
        assert!(artifact.edges.is_empty());
    }

    #[test]
    fn walk_radius_is_configurable() {
        let artifact = build_network(
            vec![bus("b1", 18.500, 73.80), bus("b2", 18.505, 73.80)],
            vec![],
            &BuilderConfig::new(600.0),
        );
        assert_eq!(artifact.edges.len(), 4);
    }

    #[test]
    fn metro_lines_are_chained_both_ways() {
        let artifact = build_network(
            vec![],
            vec![
                metro("m1", 18.50, 73.80, "Aqua"),
                metro("m2", 18.51, 73.80, "Aqua"),
                metro("m3", 18.52, 73.80, "Aqua"),
            ],
            &BuilderConfig::default(),
        );
        assert_eq!(
            keys(&artifact),
            vec!["metro_m1_m2", "metro_m2_m1", "metro_m2_m3", "metro_m3_m2"]
        );
    }

    #[test]
    fn interchange_station_joins_both_lines() {
        let artifact = build_network(
            vec![],
            vec![
                metro("p1", 18.40, 73.80, "Purple"),
                metro("x", 18.42, 73.80, "Purple/Aqua"),
                metro("a1", 18.42, 73.82, "Aqua"),
            ],
            &BuilderConfig::default(),
        );
        assert_eq!(
            keys(&artifact),
            vec!["metro_p1_x", "metro_x_p1", "metro_x_a1", "metro_a1_x"]
        );
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let artifact = build_network(
            vec![bus("s", 18.5, 73.8).with_attribute("name", "first")],
            vec![metro("s", 18.6, 73.9, "Aqua")],
            &BuilderConfig::default(),
        );
        assert_eq!(artifact.nodes.len(), 1);
        assert_eq!(artifact.nodes[0].name(), Some("first"));
    }

    #[test]
    fn invalid_positions_are_skipped() {
        let artifact = build_network(
            vec![bus("bad", f64::NAN, 73.8), bus("ok", 18.5, 73.8)],
            vec![],
            &BuilderConfig::default(),
        );
        assert_eq!(artifact.nodes.len(), 1);
        assert_eq!(artifact.nodes[0].id, id("ok"));
    }

    #[test]
    fn output_loads_as_graph() {
        let artifact = build_network(
            vec![bus("b1", 18.500, 73.80), bus("b2", 18.501, 73.80)],
            vec![
                metro("m1", 18.501, 73.801, "Aqua"),
                metro("m2", 18.510, 73.801, "Aqua"),
            ],
            &BuilderConfig::default(),
        );
        let graph = TransitGraph::new(artifact.nodes, artifact.edges).unwrap();
        assert_eq!(graph.node_count(), 4);
    }
}
