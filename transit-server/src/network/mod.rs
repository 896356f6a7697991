//! The transit network: graph, spatial index, artifacts and builder.
//!
//! A `TransitNetwork` is loaded once at startup and shared read-only between
//! queries. Both halves are derived from the same `network.json`, so node ids
//! in the spatial index always resolve in the graph.

mod artifact;
mod builder;
mod graph;
mod projection;
mod spatial;
mod stops;

use tracing::info;

pub use artifact::{
    ArtifactError, BUS_STOPS_FILE, DataDir, METRO_STATIONS_FILE, NETWORK_FILE, NetworkArtifact,
    load_stops, save_stops,
};
pub use builder::{BuilderConfig, build_network, haversine_m};
pub use graph::{Edge, GraphEdge, GraphError, NodeIndex, TransitGraph};
pub use projection::{
    BUS_RUSH_FACTOR, BUS_SPEED_MPS, METRO_SPEED_MPS, ProjectedEdge, Projection, WALK_SPEED_MPS,
    dynamic_time, search_speed,
};
pub use spatial::{Snap, SpatialError, SpatialIndex};
pub use stops::{BUS_STOP_SAMPLE, stop_listing};

/// Graph plus the spatial index over its nodes.
#[derive(Debug)]
pub struct TransitNetwork {
    pub graph: TransitGraph,
    pub spatial: SpatialIndex,
}

impl TransitNetwork {
    /// Validate an artifact and index its nodes.
    pub fn from_artifact(artifact: NetworkArtifact) -> Result<Self, GraphError> {
        let graph = TransitGraph::new(artifact.nodes, artifact.edges)?;
        let spatial = SpatialIndex::build(graph.nodes().map(|n| n.as_ref()));
        Ok(Self { graph, spatial })
    }

    /// Load `network.json` from a data directory.
    pub fn load(data: &DataDir) -> Result<Self, ArtifactError> {
        let path = data.network();
        let network = Self::from_artifact(NetworkArtifact::load(&path)?)?;
        info!(
            path = %path.display(),
            nodes = network.graph.node_count(),
            edges = network.graph.edge_count(),
            "loaded network"
        );
        Ok(network)
    }

    /// A network with no nodes; every query against it is `NotInitialized`.
    pub fn empty() -> Self {
        Self {
            graph: TransitGraph::default(),
            spatial: SpatialIndex::build(std::iter::empty()),
        }
    }

    /// Ready to serve queries.
    pub fn is_loaded(&self) -> bool {
        !self.graph.is_empty() && !self.spatial.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, Node, NodeId, NodeKind};
    use tempfile::tempdir;

    fn id(s: &str) -> NodeId {
        NodeId::parse(s).unwrap()
    }

    #[test]
    fn load_from_data_dir() {
        let dir = tempdir().unwrap();
        let data = DataDir::new(dir.path());
        NetworkArtifact {
            nodes: vec![
                Node::new(id("a"), 18.50, 73.80, NodeKind::BusStop),
                Node::new(id("b"), 18.51, 73.80, NodeKind::BusStop),
            ],
            edges: vec![Edge::new(id("a"), id("b"), Mode::Walk, 1112.0)],
        }
        .save(&data.network())
        .unwrap();

        let network = TransitNetwork::load(&data).unwrap();
        assert!(network.is_loaded());
        assert_eq!(network.graph.node_count(), 2);
        assert_eq!(network.spatial.len(), 2);
        assert_eq!(network.spatial.nearest_node(18.5, 73.8).unwrap().node, id("a"));
    }

    #[test]
    fn invalid_artifact_is_graph_error() {
        let dir = tempdir().unwrap();
        let data = DataDir::new(dir.path());
        NetworkArtifact {
            nodes: vec![Node::new(id("a"), 18.5, 73.8, NodeKind::BusStop)],
            edges: vec![Edge::new(id("a"), id("ghost"), Mode::Walk, 10.0)],
        }
        .save(&data.network())
        .unwrap();

        let err = TransitNetwork::load(&data).unwrap_err();
        assert!(matches!(err, ArtifactError::Graph(GraphError::UnknownNode { .. })));
    }

    #[test]
    fn empty_network_is_not_loaded() {
        assert!(!TransitNetwork::empty().is_loaded());
    }
}
