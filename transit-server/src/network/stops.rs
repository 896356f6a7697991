//! Stop listing for map display.

use std::sync::Arc;

use super::TransitGraph;
use crate::domain::{Node, NodeKind};

/// Number of bus stops included in the listing.
pub const BUS_STOP_SAMPLE: usize = 500;

/// All metro stations followed by the first `bus_sample` bus stops, both in
/// load order.
pub fn stop_listing(graph: &TransitGraph, bus_sample: usize) -> Vec<Arc<Node>> {
    let metro = graph
        .nodes()
        .filter(|n| n.kind == NodeKind::MetroStation);
    let bus = graph
        .nodes()
        .filter(|n| n.kind == NodeKind::BusStop)
        .take(bus_sample);

    metro.chain(bus).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;

    fn node(id: &str, kind: NodeKind) -> Node {
        Node::new(NodeId::parse(id).unwrap(), 18.5, 73.8, kind)
    }

    #[test]
    fn metro_first_then_sampled_bus() {
        let graph = TransitGraph::new(
            vec![
                node("b1", NodeKind::BusStop),
                node("b2", NodeKind::BusStop),
                node("b3", NodeKind::BusStop),
                node("m1", NodeKind::MetroStation),
                node("m2", NodeKind::MetroStation),
            ],
            vec![],
        )
        .unwrap();

        let ids: Vec<_> = stop_listing(&graph, 2)
            .iter()
            .map(|n| n.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["m1", "m2", "b1", "b2"]);
    }

    #[test]
    fn empty_graph_lists_nothing() {
        assert!(stop_listing(&TransitGraph::default(), BUS_STOP_SAMPLE).is_empty());
    }
}
