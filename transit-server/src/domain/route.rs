//! Route types.
//!
//! A `Route` is a simple path through the network expressed as legs. A
//! `RankedRoute` is a route after the ranker has predicted its leg durations
//! and scored it.

use std::collections::HashSet;
use std::sync::Arc;

use super::{DomainError, Leg, LegDuration, Mode, Node, NodeId, count_transfers};

/// A loopless path through the network.
///
/// # Invariants
///
/// - At least one node; exactly one leg per consecutive node pair
/// - Leg `i` runs from node `i` to node `i + 1`
/// - No node is visited twice
#[derive(Debug, Clone)]
pub struct Route {
    nodes: Vec<Arc<Node>>,
    legs: Vec<Leg>,
    total_distance_m: f64,
    transfers: usize,
}

impl Route {
    /// Build a route from its node sequence and legs.
    pub fn new(nodes: Vec<Arc<Node>>, legs: Vec<Leg>) -> Result<Self, DomainError> {
        if nodes.is_empty() {
            return Err(DomainError::EmptyRoute);
        }
        if legs.len() + 1 != nodes.len() {
            return Err(DomainError::LegCountMismatch {
                nodes: nodes.len(),
                legs: legs.len(),
            });
        }

        for (index, (leg, pair)) in legs.iter().zip(nodes.windows(2)).enumerate() {
            if leg.from_id() != &pair[0].id || leg.to_id() != &pair[1].id {
                return Err(DomainError::DisconnectedLeg {
                    index,
                    from: pair[0].id.clone(),
                    to: pair[1].id.clone(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(&node.id) {
                return Err(DomainError::RepeatedNode(node.id.clone()));
            }
        }

        let total_distance_m = legs.iter().map(Leg::length_m).sum();
        let transfers = count_transfers(&legs);

        Ok(Self {
            nodes,
            legs,
            total_distance_m,
            transfers,
        })
    }

    /// Returns the visited nodes in order.
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Returns the visited node ids in order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.id)
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the leg modes in order.
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.legs.iter().map(Leg::mode)
    }

    pub fn origin(&self) -> &Arc<Node> {
        &self.nodes[0]
    }

    pub fn destination(&self) -> &Arc<Node> {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Sum of leg lengths in metres.
    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    /// Number of transit-to-transit mode changes.
    pub fn transfers(&self) -> usize {
        self.transfers
    }
}

/// A scored route with its position in the ranking.
#[derive(Debug, Clone)]
pub struct RankedRoute {
    /// 1-based position after sorting; lower is better.
    pub rank: usize,

    /// Composite cost, rounded to 2 decimal places.
    pub score: f64,

    /// Sum of predicted leg durations in seconds.
    pub total_time_sec: f64,

    /// `total_time_sec` rounded up to whole minutes.
    pub total_time_mins: u32,

    /// Sum of per-mode comfort penalties.
    pub mode_penalty: f64,

    pub route: Route,

    /// Predicted duration of each leg, parallel to `route.legs()`.
    pub durations: Vec<LegDuration>,
}

impl RankedRoute {
    /// Iterate legs together with their predicted durations.
    pub fn scored_legs(&self) -> impl Iterator<Item = (&Leg, &LegDuration)> {
        self.route.legs().iter().zip(self.durations.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeKind;

    fn node(id: &str) -> Arc<Node> {
        Arc::new(Node::new(
            NodeId::parse(id).unwrap(),
            18.5,
            73.8,
            NodeKind::BusStop,
        ))
    }

    fn leg(from: &Arc<Node>, to: &Arc<Node>, mode: Mode, len: f64) -> Leg {
        Leg::new(from.clone(), to.clone(), mode, len).unwrap()
    }

    #[test]
    fn valid_route() {
        let (a, b, c) = (node("a"), node("b"), node("c"));
        let legs = vec![
            leg(&a, &b, Mode::Bus, 300.0),
            leg(&b, &c, Mode::Metro, 1200.0),
        ];

        let route = Route::new(vec![a, b, c], legs).unwrap();

        assert_eq!(route.legs().len(), 2);
        assert_eq!(route.total_distance_m(), 1500.0);
        assert_eq!(route.transfers(), 1);
        assert_eq!(route.origin().id.as_str(), "a");
        assert_eq!(route.destination().id.as_str(), "c");
        let ids: Vec<_> = route.node_ids().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn single_node_route_has_no_legs() {
        let route = Route::new(vec![node("a")], vec![]).unwrap();

        assert!(route.legs().is_empty());
        assert_eq!(route.total_distance_m(), 0.0);
        assert_eq!(route.transfers(), 0);
        assert_eq!(route.origin().id, route.destination().id);
    }

    #[test]
    fn empty_route_rejected() {
        assert_eq!(Route::new(vec![], vec![]).unwrap_err(), DomainError::EmptyRoute);
    }

    #[test]
    fn leg_count_must_match() {
        let (a, b) = (node("a"), node("b"));
        let err = Route::new(vec![a, b], vec![]).unwrap_err();
        assert_eq!(err, DomainError::LegCountMismatch { nodes: 2, legs: 0 });
    }

    #[test]
    fn disconnected_leg_rejected() {
        let (a, b, c) = (node("a"), node("b"), node("c"));
        let legs = vec![leg(&a, &b, Mode::Walk, 10.0), leg(&a, &c, Mode::Walk, 10.0)];

        let err = Route::new(vec![a, b, c], legs).unwrap_err();
        assert!(matches!(err, DomainError::DisconnectedLeg { index: 1, .. }));
    }

    #[test]
    fn repeated_node_rejected() {
        let (a, b) = (node("a"), node("b"));
        let legs = vec![leg(&a, &b, Mode::Walk, 10.0), leg(&b, &a, Mode::Walk, 10.0)];

        let err = Route::new(vec![a.clone(), b, a], legs).unwrap_err();
        assert_eq!(err, DomainError::RepeatedNode(NodeId::parse("a").unwrap()));
    }
}
