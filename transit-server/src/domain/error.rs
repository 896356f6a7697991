//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from graph-loading and estimator errors.

use super::NodeId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Hour of day outside 0-23
    #[error("invalid hour {0}: must be 0-23")]
    InvalidHour(u8),

    /// Weekday outside 0-6
    #[error("invalid weekday {0}: must be 0 (Monday) to 6 (Sunday)")]
    InvalidWeekday(u8),

    /// Leg length is negative or not a number
    #[error("invalid leg length {0}")]
    InvalidLength(f64),

    /// Leg starts and ends at the same node
    #[error("leg from {0} to itself")]
    SelfLoop(NodeId),

    /// Route has no nodes at all
    #[error("route must visit at least one node")]
    EmptyRoute,

    /// Number of legs doesn't match the number of nodes
    #[error("route with {nodes} nodes cannot have {legs} legs")]
    LegCountMismatch { nodes: usize, legs: usize },

    /// A leg doesn't continue from where the previous one ended
    #[error("leg {index} does not connect {from} to {to}")]
    DisconnectedLeg {
        index: usize,
        from: NodeId,
        to: NodeId,
    },

    /// Route visits the same node twice
    #[error("route visits {0} more than once")]
    RepeatedNode(NodeId),
}
