//! Route planning.
//!
//! A query is answered in five stages:
//!
//! 1. snap both endpoints to their nearest network nodes, giving up if either
//!    is beyond the coverage radius;
//! 2. project the multigraph for the departure hour;
//! 3. find up to k loopless paths with Yen's algorithm over Dijkstra;
//! 4. assemble each path into legs;
//! 5. predict leg durations and rank the routes by score.

mod assemble;
mod config;
mod dijkstra;
mod engine;
mod rank;
mod yen;

pub use assemble::assemble_route;
pub use config::PlannerConfig;
pub use dijkstra::{ExclusionMask, Path, shortest_path};
pub use engine::{Coordinate, PlanOutcome, PlanResult, RouteEngine, RouteQuery};
pub use rank::{TRANSFER_PENALTY_MINS, mode_penalty, rank_routes, round2};
pub use yen::{PathSearch, SearchLimits, k_shortest_loopless_paths};

use crate::domain::{DomainError, NodeId};
use crate::estimator::EstimatorError;

/// Error from route planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// The network is not loaded
    #[error("route engine not initialised")]
    NotInitialized,

    /// The estimator failed or returned an invalid prediction
    #[error("estimator unavailable: {0}")]
    EstimatorUnavailable(#[from] EstimatorError),

    /// A path uses a node pair with no arc in the projection
    #[error("no arc from {from} to {to}")]
    MissingArc { from: NodeId, to: NodeId },

    /// A path could not be turned into a valid route
    #[error("invalid route: {0}")]
    InvalidRoute(#[from] DomainError),
}
