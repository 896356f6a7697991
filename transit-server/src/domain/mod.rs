//! Domain types for the transit route planner.
//!
//! This module contains the core domain model: network nodes, transport
//! modes, legs and routes. Types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod error;
mod leg;
mod mode;
mod node;
mod route;
mod time;
mod transfers;

pub use error::DomainError;
pub use leg::{Leg, LegDuration};
pub(crate) use leg::ceil_minutes;
pub use mode::{InvalidMode, Mode};
pub use node::{InvalidNodeId, Node, NodeId, NodeKind};
pub use route::{RankedRoute, Route};
pub use time::{DEFAULT_HOUR, DEFAULT_WEEKDAY, Departure, is_rush_hour};
pub use transfers::{count_mode_transfers, count_transfers};
