//! Web layer for the transit route planner.
//!
//! Provides the JSON API under `/api/v1`: health, stop listing and route
//! search.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
