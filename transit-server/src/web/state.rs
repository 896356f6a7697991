//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::RouteEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route engine over the loaded network
    pub engine: Arc<RouteEngine>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: RouteEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
