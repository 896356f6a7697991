//! Configuration for the route planner.

use std::time::Duration;

/// Configuration parameters for route planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of routes to return (k in the k-shortest search).
    pub max_routes: usize,

    /// Maximum distance (metres) from a query point to its snapped node.
    /// Queries with an endpoint farther than this return no routes.
    pub coverage_radius_m: f64,

    /// Maximum number of spur searches per query.
    /// The search stops early, keeping what it has, once this is reached.
    pub max_spur_searches: usize,

    /// Wall-clock budget for the path search (milliseconds).
    pub search_budget_ms: u64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_routes: usize,
        coverage_radius_m: f64,
        max_spur_searches: usize,
        search_budget_ms: u64,
    ) -> Self {
        Self {
            max_routes,
            coverage_radius_m,
            max_spur_searches,
            search_budget_ms,
        }
    }

    /// Returns the search budget as a Duration.
    pub fn search_budget(&self) -> Duration {
        Duration::from_millis(self.search_budget_ms)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_routes: 5,
            coverage_radius_m: 1500.0,
            max_spur_searches: 2_000,
            search_budget_ms: 2_000,
        }
    }
}
