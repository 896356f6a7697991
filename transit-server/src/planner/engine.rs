//! The route engine: snap, project, search, assemble, rank.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use super::assemble::assemble_route;
use super::config::PlannerConfig;
use super::rank::rank_routes;
use super::PlanError;
use super::yen::{SearchLimits, k_shortest_loopless_paths};
use crate::domain::{Departure, RankedRoute};
use crate::estimator::{Estimator, EstimatorError};
use crate::network::{Snap, SpatialError, TransitNetwork};

/// A point given by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One routing request.
#[derive(Debug, Clone, Copy)]
pub struct RouteQuery {
    pub source: Coordinate,
    pub destination: Coordinate,
    pub departure: Departure,
}

/// Why a plan did or did not produce routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    Found,
    /// An endpoint is farther than the coverage radius from any node
    NoCoverage,
    /// Both endpoints snapped but no path joins them
    NoPath,
}

/// Result of a successful plan.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// Ranked best-first; empty unless `outcome` is `Found`.
    pub routes: Vec<RankedRoute>,
    pub outcome: PlanOutcome,
    /// The path search stopped at its limits.
    pub truncated: bool,
}

impl PlanResult {
    fn empty(outcome: PlanOutcome) -> Self {
        Self {
            routes: Vec::new(),
            outcome,
            truncated: false,
        }
    }
}

/// Plans routes over a loaded network.
///
/// Cheap to share: the network and estimator are behind `Arc`, and each
/// query builds its own projection.
#[derive(Clone)]
pub struct RouteEngine {
    network: Arc<TransitNetwork>,
    estimator: Arc<dyn Estimator>,
    config: PlannerConfig,
}

impl RouteEngine {
    pub fn new(
        network: Arc<TransitNetwork>,
        estimator: Arc<dyn Estimator>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            network,
            estimator,
            config,
        }
    }

    pub fn network(&self) -> &TransitNetwork {
        &self.network
    }

    pub fn estimator(&self) -> &dyn Estimator {
        self.estimator.as_ref()
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan up to `max_routes` ranked routes for a query.
    ///
    /// Out-of-coverage endpoints and unconnected endpoints are not errors:
    /// they give an empty result with the matching `PlanOutcome`.
    pub fn plan(&self, query: &RouteQuery) -> Result<PlanResult, PlanError> {
        if !self.network.is_loaded() {
            return Err(PlanError::NotInitialized);
        }

        let source = self.snap(query.source)?;
        let target = self.snap(query.destination)?;
        debug!(
            source = %source.node,
            source_m = source.distance_m,
            target = %target.node,
            target_m = target.distance_m,
            "snapped endpoints"
        );

        let radius = self.config.coverage_radius_m;
        if source.distance_m > radius || target.distance_m > radius {
            debug!(radius, "endpoint outside coverage");
            return Ok(PlanResult::empty(PlanOutcome::NoCoverage));
        }

        let graph = &self.network.graph;
        let (Some(s), Some(t)) = (graph.index_of(&source.node), graph.index_of(&target.node))
        else {
            return Err(PlanError::NotInitialized);
        };

        let projection = graph.project_for_query(query.departure);
        let limits = SearchLimits {
            max_spur_searches: self.config.max_spur_searches,
            deadline: Some(Instant::now() + self.config.search_budget()),
        };
        let search = k_shortest_loopless_paths(&projection, s, t, self.config.max_routes, limits);

        if search.truncated {
            warn!(
                source = %source.node,
                target = %target.node,
                found = search.paths.len(),
                spur_searches = search.spur_searches,
                "path search truncated"
            );
        }
        if search.paths.is_empty() {
            debug!("no path between endpoints");
            return Ok(PlanResult::empty(PlanOutcome::NoPath));
        }
        debug!(
            paths = search.paths.len(),
            spur_searches = search.spur_searches,
            "found candidate paths"
        );

        let routes = search
            .paths
            .iter()
            .map(|path| assemble_route(graph, &projection, path))
            .collect::<Result<Vec<_>, _>>()?;

        if !self.estimator.is_ready() {
            return Err(EstimatorError::NotReady.into());
        }
        let ranked = rank_routes(routes, query.departure, self.estimator.as_ref()).inspect_err(
            |e| warn!(error = %e, "ranking failed"),
        )?;

        Ok(PlanResult {
            routes: ranked,
            outcome: PlanOutcome::Found,
            truncated: search.truncated,
        })
    }

    fn snap(&self, point: Coordinate) -> Result<Snap, PlanError> {
        self.network
            .spatial
            .nearest_node(point.lat, point.lng)
            .map_err(|e| match e {
                SpatialError::NotInitialized => PlanError::NotInitialized,
            })
    }
}
