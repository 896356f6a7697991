//! Turning node sequences into routes.

use super::PlanError;
use super::dijkstra::Path;
use crate::domain::{Leg, Route};
use crate::network::{Projection, TransitGraph};

/// Build a `Route` from a path, one leg per consecutive node pair.
///
/// Each leg takes the mode and length of the arc the projection kept for
/// that pair.
pub fn assemble_route(
    graph: &TransitGraph,
    projection: &Projection,
    path: &Path,
) -> Result<Route, PlanError> {
    let nodes: Vec<_> = path.nodes.iter().map(|&i| graph.node(i).clone()).collect();

    let legs = path
        .nodes
        .windows(2)
        .map(|pair| -> Result<Leg, PlanError> {
            let (from, to) = (pair[0], pair[1]);
            let arc = projection.edge(from, to).ok_or_else(|| PlanError::MissingArc {
                from: graph.node(from).id.clone(),
                to: graph.node(to).id.clone(),
            })?;
            Ok(Leg::new(
                graph.node(from).clone(),
                graph.node(to).clone(),
                arc.mode,
                arc.length_m,
            )?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route::new(nodes, legs)?)
}
