//! Route scoring and ranking.
//!
//! Score is a cost in minutes, lower is better:
//!
//! ```text
//! score = total_time_sec / 60 + transfers * 10 + sum(mode penalty per leg)
//! ```
//!
//! The mode penalties express comfort: long walks are discouraged, metro is
//! preferred over bus.

use super::PlanError;
use crate::domain::{Departure, LegDuration, Mode, RankedRoute, Route, ceil_minutes};
use crate::estimator::{Estimator, EstimatorError, LegFeatures};

/// Penalty per transfer, in minutes.
pub const TRANSFER_PENALTY_MINS: f64 = 10.0;

/// Comfort penalty for one leg of `mode`, in minutes.
pub fn mode_penalty(mode: Mode) -> f64 {
    match mode {
        Mode::Bus => 5.0,
        Mode::Metro => 1.0,
        Mode::Walk => 15.0,
    }
}

/// Round to 2 decimal places, with ties (`x.xx5`) rounded away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Predict leg durations, score each route and sort best-first.
///
/// All legs of all routes go to the estimator in one batch. Routes with equal
/// scores keep their input order.
pub fn rank_routes(
    routes: Vec<Route>,
    departure: Departure,
    estimator: &dyn Estimator,
) -> Result<Vec<RankedRoute>, PlanError> {
    let features: Vec<LegFeatures> = routes
        .iter()
        .flat_map(Route::legs)
        .map(|leg| LegFeatures::new(leg.mode(), leg.length_m(), departure))
        .collect();

    let predictions = if features.is_empty() {
        Vec::new()
    } else {
        estimator.estimate_batch(&features)?
    };
    if predictions.len() != features.len() {
        return Err(EstimatorError::BatchSize {
            expected: features.len(),
            got: predictions.len(),
        }
        .into());
    }

    let mut predictions = features
        .iter()
        .zip(predictions)
        .map(|(f, seconds)| f.check(seconds));

    let mut ranked = Vec::with_capacity(routes.len());
    for route in routes {
        let mut durations = Vec::with_capacity(route.legs().len());
        for _ in route.legs() {
            let seconds = predictions.next().ok_or(EstimatorError::BatchSize {
                expected: features.len(),
                got: 0,
            })??;
            durations.push(LegDuration::from_seconds(seconds));
        }

        let total_time_sec: f64 = durations.iter().map(|d| d.seconds).sum();
        let penalty: f64 = route.modes().map(mode_penalty).sum();
        let score = total_time_sec / 60.0
            + route.transfers() as f64 * TRANSFER_PENALTY_MINS
            + penalty;

        ranked.push(RankedRoute {
            rank: 0,
            score: round2(score),
            total_time_sec,
            total_time_mins: ceil_minutes(total_time_sec),
            mode_penalty: penalty,
            route,
            durations,
        });
    }

    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
    for (i, r) in ranked.iter_mut().enumerate() {
        r.rank = i + 1;
    }

    Ok(ranked)
}
