//! Closed-form speed model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Estimator, EstimatorError, LegFeatures};
use crate::domain::{Mode, is_rush_hour};

/// Speeds and traffic factors for `SpeedModelEstimator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedModelParams {
    pub metro_speed_mps: f64,
    pub walk_speed_mps: f64,
    pub bus_speed_mps: f64,
    /// Bus speed multiplier inside the rush windows.
    pub bus_rush_factor: f64,
    /// Fractional bus slowdown per congestion zone.
    pub bus_zone_slowdown: f64,
    /// Lower bound on any speed.
    pub min_speed_mps: f64,
}

impl Default for SpeedModelParams {
    fn default() -> Self {
        Self {
            metro_speed_mps: 10.0,
            walk_speed_mps: 1.4,
            bus_speed_mps: 5.0,
            bus_rush_factor: 0.5,
            bus_zone_slowdown: 0.1,
            min_speed_mps: 1.0,
        }
    }
}

impl SpeedModelParams {
    fn validate(&self) -> Result<(), EstimatorError> {
        let speeds = [
            ("metro_speed_mps", self.metro_speed_mps),
            ("walk_speed_mps", self.walk_speed_mps),
            ("bus_speed_mps", self.bus_speed_mps),
            ("bus_rush_factor", self.bus_rush_factor),
            ("min_speed_mps", self.min_speed_mps),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value <= 0.0 {
                return Err(EstimatorError::Load(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.bus_zone_slowdown.is_finite() || self.bus_zone_slowdown < 0.0 {
            return Err(EstimatorError::Load(format!(
                "bus_zone_slowdown must be non-negative, got {}",
                self.bus_zone_slowdown
            )));
        }
        Ok(())
    }
}

/// Travel time as distance over a mode speed.
///
/// Buses slow down in the rush windows and in busier congestion zones;
/// metro and walking ignore traffic. Every speed is floored at
/// `min_speed_mps`.
///
/// ```
/// use transit_server::domain::{Departure, Mode};
/// use transit_server::estimator::{Estimator, LegFeatures, SpeedModelEstimator};
///
/// let model = SpeedModelEstimator::default();
/// let leg = LegFeatures::new(Mode::Metro, 2000.0, Departure::default());
/// assert_eq!(model.estimate(&leg).unwrap(), 200.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpeedModelEstimator {
    params: SpeedModelParams,
}

impl SpeedModelEstimator {
    pub fn new(params: SpeedModelParams) -> Result<Self, EstimatorError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, EstimatorError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EstimatorError::Load(format!("{}: {e}", path.display())))?;
        let params = serde_json::from_str(&contents)
            .map_err(|e| EstimatorError::Load(format!("{}: {e}", path.display())))?;
        Self::new(params)
    }

    pub fn params(&self) -> &SpeedModelParams {
        &self.params
    }

    fn speed(&self, leg: &LegFeatures) -> f64 {
        let p = &self.params;
        let speed = match leg.mode {
            Mode::Metro => p.metro_speed_mps,
            Mode::Walk => p.walk_speed_mps,
            Mode::Bus => {
                let rush = if is_rush_hour(leg.hour) { p.bus_rush_factor } else { 1.0 };
                let zone = 1.0 - p.bus_zone_slowdown * f64::from(leg.congestion_zone);
                p.bus_speed_mps * rush * zone
            }
        };
        speed.max(p.min_speed_mps)
    }
}

impl Estimator for SpeedModelEstimator {
    fn estimate(&self, leg: &LegFeatures) -> Result<f64, EstimatorError> {
        leg.check(leg.distance_m / self.speed(leg))
    }
}
