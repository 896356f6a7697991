//! Leg travel-time estimation.
//!
//! The planner only needs a duration in seconds for a leg described by its
//! mode, length and departure time. Anything that can answer that question
//! (a fitted regression model, a lookup table, a remote service) plugs in
//! through the `Estimator` trait.

mod speed_model;

pub use speed_model::{SpeedModelEstimator, SpeedModelParams};

use crate::domain::{Departure, Mode};

/// Congestion zone used when the caller has no geo-fence information.
pub const DEFAULT_CONGESTION_ZONE: u8 = 1;

/// Errors from an estimator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimatorError {
    /// The backing model has not been loaded
    #[error("estimator not ready")]
    NotReady,

    /// The model returned something that is not a duration
    #[error("invalid prediction {value} for {mode} leg of {distance_m} m")]
    InvalidPrediction {
        mode: Mode,
        distance_m: f64,
        value: f64,
    },

    /// The model answered with a different number of predictions
    #[error("estimator returned {got} predictions for {expected} legs")]
    BatchSize { expected: usize, got: usize },

    /// Backend-specific failure
    #[error("estimator backend error: {0}")]
    Backend(String),

    /// Model parameters could not be loaded
    #[error("failed to load estimator: {0}")]
    Load(String),
}

/// Input features for one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegFeatures {
    pub mode: Mode,
    pub distance_m: f64,
    /// 0-23
    pub hour: u8,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u8,
    pub congestion_zone: u8,
}

impl LegFeatures {
    /// Features for a leg departing at `departure`, in the default zone.
    pub fn new(mode: Mode, distance_m: f64, departure: Departure) -> Self {
        Self {
            mode,
            distance_m,
            hour: departure.hour(),
            day_of_week: departure.weekday(),
            congestion_zone: DEFAULT_CONGESTION_ZONE,
        }
    }

    /// Reject a prediction that is negative or not finite.
    pub fn check(&self, value: f64) -> Result<f64, EstimatorError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(EstimatorError::InvalidPrediction {
                mode: self.mode,
                distance_m: self.distance_m,
                value,
            })
        }
    }
}

/// Predicts leg durations in seconds.
///
/// Implementations must be pure: the same features give the same answer.
pub trait Estimator: Send + Sync {
    fn estimate(&self, leg: &LegFeatures) -> Result<f64, EstimatorError>;

    /// Predict many legs at once, in input order.
    ///
    /// Backends with per-call overhead should override this.
    fn estimate_batch(&self, legs: &[LegFeatures]) -> Result<Vec<f64>, EstimatorError> {
        legs.iter().map(|leg| self.estimate(leg)).collect()
    }

    /// Whether the estimator can answer queries.
    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl Estimator for Fixed {
        fn estimate(&self, _leg: &LegFeatures) -> Result<f64, EstimatorError> {
            Ok(self.0)
        }
    }

    #[test]
    fn features_from_departure() {
        let f = LegFeatures::new(Mode::Bus, 800.0, Departure::new(18, 4).unwrap());
        assert_eq!(f.hour, 18);
        assert_eq!(f.day_of_week, 4);
        assert_eq!(f.congestion_zone, DEFAULT_CONGESTION_ZONE);
    }

    #[test]
    fn default_batch_preserves_order() {
        let legs = vec![LegFeatures::new(Mode::Walk, 1.0, Departure::default()); 3];
        assert_eq!(Fixed(42.0).estimate_batch(&legs).unwrap(), vec![42.0; 3]);
        assert!(Fixed(42.0).is_ready());
    }

    #[test]
    fn check_rejects_negative_and_nan() {
        let f = LegFeatures::new(Mode::Walk, 100.0, Departure::default());
        assert_eq!(f.check(0.0), Ok(0.0));
        assert!(matches!(f.check(-1.0), Err(EstimatorError::InvalidPrediction { .. })));
        assert!(f.check(f64::NAN).is_err());
        assert!(f.check(f64::INFINITY).is_err());
    }
}
