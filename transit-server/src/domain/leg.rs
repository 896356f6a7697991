//! Route leg type.
//!
//! A `Leg` is one traversed edge of a route. It holds `Arc<Node>` endpoints
//! so that the many candidate routes built for one query share node data
//! with the loaded graph instead of copying it.

use std::sync::Arc;

use super::{DomainError, Mode, Node, NodeId};

/// One edge of a route, with its transport mode and length.
///
/// # Invariants
///
/// - `length_m` is finite and non-negative
/// - `from` and `to` are different nodes
#[derive(Debug, Clone)]
pub struct Leg {
    from: Arc<Node>,
    to: Arc<Node>,
    mode: Mode,
    length_m: f64,
}

impl Leg {
    /// Construct a leg, validating its length and endpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use transit_server::domain::{Leg, Mode, Node, NodeId, NodeKind};
    ///
    /// let a = Arc::new(Node::new(NodeId::parse("a").unwrap(), 18.51, 73.80, NodeKind::BusStop));
    /// let b = Arc::new(Node::new(NodeId::parse("b").unwrap(), 18.52, 73.81, NodeKind::BusStop));
    ///
    /// let leg = Leg::new(a.clone(), b.clone(), Mode::Bus, 320.0).unwrap();
    /// assert_eq!(leg.from_id().as_str(), "a");
    /// assert_eq!(leg.length_m(), 320.0);
    ///
    /// assert!(Leg::new(a.clone(), b, Mode::Walk, -1.0).is_err());
    /// assert!(Leg::new(a.clone(), a, Mode::Walk, 10.0).is_err());
    /// ```
    pub fn new(from: Arc<Node>, to: Arc<Node>, mode: Mode, length_m: f64) -> Result<Self, DomainError> {
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(DomainError::InvalidLength(length_m));
        }
        if from.id == to.id {
            return Err(DomainError::SelfLoop(from.id.clone()));
        }

        Ok(Self {
            from,
            to,
            mode,
            length_m,
        })
    }

    /// Returns the node this leg starts at.
    pub fn from(&self) -> &Arc<Node> {
        &self.from
    }

    /// Returns the node this leg ends at.
    pub fn to(&self) -> &Arc<Node> {
        &self.to
    }

    pub fn from_id(&self) -> &NodeId {
        &self.from.id
    }

    pub fn to_id(&self) -> &NodeId {
        &self.to.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Length of the underlying edge in metres.
    pub fn length_m(&self) -> f64 {
        self.length_m
    }
}

/// Predicted duration of a leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegDuration {
    /// Predicted duration in seconds, as returned by the estimator.
    pub seconds: f64,

    /// Duration rounded up to whole minutes.
    pub minutes: u32,
}

impl LegDuration {
    /// Create from a prediction in seconds, rounding minutes up.
    ///
    /// ```
    /// use transit_server::domain::LegDuration;
    ///
    /// assert_eq!(LegDuration::from_seconds(357.0).minutes, 6);
    /// assert_eq!(LegDuration::from_seconds(360.0).minutes, 6);
    /// assert_eq!(LegDuration::from_seconds(0.0).minutes, 0);
    /// ```
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds,
            minutes: ceil_minutes(seconds),
        }
    }
}

/// Seconds to whole minutes, rounding up.
pub(crate) fn ceil_minutes(seconds: f64) -> u32 {
    (seconds / 60.0).ceil().max(0.0) as u32
}
