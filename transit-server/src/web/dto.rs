//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Departure, Leg, LegDuration, Mode, Node, RankedRoute};
use crate::planner::{Coordinate, RouteQuery, round2};

/// A point on the map.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PointDto {
    pub lat: f64,
    pub lng: f64,
}

/// Request to search for routes.
#[derive(Debug, Deserialize)]
pub struct RouteSearchRequest {
    pub source: PointDto,
    pub destination: PointDto,

    /// ISO-8601 departure time; missing or unparsable means 10:00 Monday
    #[serde(default)]
    pub departure_time: Option<String>,
}

impl RouteSearchRequest {
    /// Check coordinates and build the planner query.
    pub fn to_query(&self) -> Result<RouteQuery, String> {
        for (name, p) in [("source", self.source), ("destination", self.destination)] {
            let valid = p.lat.is_finite()
                && p.lng.is_finite()
                && (-90.0..=90.0).contains(&p.lat)
                && (-180.0..=180.0).contains(&p.lng);
            if !valid {
                return Err(format!("invalid {name} coordinates ({}, {})", p.lat, p.lng));
            }
        }

        let departure = self
            .departure_time
            .as_deref()
            .map(Departure::parse_or_default)
            .unwrap_or_default();

        Ok(RouteQuery {
            source: Coordinate::new(self.source.lat, self.source.lng),
            destination: Coordinate::new(self.destination.lat, self.destination.lng),
            departure,
        })
    }
}

/// Response for a route search.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    /// Ranked best-first
    pub routes: Vec<RouteResult>,
}

/// A ranked route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub rank: usize,
    pub score: f64,
    pub total_time_mins: u32,
    pub total_distance_m: f64,
    pub transfers: usize,
    pub legs: Vec<LegResult>,
}

/// One leg of a route. Endpoints carry the full node record so clients can
/// draw the leg.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub from_node: Node,
    pub to_node: Node,
    pub mode: Mode,
    pub length_m: f64,
    pub duration_sec: f64,
    pub duration_mins: u32,
}

/// Response for the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub graph_nodes: usize,
    pub estimator_ready: bool,
}

/// Response for the stop listing.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<Node>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl RouteResult {
    /// Create from a ranked route. Lengths and durations are rounded to
    /// 2 decimal places.
    pub fn from_ranked(ranked: &RankedRoute) -> Self {
        Self {
            rank: ranked.rank,
            score: ranked.score,
            total_time_mins: ranked.total_time_mins,
            total_distance_m: round2(ranked.route.total_distance_m()),
            transfers: ranked.route.transfers(),
            legs: ranked
                .scored_legs()
                .map(|(leg, duration)| LegResult::from_leg(leg, duration))
                .collect(),
        }
    }
}

impl LegResult {
    pub fn from_leg(leg: &Leg, duration: &LegDuration) -> Self {
        Self {
            from_node: Node::clone(leg.from()),
            to_node: Node::clone(leg.to()),
            mode: leg.mode(),
            length_m: round2(leg.length_m()),
            duration_sec: round2(duration.seconds),
            duration_mins: duration.minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NodeId, NodeKind, Route};
    use std::sync::Arc;

    fn node(id: &str) -> Arc<Node> {
        Arc::new(Node::new(NodeId::parse(id).unwrap(), 18.5, 73.8, NodeKind::BusStop))
    }

    fn request(json: &str) -> RouteSearchRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn departure_time_is_optional() {
        let req = request(r#"{"source": {"lat": 18.5, "lng": 73.8}, "destination": {"lat": 18.6, "lng": 73.9}}"#);
        let query = req.to_query().unwrap();
        assert_eq!(query.departure, Departure::default());
        assert_eq!(query.destination, Coordinate::new(18.6, 73.9));
    }

    #[test]
    fn departure_time_is_parsed() {
        let req = request(
            r#"{"source": {"lat": 18.5, "lng": 73.8}, "destination": {"lat": 18.6, "lng": 73.9},
                "departure_time": "2026-02-23T18:30:00"}"#,
        );
        let query = req.to_query().unwrap();
        assert_eq!(query.departure.hour(), 18);
        assert_eq!(query.departure.weekday(), 0);
    }

    #[test]
    fn garbage_departure_time_falls_back() {
        let req = request(
            r#"{"source": {"lat": 18.5, "lng": 73.8}, "destination": {"lat": 18.6, "lng": 73.9},
                "departure_time": "soon"}"#,
        );
        assert_eq!(req.to_query().unwrap().departure, Departure::default());
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let req = request(r#"{"source": {"lat": 95.0, "lng": 73.8}, "destination": {"lat": 18.6, "lng": 73.9}}"#);
        let err = req.to_query().unwrap_err();
        assert!(err.contains("source"));
    }

    #[test]
    fn route_result_json_shape() {
        let a = node("a");
        let b = Arc::new(Node::clone(&node("b")).with_attribute("name", "Deccan"));
        let leg = Leg::new(a.clone(), b.clone(), Mode::Walk, 500.004).unwrap();
        let route = Route::new(vec![a, b], vec![leg]).unwrap();
        let ranked = RankedRoute {
            rank: 1,
            score: 20.95,
            total_time_sec: 357.0,
            total_time_mins: 6,
            mode_penalty: 15.0,
            route,
            durations: vec![LegDuration::from_seconds(357.0)],
        };

        let json = serde_json::to_value(RouteResult::from_ranked(&ranked)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rank": 1,
                "score": 20.95,
                "total_time_mins": 6,
                "total_distance_m": 500.0,
                "transfers": 0,
                "legs": [{
                    "from_node": {"id": "a", "lat": 18.5, "lon": 73.8, "type": "bus_stop"},
                    "to_node": {"id": "b", "lat": 18.5, "lon": 73.8, "type": "bus_stop", "name": "Deccan"},
                    "mode": "walk",
                    "length_m": 500.0,
                    "duration_sec": 357.0,
                    "duration_mins": 6
                }]
            })
        );
    }
}
