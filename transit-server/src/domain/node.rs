//! Network node types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned when parsing an invalid node identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node id: {reason}")]
pub struct InvalidNodeId {
    reason: &'static str,
}

/// Identifier of a stop or station in the transit network.
///
/// Ids are opaque strings such as `bus_1042` or `metro_aq_9`. They must be
/// non-empty and may not carry leading or trailing whitespace.
///
/// # Examples
///
/// ```
/// use transit_server::domain::NodeId;
///
/// let id = NodeId::parse("metro_aq_9").unwrap();
/// assert_eq!(id.as_str(), "metro_aq_9");
///
/// assert!(NodeId::parse("").is_err());
/// assert!(NodeId::parse(" bus_1").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Parse a node id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidNodeId> {
        Self::try_from(s.to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeId {
    type Error = InvalidNodeId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Err(InvalidNodeId {
                reason: "must not be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidNodeId {
                reason: "must not have surrounding whitespace",
            });
        }
        Ok(NodeId(s))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of stop a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    BusStop,
    MetroStation,
}

impl NodeKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::BusStop => "bus_stop",
            NodeKind::MetroStation => "metro_station",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stop or station in the transit network.
///
/// Anything beyond id, position and kind (name, line, stop code, ...) is kept
/// verbatim in `attributes` so that it survives a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Node {
    /// Create a node with no extra attributes.
    pub fn new(id: NodeId, lat: f64, lon: f64, kind: NodeKind) -> Self {
        Self {
            id,
            lat,
            lon,
            kind,
            attributes: Map::new(),
        }
    }

    /// Add a string attribute.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Returns a string attribute, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Display name of the stop.
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    /// Returns true if the coordinates are finite and within WGS84 bounds.
    pub fn has_valid_position(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}
