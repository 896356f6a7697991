//! Transport modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0}")]
pub struct InvalidMode(String);

/// How a leg is travelled.
///
/// Variant order doubles as the tie-break order when two parallel edges
/// project to the same search weight. Edges without an explicit mode are
/// walking links, hence the default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Metro,
    Bus,
    #[default]
    Walk,
}

impl Mode {
    /// All modes, in tie-break order.
    pub const ALL: [Mode; 3] = [Mode::Metro, Mode::Bus, Mode::Walk];

    /// Returns true for scheduled transit (bus or metro).
    pub fn is_transit(&self) -> bool {
        matches!(self, Mode::Bus | Mode::Metro)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Metro => "metro",
            Mode::Bus => "bus",
            Mode::Walk => "walk",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metro" => Ok(Mode::Metro),
            "bus" => Ok(Mode::Bus),
            "walk" => Ok(Mode::Walk),
            other => Err(InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
            assert_eq!(mode.to_string(), mode.as_str());
        }
        assert!("tram".parse::<Mode>().is_err());
        assert!("Bus".parse::<Mode>().is_err());
    }

    #[test]
    fn transit_modes() {
        assert!(Mode::Bus.is_transit());
        assert!(Mode::Metro.is_transit());
        assert!(!Mode::Walk.is_transit());
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Mode::Metro).unwrap(), "\"metro\"");
        assert_eq!(serde_json::from_str::<Mode>("\"walk\"").unwrap(), Mode::Walk);
    }

    #[test]
    fn tie_break_order() {
        assert!(Mode::Metro < Mode::Bus);
        assert!(Mode::Bus < Mode::Walk);
    }
}
