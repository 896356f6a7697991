//! Departure time handling.
//!
//! Routing only cares about the hour of day and the weekday of departure.
//! Requests carry an ISO-8601 timestamp; anything we cannot read falls back
//! to 10:00 on a Monday rather than failing the request.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::DomainError;

/// Hour used when the departure time is missing or unreadable.
pub const DEFAULT_HOUR: u8 = 10;

/// Weekday used when the departure time is missing or unreadable (Monday).
pub const DEFAULT_WEEKDAY: u8 = 0;

/// Naive timestamp layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Hour of day and weekday of a trip's departure.
///
/// Weekdays are numbered Monday-first: 0 = Monday ... 6 = Sunday.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Departure;
///
/// let dep = Departure::parse_or_default("2026-02-23T18:30:00");
/// assert_eq!(dep.hour(), 18);
/// assert_eq!(dep.weekday(), 0);
///
/// let fallback = Departure::parse_or_default("next tuesday");
/// assert_eq!(fallback, Departure::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Departure {
    hour: u8,
    weekday: u8,
}

impl Departure {
    /// Create a departure, validating hour (0-23) and weekday (0-6).
    pub fn new(hour: u8, weekday: u8) -> Result<Self, DomainError> {
        if hour > 23 {
            return Err(DomainError::InvalidHour(hour));
        }
        if weekday > 6 {
            return Err(DomainError::InvalidWeekday(weekday));
        }
        Ok(Self { hour, weekday })
    }

    /// Parse an ISO-8601 timestamp.
    ///
    /// Offsets are not applied: `18:30+05:30` departs at hour 18, the wall
    /// clock the caller wrote down. Returns `None` if nothing matches.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        let naive = DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.naive_local())
            .ok()
            .or_else(|| {
                NAIVE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;

        Some(Self::from_datetime(&naive))
    }

    /// Parse an ISO-8601 timestamp, falling back to 10:00 Monday.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Build from a naive date-time.
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            hour: dt.hour() as u8,
            weekday: dt.weekday().num_days_from_monday() as u8,
        }
    }

    /// Hour of day (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Day of week, Monday = 0.
    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    /// Returns true during the bus rush windows, 08-11 and 17-20 inclusive.
    pub fn is_rush_hour(&self) -> bool {
        is_rush_hour(self.hour)
    }
}

impl Default for Departure {
    fn default() -> Self {
        Self {
            hour: DEFAULT_HOUR,
            weekday: DEFAULT_WEEKDAY,
        }
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        write!(f, "{} {:02}:00", DAYS[self.weekday as usize], self.hour)
    }
}

/// Rush windows are inclusive on both ends.
pub fn is_rush_hour(hour: u8) -> bool {
    (8..=11).contains(&hour) || (17..=20).contains(&hour)
}
