//! Workout measures - how long or how far
//!
//! Wire forms:
//! - time: `"H:MM:SS"` or `"M:SS"` (`"1:30:00"`, `"30:00"`)
//! - distance: `"<number><optional space><unit>"` (`"5 km"`, `"400m"`)
//!
//! Time is tried first, so `"30:00"` is always a duration.

use crate::codec::{format_trimmed, scalar_serde, split_suffix, ScalarCodec};
use once_cell::sync::Lazy;
use otp_remote::DecodeError;
use regex::Regex;
use std::time::Duration;

/// `M:SS` or `H:MM:SS`, components unbounded
static TIME_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^([0-9]+):([0-9]+)(?::([0-9]+))?$").ok());

/// Unit of a distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceUnit {
    /// Kilometers (`km`)
    Kilometers,
    /// Meters (`m`)
    Meters,
    /// Statute miles (`mi`)
    Miles,
}

impl DistanceUnit {
    /// Canonical symbol
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Kilometers => "km",
            Self::Meters => "m",
            Self::Miles => "mi",
        }
    }

    /// Unit for a symbol or plural name, ignoring ASCII case
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "km" | "kilometers" => Some(Self::Kilometers),
            "m" | "meters" => Some(Self::Meters),
            "mi" | "miles" => Some(Self::Miles),
            _ => None,
        }
    }

    /// Length of one unit in meters
    #[must_use]
    pub fn meters(self) -> f64 {
        match self {
            Self::Kilometers => 1000.0,
            Self::Meters => 1.0,
            Self::Miles => 1609.344,
        }
    }
}

/// A distance in a given unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    value: f64,
    unit: DistanceUnit,
}

impl Distance {
    /// Create distance
    #[inline]
    #[must_use]
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    /// Amount in `unit`
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Unit as written
    #[inline]
    #[must_use]
    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Distance in meters
    #[must_use]
    pub fn to_meters(&self) -> f64 {
        self.value * self.unit.meters()
    }
}

/// Duration or distance of a workout part
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutMeasure {
    /// Elapsed time
    Time(Duration),
    /// Covered distance
    Distance(Distance),
}

impl WorkoutMeasure {
    /// Create time measure from whole seconds
    #[inline]
    #[must_use]
    pub fn seconds(seconds: u64) -> Self {
        Self::Time(Duration::from_secs(seconds))
    }

    /// Create distance measure
    #[inline]
    #[must_use]
    pub fn distance(value: f64, unit: DistanceUnit) -> Self {
        Self::Distance(Distance::new(value, unit))
    }

    /// Duration, if this is a time measure
    #[must_use]
    pub fn time_value(&self) -> Option<Duration> {
        match self {
            Self::Time(duration) => Some(*duration),
            Self::Distance(_) => None,
        }
    }

    /// Distance, if this is a distance measure
    #[must_use]
    pub fn distance_value(&self) -> Option<Distance> {
        match self {
            Self::Distance(distance) => Some(*distance),
            Self::Time(_) => None,
        }
    }
}

fn parse_time(raw: &str) -> Option<Duration> {
    let captures = TIME_RE.as_ref()?.captures(raw)?;

    let mut seconds: u64 = 0;
    for part in captures.iter().skip(1).flatten() {
        let component: u64 = part.as_str().parse().ok()?;
        seconds = seconds.checked_mul(60)?.checked_add(component)?;
    }
    Some(Duration::from_secs(seconds))
}

fn format_time(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = total / 60 % 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

fn parse_distance(raw: &str) -> Option<Distance> {
    let (value, unit) = split_suffix(raw)?;
    DistanceUnit::from_name(unit).map(|unit| Distance::new(value, unit))
}

impl ScalarCodec for WorkoutMeasure {
    const KIND: &'static str = "measure";

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        if let Some(duration) = parse_time(raw) {
            return Ok(Self::Time(duration));
        }
        parse_distance(raw)
            .map(Self::Distance)
            .ok_or_else(|| Self::invalid(raw))
    }

    fn encode(&self) -> String {
        match self {
            Self::Time(duration) => format_time(*duration),
            Self::Distance(distance) => {
                format!("{} {}", format_trimmed(distance.value, 2), distance.unit.symbol())
            }
        }
    }
}

scalar_serde!(WorkoutMeasure);
