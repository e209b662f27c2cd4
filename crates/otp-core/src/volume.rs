//! Target volume of a scheduled workout
//!
//! Either a share of the template's volume (`"80%"`) or an absolute
//! [`WorkoutMeasure`]. Anything ending in `%` is a percentage.

use crate::codec::{parse_decimal, scalar_serde, ScalarCodec};
use crate::measure::WorkoutMeasure;
use otp_remote::DecodeError;

/// How much of a workout to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetVolume {
    /// Fraction of the template volume (`0.08` for `"8%"`)
    Percentage(f64),
    /// Fixed duration or distance
    Absolute(WorkoutMeasure),
}

impl TargetVolume {
    /// Create percentage volume from a fraction
    #[inline]
    #[must_use]
    pub fn fraction(fraction: f64) -> Self {
        Self::Percentage(fraction)
    }
}

impl ScalarCodec for TargetVolume {
    const KIND: &'static str = "target volume";

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        match raw.strip_suffix('%') {
            Some(number) => parse_decimal(number)
                .map(|percent| Self::Percentage(percent / 100.0))
                .ok_or_else(|| Self::invalid(raw)),
            None => WorkoutMeasure::decode(raw)
                .map(Self::Absolute)
                .map_err(|_| Self::invalid(raw)),
        }
    }

    fn encode(&self) -> String {
        match self {
            Self::Percentage(fraction) => {
                let percent = (fraction * 100.0 * 1e6).round() / 1e6;
                format!("{}%", percent)
            }
            Self::Absolute(measure) => measure.encode(),
        }
    }
}

scalar_serde!(TargetVolume);
