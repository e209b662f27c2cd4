//! Training zone systems
//!
//! A [`ZoneSystem`] maps short codes (`"E"`, `"T"`, `"Z2"`) to
//! [`ZoneDefinition`]s. On the wire the zones are an object keyed by code;
//! every key must equal the code of the definition it holds.

use crate::error::ZoneError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Metric an intensity is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntensityMetric {
    /// Fraction of VO2max
    #[serde(rename = "vo2max")]
    Vo2Max,
    /// Fraction of maximum heart rate
    #[serde(rename = "hr_max")]
    HrMax,
}

impl IntensityMetric {
    /// All metrics
    pub const ALL: [Self; 2] = [Self::Vo2Max, Self::HrMax];

    /// Wire suffix (`vo2max`, `hr_max`)
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Vo2Max => "vo2max",
            Self::HrMax => "hr_max",
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Vo2Max => "VO2max",
            Self::HrMax => "Maximum Heart Rate",
        }
    }

    /// Metric for a suffix, ignoring ASCII case
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.suffix().eq_ignore_ascii_case(suffix))
    }
}

impl Display for IntensityMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Closed intensity interval, written as `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct IntensityRange {
    lower: f64,
    upper: f64,
}

impl IntensityRange {
    /// Create range
    ///
    /// # Errors
    /// [`ZoneError::InvalidRange`] if `lower > upper` or either bound is not finite.
    pub fn new(lower: f64, upper: f64) -> Result<Self, ZoneError> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(ZoneError::InvalidRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Lower bound
    #[inline]
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound
    #[inline]
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Check if `value` lies inside the range
    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl TryFrom<(f64, f64)> for IntensityRange {
    type Error = ZoneError;

    fn try_from((lower, upper): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lower, upper)
    }
}

impl From<IntensityRange> for (f64, f64) {
    fn from(range: IntensityRange) -> Self {
        (range.lower, range.upper)
    }
}

/// One training zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDefinition {
    /// Short code (`"E"`, `"T"`)
    pub code: String,
    /// Full name
    pub name: String,
    /// Description of the zone's purpose
    pub description: String,
    /// Metric the zone is defined by
    pub metric: IntensityMetric,
    /// Target intensity as a fraction of the metric
    pub target_intensity: f64,
    /// Accepted intensity range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_range: Option<IntensityRange>,
}

impl ZoneDefinition {
    /// Create zone without a range
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        metric: IntensityMetric,
        target_intensity: f64,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
            metric,
            target_intensity,
            intensity_range: None,
        }
    }

    /// Builder: set intensity range
    #[must_use]
    pub fn with_range(mut self, range: IntensityRange) -> Self {
        self.intensity_range = Some(range);
        self
    }
}

/// Named set of zones, unique by code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ZoneSystemDoc", into = "ZoneSystemDoc")]
pub struct ZoneSystem {
    name: String,
    description: Option<String>,
    zones: BTreeMap<String, ZoneDefinition>,
}

#[derive(Serialize, Deserialize)]
struct ZoneSystemDoc {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    zones: BTreeMap<String, ZoneDefinition>,
}

impl TryFrom<ZoneSystemDoc> for ZoneSystem {
    type Error = ZoneError;

    fn try_from(doc: ZoneSystemDoc) -> Result<Self, Self::Error> {
        if let Some((key, zone)) = doc.zones.iter().find(|(key, zone)| **key != zone.code) {
            return Err(ZoneError::CodeMismatch {
                key: key.clone(),
                code: zone.code.clone(),
            });
        }
        Ok(Self {
            name: doc.name,
            description: doc.description,
            zones: doc.zones,
        })
    }
}

impl From<ZoneSystem> for ZoneSystemDoc {
    fn from(system: ZoneSystem) -> Self {
        Self {
            name: system.name,
            description: system.description,
            zones: system.zones,
        }
    }
}

impl ZoneSystem {
    /// Create system from zone definitions
    ///
    /// # Errors
    /// [`ZoneError::DuplicateCode`] if two zones share a code.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        zones: impl IntoIterator<Item = ZoneDefinition>,
    ) -> Result<Self, ZoneError> {
        let mut by_code = BTreeMap::new();
        for zone in zones {
            if by_code.contains_key(&zone.code) {
                return Err(ZoneError::DuplicateCode(zone.code));
            }
            by_code.insert(zone.code.clone(), zone);
        }
        Ok(Self {
            name: name.into(),
            description,
            zones: by_code,
        })
    }

    /// System name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// System description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of zones
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check if the system has no zones
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone by code
    ///
    /// # Errors
    /// [`ZoneError::ZoneNotFound`] if no zone has `code`.
    pub fn zone(&self, code: &str) -> Result<&ZoneDefinition, ZoneError> {
        self.zones
            .get(code)
            .ok_or_else(|| ZoneError::ZoneNotFound(code.to_string()))
    }

    /// Zone whose target exactly equals `value` for `metric`
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn zone_for_intensity(&self, value: f64, metric: IntensityMetric) -> Option<&ZoneDefinition> {
        self.all_zones()
            .into_iter()
            .find(|zone| zone.metric == metric && zone.target_intensity == value)
    }

    /// All zones, ascending by target intensity
    #[must_use]
    pub fn all_zones(&self) -> Vec<&ZoneDefinition> {
        let mut zones: Vec<_> = self.zones.values().collect();
        zones.sort_by(|a, b| a.target_intensity.total_cmp(&b.target_intensity));
        zones
    }
}

otp_remote::resolvable!(ZoneSystem);
