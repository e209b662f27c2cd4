//! Workout intensity
//!
//! Accepted forms, tried in order:
//! 1. text: `"0.65vo2max"`, `"0.8 hr_max"`
//! 2. direct object: `{"value": 0.65, "metric": "vo2max"}`
//! 3. zone reference: `{"zoneCode": "T", "zoneSystem": <system or locator>}`
//!
//! A zone reference without `zoneSystem` uses the plan's zone system. After
//! resolution every intensity carries its computed zone: the zone of the
//! system in effect whose target and metric exactly equal the intensity's.

use crate::codec::{scalar_serde, split_suffix, ScalarCodec};
use crate::context::ActiveZoneSystem;
use crate::error::{PlanError, ZoneError};
use crate::zone::{IntensityMetric, ZoneDefinition, ZoneSystem};
use async_trait::async_trait;
use otp_remote::{DecodeContext, DecodeError, Locator, RemoteDecoder, RemoteResource, Resolvable, ResolveError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// An intensity measured directly against a metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityValue {
    /// Fraction of the metric
    pub value: f64,
    /// Metric
    pub metric: IntensityMetric,
}

impl IntensityValue {
    /// Create intensity value
    #[inline]
    #[must_use]
    pub fn new(value: f64, metric: IntensityMetric) -> Self {
        Self { value, metric }
    }
}

impl ScalarCodec for IntensityValue {
    const KIND: &'static str = "intensity";

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        let (value, suffix) = split_suffix(raw).ok_or_else(|| Self::invalid(raw))?;
        let metric = IntensityMetric::from_suffix(suffix).ok_or_else(|| Self::invalid(raw))?;
        Ok(Self { value, metric })
    }

    fn encode(&self) -> String {
        format!("{}{}", self.value, self.metric.suffix())
    }
}

scalar_serde!(IntensityValue);

/// How an intensity was written
#[derive(Debug, Clone, PartialEq)]
pub enum IntensityTarget {
    /// Value and metric given directly
    Direct(IntensityValue),
    /// Zone named by code
    Zone {
        /// Zone code
        code: String,
        /// Zone system named next to the code, if any
        zone_system: RemoteResource<ZoneSystem>,
    },
}

#[derive(Deserialize)]
struct DirectForm {
    value: f64,
    metric: IntensityMetric,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZoneForm {
    zone_code: String,
    #[serde(default, skip_serializing_if = "RemoteResource::is_empty")]
    zone_system: RemoteResource<ZoneSystem>,
}

impl IntensityTarget {
    fn from_value(raw: Value) -> Result<Self, DecodeError> {
        if let Value::String(text) = &raw {
            return IntensityValue::decode(text).map(Self::Direct);
        }

        let has_key = |key: &str| raw.as_object().is_some_and(|object| object.contains_key(key));
        if has_key("value") {
            let direct: DirectForm =
                serde_json::from_value(raw).map_err(|e| DecodeError::Schema(format!("intensity: {}", e)))?;
            if !direct.value.is_finite() {
                return Err(IntensityValue::invalid(&direct.value.to_string()));
            }
            return Ok(Self::Direct(IntensityValue::new(direct.value, direct.metric)));
        }
        if has_key("zoneCode") {
            let zone: ZoneForm =
                serde_json::from_value(raw).map_err(|e| DecodeError::Schema(format!("intensity: {}", e)))?;
            return Ok(Self::Zone {
                code: zone.zone_code,
                zone_system: zone.zone_system,
            });
        }

        Err(IntensityValue::invalid(&raw.to_string()))
    }
}

/// Intensity as decoded from a document
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityDoc {
    target: IntensityTarget,
    active: RemoteResource<ZoneSystem>,
    zone: Option<ZoneDefinition>,
}

impl IntensityDoc {
    /// Create direct intensity
    #[must_use]
    pub fn direct(value: f64, metric: IntensityMetric) -> Self {
        Self::from(IntensityTarget::Direct(IntensityValue::new(value, metric)))
    }

    /// Create zone reference
    #[must_use]
    pub fn zone_ref(code: impl Into<String>, zone_system: RemoteResource<ZoneSystem>) -> Self {
        Self::from(IntensityTarget::Zone {
            code: code.into(),
            zone_system,
        })
    }

    /// Form the intensity was written in
    #[inline]
    #[must_use]
    pub fn target(&self) -> &IntensityTarget {
        &self.target
    }

    /// Zone computed during resolution
    #[inline]
    #[must_use]
    pub fn zone(&self) -> Option<&ZoneDefinition> {
        self.zone.as_ref()
    }

    /// Zone system this intensity is classified against
    #[must_use]
    pub fn zone_system(&self) -> Option<&ZoneSystem> {
        self.system_cell().value()
    }

    fn system_cell(&self) -> &RemoteResource<ZoneSystem> {
        match &self.target {
            IntensityTarget::Zone { zone_system, .. } if !zone_system.is_empty() => zone_system,
            _ => &self.active,
        }
    }

    fn system_cell_mut(&mut self) -> &mut RemoteResource<ZoneSystem> {
        match &mut self.target {
            IntensityTarget::Zone { zone_system, .. } if !zone_system.is_empty() => zone_system,
            _ => &mut self.active,
        }
    }

    fn pending_system(&self) -> Option<&Locator> {
        let cell = self.system_cell();
        if cell.is_pending() {
            cell.locator()
        } else {
            None
        }
    }

    fn classify(&self) -> Result<Option<ZoneDefinition>, ZoneError> {
        let system = self.zone_system();
        match &self.target {
            IntensityTarget::Direct(direct) => Ok(system
                .and_then(|s| s.zone_for_intensity(direct.value, direct.metric))
                .cloned()),
            IntensityTarget::Zone { code, .. } => {
                let system = system.ok_or_else(|| ZoneError::NoZoneSystem(code.clone()))?;
                system.zone(code).map(|zone| Some(zone.clone()))
            }
        }
    }
}

impl From<IntensityTarget> for IntensityDoc {
    fn from(target: IntensityTarget) -> Self {
        Self {
            target,
            active: RemoteResource::Empty,
            zone: None,
        }
    }
}

impl Serialize for IntensityDoc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.target {
            IntensityTarget::Direct(direct) => serializer.serialize_str(&direct.encode()),
            IntensityTarget::Zone { code, zone_system } => ZoneForm {
                zone_code: code.clone(),
                zone_system: zone_system.clone(),
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for IntensityDoc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        IntensityTarget::from_value(raw)
            .map(Self::from)
            .map_err(D::Error::custom)
    }
}

#[async_trait]
impl Resolvable for IntensityDoc {
    fn bind(&mut self, context: &DecodeContext) {
        self.active = context
            .get::<ActiveZoneSystem>()
            .map(|active| active.zone_system().clone())
            .unwrap_or_default();
        self.system_cell_mut().bind(context);
    }

    async fn resolve(&mut self, decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        self.system_cell_mut().resolve(decoder).await?;
        self.zone = self.classify()?;
        Ok(())
    }
}

/// Resolved intensity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intensity {
    /// Fraction of the metric
    pub value: f64,
    /// Metric
    pub metric: IntensityMetric,
    /// Zone the intensity falls in
    #[serde(
        rename = "zoneCode",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_zone_code"
    )]
    pub zone: Option<ZoneDefinition>,
}

#[allow(clippy::ref_option)]
fn serialize_zone_code<S: Serializer>(
    zone: &Option<ZoneDefinition>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    zone.as_ref().map(|zone| zone.code.as_str()).serialize(serializer)
}

impl Intensity {
    /// Create direct intensity without a zone
    #[inline]
    #[must_use]
    pub fn new(value: f64, metric: IntensityMetric) -> Self {
        Self {
            value,
            metric,
            zone: None,
        }
    }

    /// Create intensity at the target of a zone
    ///
    /// # Errors
    /// [`ZoneError::ZoneNotFound`] if `system` has no zone `code`.
    pub fn from_zone(system: &ZoneSystem, code: &str) -> Result<Self, ZoneError> {
        let zone = system.zone(code)?;
        Ok(Self {
            value: zone.target_intensity,
            metric: zone.metric,
            zone: Some(zone.clone()),
        })
    }

    /// Code of the computed zone
    #[must_use]
    pub fn zone_code(&self) -> Option<&str> {
        self.zone.as_ref().map(|zone| zone.code.as_str())
    }
}

impl TryFrom<IntensityDoc> for Intensity {
    type Error = PlanError;

    fn try_from(doc: IntensityDoc) -> Result<Self, Self::Error> {
        if let Some(locator) = doc.pending_system() {
            return Err(PlanError::unresolved("zoneSystem")(locator.clone()));
        }
        let zone = doc.classify()?;
        Ok(match doc.target {
            IntensityTarget::Direct(direct) => Self {
                value: direct.value,
                metric: direct.metric,
                zone,
            },
            IntensityTarget::Zone { .. } => match zone {
                Some(zone) => Self {
                    value: zone.target_intensity,
                    metric: zone.metric,
                    zone: Some(zone),
                },
                None => return Err(PlanError::Missing("zone")),
            },
        })
    }
}
