//! Workout templates
//!
//! A template is a reusable workout: an ordered list of segments, with an
//! optional warmup and cooldown given as plain durations or distances.
//! Plans usually refer to templates by locator.

use crate::context::ActiveZoneSystem;
use crate::error::{PlanError, PlanResult};
use crate::measure::WorkoutMeasure;
use crate::segment::{WorkoutSegment, WorkoutSegmentDoc};
use crate::zone::ZoneSystem;
use otp_remote::{DecodeContext, Loader, RemoteResource};
use serde::{Deserialize, Serialize};

/// Template as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplateDoc {
    /// Template name
    pub name: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Warmup duration or distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup: Option<WorkoutMeasure>,
    /// Main segments
    pub segments: Vec<WorkoutSegmentDoc>,
    /// Cooldown duration or distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<WorkoutMeasure>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

otp_remote::resolvable!(WorkoutTemplateDoc { segments });

/// Resolved workout template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutTemplate {
    /// Template name
    pub name: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Warmup duration or distance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup: Option<WorkoutMeasure>,
    /// Main segments
    pub segments: Vec<WorkoutSegment>,
    /// Cooldown duration or distance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<WorkoutMeasure>,
    /// Free-form tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl WorkoutTemplate {
    /// Decode and resolve a standalone template
    ///
    /// Direct intensities get no zone; zone references must name their own
    /// zone system.
    ///
    /// # Errors
    /// [`PlanError`] if decoding, resolution or conversion fails.
    pub async fn from_slice(bytes: &[u8], loader: &Loader) -> PlanResult<Self> {
        let doc: WorkoutTemplateDoc = loader.load(bytes).await?;
        doc.try_into()
    }

    /// Decode and resolve a template against a known zone system
    ///
    /// # Errors
    /// [`PlanError`] if decoding, resolution or conversion fails.
    pub async fn from_slice_with_zone_system(
        bytes: &[u8],
        loader: &Loader,
        zone_system: RemoteResource<ZoneSystem>,
    ) -> PlanResult<Self> {
        let context = DecodeContext::new().with(ActiveZoneSystem::new(zone_system));
        let doc: WorkoutTemplateDoc = loader.load_with(bytes, context).await?;
        doc.try_into()
    }
}

impl TryFrom<WorkoutTemplateDoc> for WorkoutTemplate {
    type Error = PlanError;

    fn try_from(doc: WorkoutTemplateDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            name: doc.name,
            description: doc.description,
            warmup: doc.warmup,
            segments: doc
                .segments
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            cooldown: doc.cooldown,
            tags: doc.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::DistanceUnit;
    use crate::zone::{IntensityMetric, ZoneDefinition};
    use otp_remote::{LoaderConfig, StaticFetcher};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const TEMPO: &str = r#"{
        "name": "Tempo Run",
        "warmup": "15:00",
        "segments": [
            {"intensity": "0.65vo2max", "work": "5:00"},
            {"intensity": "0.88vo2max", "work": "20:00"},
            {"intensity": {"zoneCode": "E"}, "work": "5:00"}
        ],
        "cooldown": "10:00",
        "tags": ["threshold"]
    }"#;

    fn loader() -> Loader {
        Loader::new(LoaderConfig::default(), Arc::new(StaticFetcher::new()))
    }

    fn zones() -> ZoneSystem {
        ZoneSystem::new(
            "Daniels",
            None,
            [
                ZoneDefinition::new("E", "Easy", "", IntensityMetric::Vo2Max, 0.65),
                ZoneDefinition::new("T", "Threshold", "", IntensityMetric::Vo2Max, 0.88),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn zone_system_seeds_classification() {
        let template = WorkoutTemplate::from_slice_with_zone_system(
            TEMPO.as_bytes(),
            &loader(),
            RemoteResource::inline(zones()),
        )
        .await
        .unwrap();

        let codes: Vec<_> = template.segments.iter().map(|s| s.intensity.zone_code()).collect();
        assert_eq!(codes, [Some("E"), Some("T"), Some("E")]);
        assert_eq!(template.segments[2].intensity.value, 0.65);
    }

    #[tokio::test]
    async fn zone_reference_needs_a_system() {
        let err = WorkoutTemplate::from_slice(TEMPO.as_bytes(), &loader())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Resolve(_)), "{err:?}");
    }

    #[tokio::test]
    async fn direct_intensities_without_system_have_no_zone() {
        let raw = r#"{"name": "Easy", "segments": [{"intensity": "0.65vo2max", "work": "45:00"}]}"#;
        let template = WorkoutTemplate::from_slice(raw.as_bytes(), &loader()).await.unwrap();
        assert_eq!(template.segments[0].intensity.zone, None);
        assert_eq!(template.segments.len(), 1);
        assert_eq!((template.warmup, template.cooldown), (None, None));
    }

    #[tokio::test]
    async fn warmup_and_cooldown_are_measures() {
        let raw = r#"{
            "name": "Tempo",
            "warmup": "10:00",
            "segments": [{"intensity": "0.88vo2max", "work": "20:00"}],
            "cooldown": "5km"
        }"#;

        let doc: WorkoutTemplateDoc = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.warmup, Some(WorkoutMeasure::seconds(600)));
        assert_eq!(doc.cooldown, Some(WorkoutMeasure::distance(5.0, DistanceUnit::Kilometers)));

        let template = WorkoutTemplate::from_slice(raw.as_bytes(), &loader()).await.unwrap();
        assert_eq!(template.warmup, Some(WorkoutMeasure::seconds(600)));

        let encoded = serde_json::to_value(&template).unwrap();
        assert_eq!(encoded["warmup"], serde_json::json!("10:00"));
        assert_eq!(encoded["cooldown"], serde_json::json!("5 km"));
    }

    #[test]
    fn segment_shaped_warmup_rejected() {
        let raw = r#"{"name": "Old", "warmup": {"intensity": "0.65vo2max", "work": "10:00"}, "segments": []}"#;
        assert!(serde_json::from_str::<WorkoutTemplateDoc>(raw).is_err());
    }

    #[test]
    fn document_round_trips() {
        let doc: WorkoutTemplateDoc = serde_json::from_str(TEMPO).unwrap();
        let encoded = serde_json::to_string(&doc).unwrap();
        let again: WorkoutTemplateDoc = serde_json::from_str(&encoded).unwrap();
        assert_eq!(again, doc);
    }
}
