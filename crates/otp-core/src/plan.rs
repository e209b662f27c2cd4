//! Training plans
//!
//! The plan is the document root. Its zone system, inline or by locator, is
//! published to the decode context before anything below it is bound, so
//! every intensity in the plan (including those inside fetched templates)
//! is classified against it.

use crate::context::ActiveZoneSystem;
use crate::error::{PlanError, PlanResult};
use crate::workout::{ScheduledWorkout, ScheduledWorkoutDoc};
use crate::zone::ZoneSystem;
use async_trait::async_trait;
use otp_remote::{
    DecodeContext, DocumentFormat, Loader, Locator, RemoteDecoder, RemoteResource, Resolvable, ResolveError,
};
use serde::{Deserialize, Serialize};

/// Day as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDoc {
    /// Workouts of the day, in order
    #[serde(default)]
    pub workouts: Vec<ScheduledWorkoutDoc>,
    /// Notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

otp_remote::resolvable!(DayDoc { workouts });

/// Week as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDoc {
    /// Days of the week, in order
    pub days: Vec<DayDoc>,
    /// Notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

otp_remote::resolvable!(WeekDoc { days });

/// Training plan as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanDoc {
    /// Plan name
    pub name: String,
    /// Description
    pub description: String,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Zone system for every intensity in the plan
    #[serde(default, skip_serializing_if = "RemoteResource::is_empty")]
    pub zone_system: RemoteResource<ZoneSystem>,
    /// Weeks, in order
    pub weeks: Vec<WeekDoc>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[async_trait]
impl Resolvable for TrainingPlanDoc {
    fn publish(&self, context: &mut DecodeContext) {
        if !self.zone_system.is_empty() {
            context.publish(ActiveZoneSystem::new(self.zone_system.clone()));
        }
    }

    fn bind(&mut self, context: &DecodeContext) {
        self.zone_system.bind(context);
        self.weeks.bind(context);
    }

    async fn resolve(&mut self, decoder: &RemoteDecoder) -> Result<(), ResolveError> {
        self.zone_system.resolve(decoder).await?;
        self.weeks.resolve(decoder).await
    }
}

/// Resolved day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Day {
    /// Workouts of the day, in order
    pub workouts: Vec<ScheduledWorkout>,
    /// Notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Day {
    /// Check if nothing is scheduled
    #[inline]
    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.workouts.is_empty()
    }
}

impl TryFrom<DayDoc> for Day {
    type Error = PlanError;

    fn try_from(doc: DayDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            workouts: doc
                .workouts
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            notes: doc.notes,
        })
    }
}

/// Resolved week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Week {
    /// Days of the week, in order
    pub days: Vec<Day>,
    /// Notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TryFrom<WeekDoc> for Week {
    type Error = PlanError;

    fn try_from(doc: WeekDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            days: doc
                .days
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            notes: doc.notes,
        })
    }
}

/// Fully resolved training plan
///
/// Built only after every reference in the document resolved; serializes
/// with all references inlined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    /// Plan name
    pub name: String,
    /// Description
    pub description: String,
    /// Author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Zone system for every intensity in the plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_system: Option<ZoneSystem>,
    /// Weeks, in order
    pub weeks: Vec<Week>,
    /// Free-form tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TrainingPlan {
    /// Decode and resolve a plan document
    ///
    /// # Errors
    /// [`PlanError`] if decoding, any reference, or conversion fails.
    pub async fn from_slice(bytes: &[u8], loader: &Loader) -> PlanResult<Self> {
        let doc: TrainingPlanDoc = loader.load(bytes).await?;
        let plan = Self::try_from(doc)?;
        tracing::debug!(plan = %plan.name, weeks = plan.weeks.len(), "Plan converted");
        Ok(plan)
    }

    /// Fetch, decode and resolve the plan at `locator`
    ///
    /// # Errors
    /// [`PlanError`] if the plan cannot be fetched, otherwise same as
    /// [`from_slice`](Self::from_slice).
    pub async fn from_locator(locator: &Locator, loader: &Loader) -> PlanResult<Self> {
        let doc: TrainingPlanDoc = loader.load_locator(locator).await?;
        let plan = Self::try_from(doc)?;
        tracing::debug!(plan = %plan.name, %locator, weeks = plan.weeks.len(), "Plan converted");
        Ok(plan)
    }

    /// Encode with every reference inlined
    ///
    /// # Errors
    /// [`PlanError::Encode`] if the format cannot represent the plan.
    pub fn to_document(&self, format: DocumentFormat) -> PlanResult<String> {
        Ok(format.encode(self)?)
    }

    /// All scheduled workouts, week by week and day by day
    pub fn workouts(&self) -> impl Iterator<Item = &ScheduledWorkout> {
        self.weeks
            .iter()
            .flat_map(|week| week.days.iter())
            .flat_map(|day| day.workouts.iter())
    }
}

impl TryFrom<TrainingPlanDoc> for TrainingPlan {
    type Error = PlanError;

    fn try_from(doc: TrainingPlanDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            name: doc.name,
            description: doc.description,
            author: doc.author,
            zone_system: doc
                .zone_system
                .into_option()
                .map_err(PlanError::unresolved("zoneSystem"))?,
            weeks: doc
                .weeks
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            tags: doc.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otp_remote::{LoaderConfig, StaticFetcher};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const PLAN: &str = r#"{
        "name": "Base Building",
        "description": "Four easy weeks",
        "zoneSystem": {
            "name": "Daniels",
            "zones": {
                "E": {"code": "E", "name": "Easy", "description": "", "metric": "vo2max", "targetIntensity": 0.65}
            }
        },
        "weeks": [{
            "days": [
                {"workouts": [{"template": {"name": "Easy", "segments": [{"intensity": "0.65vo2max", "work": "45:00"}]}}]},
                {"workouts": [], "notes": "Rest"}
            ]
        }]
    }"#;

    fn loader() -> Loader {
        Loader::new(LoaderConfig::default(), Arc::new(StaticFetcher::new()))
    }

    #[test]
    fn publishes_zone_system_only_when_present() {
        let doc: TrainingPlanDoc = serde_json::from_str(PLAN).unwrap();
        let mut context = DecodeContext::new();
        doc.publish(&mut context);
        assert!(context.contains::<ActiveZoneSystem>());

        let mut bare = doc;
        bare.zone_system = RemoteResource::Empty;
        let mut context = DecodeContext::new();
        bare.publish(&mut context);
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn inline_plan_resolves() {
        let plan = TrainingPlan::from_slice(PLAN.as_bytes(), &loader()).await.unwrap();

        assert_eq!(plan.weeks[0].days.len(), 2);
        assert!(plan.weeks[0].days[1].is_rest());
        let workout = plan.workouts().next().unwrap();
        assert_eq!(workout.template.segments[0].intensity.zone_code(), Some("E"));
    }

    #[tokio::test]
    async fn public_view_round_trips_through_yaml() {
        let plan = TrainingPlan::from_slice(PLAN.as_bytes(), &loader()).await.unwrap();
        let yaml = plan.to_document(DocumentFormat::Yaml).unwrap();

        let yaml_loader = Loader::new(
            LoaderConfig::default().with_format(DocumentFormat::Yaml),
            Arc::new(StaticFetcher::new()),
        );
        let back = TrainingPlan::from_slice(yaml.as_bytes(), &yaml_loader).await.unwrap();
        assert_eq!(back, plan);
        assert_eq!(
            back.workouts().next().unwrap().template.segments[0].intensity.zone_code(),
            Some("E")
        );
    }

    #[tokio::test]
    async fn public_view_round_trips_through_json() {
        let plan = TrainingPlan::from_slice(PLAN.as_bytes(), &loader()).await.unwrap();
        let json = plan.to_document(DocumentFormat::Json).unwrap();

        let back = TrainingPlan::from_slice(json.as_bytes(), &loader()).await.unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn missing_weeks_rejected() {
        let err = serde_json::from_str::<TrainingPlanDoc>(r#"{"name": "x", "description": "y"}"#).unwrap_err();
        assert!(err.to_string().contains("weeks"), "{err}");
    }
}
