//! Scheduled workouts
//!
//! A day entry naming a template, optional alternates and how much of the
//! template to do.

use crate::error::PlanError;
use crate::template::{WorkoutTemplate, WorkoutTemplateDoc};
use crate::volume::TargetVolume;
use otp_remote::{RemoteResource, RemoteResourceList};
use serde::{Deserialize, Serialize};

/// Scheduled workout as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWorkoutDoc {
    /// Template, inline or by locator
    pub template: RemoteResource<WorkoutTemplateDoc>,
    /// Alternative templates, each inline or by locator
    #[serde(default, skip_serializing_if = "RemoteResourceList::is_empty")]
    pub alternates: RemoteResourceList<WorkoutTemplateDoc>,
    /// Share or absolute amount of the template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_volume: Option<TargetVolume>,
    /// Notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

otp_remote::resolvable!(ScheduledWorkoutDoc { template, alternates });

/// Resolved scheduled workout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWorkout {
    /// Template
    pub template: WorkoutTemplate,
    /// Alternative templates, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<WorkoutTemplate>,
    /// Share or absolute amount of the template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_volume: Option<TargetVolume>,
    /// Notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TryFrom<ScheduledWorkoutDoc> for ScheduledWorkout {
    type Error = PlanError;

    fn try_from(doc: ScheduledWorkoutDoc) -> Result<Self, Self::Error> {
        let template = doc
            .template
            .into_option()
            .map_err(PlanError::unresolved("template"))?
            .ok_or(PlanError::Missing("template"))?;
        let alternates = doc
            .alternates
            .into_values()
            .map_err(PlanError::unresolved("alternates"))?;

        Ok(Self {
            template: template.try_into()?,
            alternates: alternates
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            target_volume: doc.target_volume,
            notes: doc.notes,
        })
    }
}
