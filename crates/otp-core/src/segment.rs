//! Workout segments

use crate::error::PlanError;
use crate::intensity::{Intensity, IntensityDoc};
use crate::measure::WorkoutMeasure;
use serde::{Deserialize, Serialize};

fn default_iterations() -> u32 {
    1
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_single(iterations: &u32) -> bool {
    *iterations == 1
}

/// Segment as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSegmentDoc {
    /// Intensity of the work part
    pub intensity: IntensityDoc,
    /// Work duration or distance
    pub work: WorkoutMeasure,
    /// Recovery after each repetition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<WorkoutMeasure>,
    /// Repetitions
    #[serde(default = "default_iterations", skip_serializing_if = "is_single")]
    pub iterations: u32,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

otp_remote::resolvable!(WorkoutSegmentDoc { intensity });

/// Resolved workout segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSegment {
    /// Intensity of the work part
    pub intensity: Intensity,
    /// Work duration or distance
    pub work: WorkoutMeasure,
    /// Recovery after each repetition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery: Option<WorkoutMeasure>,
    /// Repetitions
    #[serde(skip_serializing_if = "is_single")]
    pub iterations: u32,
    /// Display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl WorkoutSegment {
    /// Create single-repetition segment
    #[must_use]
    pub fn new(intensity: Intensity, work: WorkoutMeasure) -> Self {
        Self {
            intensity,
            work,
            recovery: None,
            iterations: 1,
            label: None,
        }
    }

    /// Builder: repeat `iterations` times with `recovery` between
    #[must_use]
    pub fn repeated(mut self, iterations: u32, recovery: WorkoutMeasure) -> Self {
        self.iterations = iterations;
        self.recovery = Some(recovery);
        self
    }

    /// Builder: set label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl TryFrom<WorkoutSegmentDoc> for WorkoutSegment {
    type Error = PlanError;

    fn try_from(doc: WorkoutSegmentDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            intensity: doc.intensity.try_into()?,
            work: doc.work,
            recovery: doc.recovery,
            iterations: doc.iterations,
            label: doc.label,
        })
    }
}
