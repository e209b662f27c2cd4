//! OTP Core - Open Training Plan documents
//!
//! Endurance training plans whose templates, alternates and zone systems may
//! live in separate documents:
//! - Plans, weeks, days and scheduled workouts
//! - Workout templates and segments
//! - Intensity, measure and volume codecs
//! - Zone systems and zone classification
//!
//! Every document type has two shapes. `*Doc` types mirror the wire format,
//! keep references as [`RemoteResource`](otp_remote::RemoteResource) cells and
//! re-encode with locators preserved. Public types are built from a fully
//! resolved `*Doc` and never expose pending references.
//!
//! # Example
//!
//! ```rust,ignore
//! use otp_core::{Loader, LoaderConfig, TrainingPlan};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = Loader::with_default_fetcher(LoaderConfig::default())?;
//! let plan = TrainingPlan::from_slice(include_bytes!("plan.json"), &loader).await?;
//!
//! for workout in plan.workouts() {
//!     println!("{} ({} alternates)", workout.template.name, workout.alternates.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod codec;

// Core modules
pub mod context;
pub mod error;
pub mod intensity;
pub mod measure;
pub mod plan;
pub mod segment;
pub mod template;
pub mod volume;
pub mod workout;
pub mod zone;

// Re-exports for convenience
pub use codec::ScalarCodec;
pub use context::ActiveZoneSystem;
pub use error::{PlanError, PlanResult, ZoneError};
pub use intensity::{Intensity, IntensityDoc, IntensityTarget, IntensityValue};
pub use measure::{Distance, DistanceUnit, WorkoutMeasure};
pub use plan::{Day, DayDoc, TrainingPlan, TrainingPlanDoc, Week, WeekDoc};
pub use segment::{WorkoutSegment, WorkoutSegmentDoc};
pub use template::{WorkoutTemplate, WorkoutTemplateDoc};
pub use volume::TargetVolume;
pub use workout::{ScheduledWorkout, ScheduledWorkoutDoc};
pub use zone::{IntensityMetric, IntensityRange, ZoneDefinition, ZoneSystem};

pub use otp_remote::{DocumentFormat, Loader, LoaderConfig, Locator};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for loading training plans
    pub use crate::{
        DocumentFormat, Intensity, IntensityMetric, Loader, LoaderConfig, Locator, PlanError,
        ScheduledWorkout, TargetVolume, TrainingPlan, WorkoutMeasure, WorkoutSegment,
        WorkoutTemplate, ZoneSystem,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
