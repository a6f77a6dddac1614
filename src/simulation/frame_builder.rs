//! Telemetry frame assembly
//!
//! Merges kinematic positions, workout counters and vitals into one
//! [`TelemetryFrame`]. Nothing is retained between frames.

use crate::config::WorkoutConfig;
use crate::device::{SensorPositions, TelemetryFrame};
use crate::simulation::vitals::VitalsModel;
use crate::utils::time::{SystemTimeProvider, TimeProvider};
use rand::Rng;
use std::sync::Arc;

/// 1-indexed rep within the current set: `(total_reps mod reps_per_set) + 1`.
///
/// `reps_per_set` of zero is treated as one.
pub fn current_rep(total_reps: u32, reps_per_set: u32) -> u32 {
    total_reps % reps_per_set.max(1) + 1
}

/// Builds frames for one workout configuration
pub struct FrameBuilder {
    exercise: String,
    weight: f64,
    reps_per_set: u32,
    vitals: VitalsModel,
    clock: Arc<dyn TimeProvider>,
}

impl FrameBuilder {
    pub fn new(workout: &WorkoutConfig) -> Self {
        Self::with_clock(workout, Arc::new(SystemTimeProvider))
    }

    pub fn with_clock(workout: &WorkoutConfig, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            exercise: workout.exercise.clone(),
            weight: workout.weight,
            reps_per_set: workout.reps_per_set,
            vitals: VitalsModel::default(),
            clock,
        }
    }

    pub fn with_vitals(mut self, vitals: VitalsModel) -> Self {
        self.vitals = vitals;
        self
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        current_set: u32,
        total_reps: u32,
        sensors: SensorPositions,
        rng: &mut R,
    ) -> TelemetryFrame {
        let vitals = self.vitals.sample(rng);
        TelemetryFrame {
            timestamp: self.clock.timestamp_string(),
            exercise: self.exercise.clone(),
            weight: self.weight,
            current_set,
            current_rep: current_rep(total_reps, self.reps_per_set),
            total_reps,
            sensors,
            temperature: vitals.temperature,
            battery: vitals.battery,
        }
    }
}
