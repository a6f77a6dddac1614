//! Workout plan and progress counters

use crate::config::constants::workout;
use crate::config::WorkoutConfig;
use crate::simulation::{current_rep, Phase};
use crate::utils::conversion::secs_to_duration;
use std::time::Duration;

/// Timing and volume of one workout, derived from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutPlan {
    pub reps_per_set: u32,
    pub total_sets: u32,
    /// Sleep between frames: `rep_duration / 20`
    pub frame_interval: Duration,
    pub rest_between_sets: Duration,
}

impl WorkoutPlan {
    pub fn from_config(config: &WorkoutConfig) -> Self {
        Self {
            reps_per_set: config.reps_per_set.max(1),
            total_sets: config.total_sets.max(1),
            frame_interval: secs_to_duration(config.rep_duration / workout::FRAMES_PER_REP as f64),
            rest_between_sets: secs_to_duration(config.rest_between_sets),
        }
    }

    pub fn total_reps(&self) -> u32 {
        self.reps_per_set * self.total_sets
    }

    pub fn total_frames(&self) -> usize {
        self.total_reps() as usize * workout::FRAMES_PER_REP
    }
}

/// What finishing a rep led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepOutcome {
    RepCompleted,
    /// A set finished and at least one more remains
    SetCompleted { set: u32 },
    WorkoutCompleted,
}

/// Counters owned by the running session.
///
/// `current_set()` never exceeds `total_sets`; completion is tracked by
/// `sets_completed` instead of letting the set counter run past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutProgress {
    reps_per_set: u32,
    total_sets: u32,
    sets_completed: u32,
    total_reps: u32,
}

impl WorkoutProgress {
    pub fn new(plan: &WorkoutPlan) -> Self {
        Self {
            reps_per_set: plan.reps_per_set.max(1),
            total_sets: plan.total_sets.max(1),
            sets_completed: 0,
            total_reps: 0,
        }
    }

    pub fn current_set(&self) -> u32 {
        (self.sets_completed + 1).min(self.total_sets)
    }

    pub fn current_rep(&self) -> u32 {
        current_rep(self.total_reps, self.reps_per_set)
    }

    pub fn total_reps(&self) -> u32 {
        self.total_reps
    }

    pub fn sets_completed(&self) -> u32 {
        self.sets_completed
    }

    pub fn is_finished(&self) -> bool {
        self.sets_completed >= self.total_sets
    }

    /// Record a finished rep. A no-op once the workout is finished.
    pub fn complete_rep(&mut self) -> RepOutcome {
        if self.is_finished() {
            return RepOutcome::WorkoutCompleted;
        }

        self.total_reps += 1;
        if self.total_reps % self.reps_per_set != 0 {
            return RepOutcome::RepCompleted;
        }

        self.sets_completed += 1;
        if self.is_finished() {
            RepOutcome::WorkoutCompleted
        } else {
            RepOutcome::SetCompleted { set: self.sets_completed }
        }
    }
}

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running { set: u32, rep: u32, phase: Phase },
    Resting { completed_set: u32 },
    Finished,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Cancelled)
    }
}
