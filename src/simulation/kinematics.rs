//! Kinematic waveform generation for a two-arm press
//!
//! Each rep is an up phase followed by a down phase. Within a phase the
//! vertical displacement follows a quarter sine, which eases in at the start
//! and out at the end. Horizontal jitter is redrawn on every call, so
//! positions are smooth only in the vertical axis.

use crate::config::constants::{kinematics, workout};
use crate::device::{SensorPosition, SensorPositions};
use crate::utils::conversion::round_to;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Movement direction within a rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Up,
    Down,
}

impl Phase {
    /// Both phases of one rep, in execution order
    pub const REP: [Phase; 2] = [Phase::Up, Phase::Down];

    pub fn is_rising(self) -> bool {
        matches!(self, Phase::Up)
    }
}

/// Normalised lift height for `progress` through a phase.
///
/// Rising: `sin(p·π/2)`, 0 → 1. Descending: `1 − sin(p·π/2)`, 1 → 0.
/// `progress` is clamped to `[0, 1]`.
pub fn height_factor(progress: f64, phase: Phase) -> f64 {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let rise = (progress * FRAC_PI_2).sin();
    match phase {
        Phase::Up => rise,
        Phase::Down => 1.0 - rise,
    }
}

/// The evenly spaced progress points sampled in one phase: `i / 9` for
/// `i` in `0..10`.
pub fn phase_samples() -> impl Iterator<Item = f64> {
    let last = (workout::SAMPLES_PER_PHASE - 1) as f64;
    (0..workout::SAMPLES_PER_PHASE).map(move |i| i as f64 / last)
}

/// Geometry of the simulated lifter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicModel {
    pub left_anchor: SensorPosition,
    pub right_anchor: SensorPosition,
    pub vertical_travel: f64,
    pub jitter: f64,
}

impl Default for KinematicModel {
    fn default() -> Self {
        let (lx, ly, lz) = kinematics::LEFT_SHOULDER_POS;
        let (rx, ry, rz) = kinematics::RIGHT_SHOULDER_POS;
        Self {
            left_anchor: SensorPosition::new(lx, ly, lz),
            right_anchor: SensorPosition::new(rx, ry, rz),
            vertical_travel: kinematics::VERTICAL_TRAVEL_M,
            jitter: kinematics::HORIZONTAL_JITTER_M,
        }
    }
}

impl KinematicModel {
    /// Positions of both dumbbells and elbows at `progress` through `phase`.
    ///
    /// Elbows are derived from the unrounded dumbbell positions; every
    /// coordinate is rounded to millimetres afterwards.
    pub fn positions<R: Rng + ?Sized>(
        &self,
        progress: f64,
        phase: Phase,
        rng: &mut R,
    ) -> SensorPositions {
        let height = height_factor(progress, phase);

        let left_dumbbell = self.dumbbell(self.left_anchor, height, rng);
        let right_dumbbell = self.dumbbell(self.right_anchor, height, rng);
        let left_elbow = elbow(left_dumbbell, height, -kinematics::ELBOW_LATERAL_OFFSET_M);
        let right_elbow = elbow(right_dumbbell, height, kinematics::ELBOW_LATERAL_OFFSET_M);

        SensorPositions {
            left_dumbbell: rounded(left_dumbbell),
            right_dumbbell: rounded(right_dumbbell),
            left_elbow: rounded(left_elbow),
            right_elbow: rounded(right_elbow),
        }
    }

    fn dumbbell<R: Rng + ?Sized>(
        &self,
        anchor: SensorPosition,
        height: f64,
        rng: &mut R,
    ) -> SensorPosition {
        SensorPosition {
            x: anchor.x + self.draw_jitter(rng),
            y: anchor.y + self.vertical_travel * height,
            z: anchor.z + self.draw_jitter(rng),
        }
    }

    fn draw_jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        }
    }
}

/// Elbow trails its dumbbell and travels less
fn elbow(dumbbell: SensorPosition, height: f64, lateral_offset: f64) -> SensorPosition {
    SensorPosition {
        x: dumbbell.x + lateral_offset,
        y: dumbbell.y - kinematics::ELBOW_DROP_M - kinematics::ELBOW_TRAVEL_REDUCTION_M * height,
        z: dumbbell.z - kinematics::ELBOW_DEPTH_OFFSET_M,
    }
}

fn rounded(p: SensorPosition) -> SensorPosition {
    let d = kinematics::POSITION_DECIMALS;
    SensorPosition::new(round_to(p.x, d), round_to(p.y, d), round_to(p.z, d))
}
