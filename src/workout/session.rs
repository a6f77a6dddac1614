// src/workout/session.rs
//! Workout session loop
//!
//! Runs the full plan: for every rep an up phase then a down phase, ten
//! frames each, sleeping `rep_duration / 20` after every frame and resting
//! between sets. Each frame is published on its own task so a slow sink
//! never holds up the cadence. A failed delivery is logged and the frame is
//! dropped. When too many deliveries are still open the new frame is
//! dropped instead of queued. Cancellation is observed at every sleep and
//! aborts the deliveries still open.

use crate::config::constants::workout::MAX_FRAMES_IN_FLIGHT;
use crate::config::WorkoutConfig;
use crate::device::{DeliveryOutcome, TelemetryFrame, TelemetrySink};
use crate::simulation::{phase_samples, FrameBuilder, KinematicModel, Phase};
use crate::workout::progress::{RepOutcome, SessionState, WorkoutPlan, WorkoutProgress};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutOutcome {
    Completed,
    Cancelled,
}

/// Counters reported when a session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSummary {
    pub outcome: WorkoutOutcome,
    pub sets_completed: u32,
    pub reps_completed: u32,
    /// Frames produced by the session
    pub frames_sent: usize,
    /// Frames that were not delivered: refused by the sink, skipped on a
    /// full backlog, or abandoned on cancel
    pub frames_dropped: usize,
    pub rest_intervals: u32,
}

impl WorkoutSummary {
    fn new() -> Self {
        Self {
            outcome: WorkoutOutcome::Completed,
            sets_completed: 0,
            reps_completed: 0,
            frames_sent: 0,
            frames_dropped: 0,
            rest_intervals: 0,
        }
    }
}

/// One workout run. Consumed by [`WorkoutSession::run`].
pub struct WorkoutSession {
    plan: WorkoutPlan,
    exercise: String,
    weight: f64,
    kinematics: KinematicModel,
    frames: FrameBuilder,
    rng: StdRng,
    max_in_flight: usize,
    state: watch::Sender<SessionState>,
}

impl WorkoutSession {
    pub fn new(config: &WorkoutConfig) -> Self {
        let (state, _) = watch::channel(SessionState::NotStarted);
        Self {
            plan: WorkoutPlan::from_config(config),
            exercise: config.exercise.clone(),
            weight: config.weight,
            kinematics: KinematicModel::default(),
            frames: FrameBuilder::new(config),
            rng: StdRng::from_entropy(),
            max_in_flight: MAX_FRAMES_IN_FLIGHT,
            state,
        }
    }

    pub fn with_frame_builder(mut self, frames: FrameBuilder) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_kinematics(mut self, kinematics: KinematicModel) -> Self {
        self.kinematics = kinematics;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Cap on deliveries still open; at least one
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    /// Watch the session state as it runs
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Run the plan to completion or until `cancel` fires.
    ///
    /// On completion the deliveries still open are awaited, unless `cancel`
    /// fires meanwhile.
    pub async fn run(
        mut self,
        sink: Arc<dyn TelemetrySink>,
        cancel: &CancellationToken,
    ) -> WorkoutSummary {
        info!(
            exercise = %self.exercise,
            weight = self.weight,
            sets = self.plan.total_sets,
            reps_per_set = self.plan.reps_per_set,
            "starting workout"
        );

        let mut progress = WorkoutProgress::new(&self.plan);
        let mut summary = WorkoutSummary::new();
        let mut deliveries = Deliveries::new(sink, self.max_in_flight);

        while !progress.is_finished() {
            for phase in Phase::REP {
                for sample in phase_samples() {
                    let set = progress.current_set();
                    let rep = progress.current_rep();
                    self.state.send_replace(SessionState::Running { set, rep, phase });

                    let sensors = self.kinematics.positions(sample, phase, &mut self.rng);
                    let frame =
                        self.frames.build(set, progress.total_reps(), sensors, &mut self.rng);
                    debug!(set, rep, height = frame.sensors.left_dumbbell.y, "frame");

                    deliveries.submit(set, rep, frame);
                    summary.frames_sent += 1;

                    if !pause(self.plan.frame_interval, cancel).await {
                        return self.cancelled(summary, &progress, deliveries).await;
                    }
                }
            }

            match progress.complete_rep() {
                RepOutcome::RepCompleted => {}
                RepOutcome::SetCompleted { set } => {
                    let rest_secs = self.plan.rest_between_sets.as_secs_f64();
                    info!(set, rest_secs, "set complete, resting");
                    self.state.send_replace(SessionState::Resting { completed_set: set });
                    summary.rest_intervals += 1;
                    if !pause(self.plan.rest_between_sets, cancel).await {
                        return self.cancelled(summary, &progress, deliveries).await;
                    }
                }
                RepOutcome::WorkoutCompleted => {}
            }
        }

        deliveries.finish(cancel).await;
        summary.frames_dropped = deliveries.dropped;
        summary.sets_completed = progress.sets_completed();
        summary.reps_completed = progress.total_reps();
        self.state.send_replace(SessionState::Finished);
        info!(
            reps = summary.reps_completed,
            frames = summary.frames_sent,
            dropped = summary.frames_dropped,
            "workout complete"
        );
        summary
    }

    async fn cancelled(
        &self,
        mut summary: WorkoutSummary,
        progress: &WorkoutProgress,
        mut deliveries: Deliveries,
    ) -> WorkoutSummary {
        deliveries.abandon().await;
        summary.outcome = WorkoutOutcome::Cancelled;
        summary.frames_dropped = deliveries.dropped;
        summary.sets_completed = progress.sets_completed();
        summary.reps_completed = progress.total_reps();
        self.state.send_replace(SessionState::Cancelled);
        info!(
            reps = summary.reps_completed,
            dropped = summary.frames_dropped,
            "workout cancelled"
        );
        summary
    }
}

/// Frame deliveries still open, one task each
struct Deliveries {
    sink: Arc<dyn TelemetrySink>,
    in_flight: JoinSet<(u32, u32, DeliveryOutcome)>,
    max_in_flight: usize,
    dropped: usize,
}

impl Deliveries {
    fn new(sink: Arc<dyn TelemetrySink>, max_in_flight: usize) -> Self {
        Self {
            sink,
            in_flight: JoinSet::new(),
            max_in_flight,
            dropped: 0,
        }
    }

    fn submit(&mut self, set: u32, rep: u32, frame: TelemetryFrame) {
        while let Some(result) = self.in_flight.try_join_next() {
            self.record(result);
        }

        if self.in_flight.len() >= self.max_in_flight {
            self.dropped += 1;
            warn!(set, rep, open = self.in_flight.len(), "delivery backlog full, frame dropped");
            return;
        }

        let sink = self.sink.clone();
        self.in_flight.spawn(async move {
            let outcome = sink.publish(&frame).await;
            (set, rep, outcome)
        });
    }

    /// Wait for every open delivery, or abandon them if `cancel` fires
    async fn finish(&mut self, cancel: &CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.abandon().await,
                joined = self.in_flight.join_next() => match joined {
                    Some(result) => self.record(result),
                    None => return,
                },
            }
        }
    }

    async fn abandon(&mut self) {
        self.in_flight.abort_all();
        while let Some(result) = self.in_flight.join_next().await {
            self.record(result);
        }
    }

    fn record(&mut self, result: Result<(u32, u32, DeliveryOutcome), JoinError>) {
        match result {
            Ok((_, _, outcome)) if outcome.is_delivered() => {}
            Ok((set, rep, outcome)) => {
                self.dropped += 1;
                warn!(set, rep, %outcome, "telemetry frame dropped");
            }
            Err(e) if e.is_cancelled() => {
                self.dropped += 1;
                debug!("delivery abandoned");
            }
            Err(e) => {
                self.dropped += 1;
                warn!(error = %e, "delivery task failed");
            }
        }
    }
}

/// Sleep for `duration`; `false` if cancelled first.
async fn pause(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
