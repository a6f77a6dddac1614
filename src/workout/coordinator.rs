// src/workout/coordinator.rs
//! Starts workouts on request and keeps track of the running ones

use crate::config::WorkoutConfig;
use crate::device::TelemetrySink;
use crate::simulation::FrameBuilder;
use crate::utils::time::{SystemTimeProvider, TimeProvider};
use crate::workout::progress::SessionState;
use crate::workout::session::{WorkoutSession, WorkoutSummary};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, info_span, Instrument};

/// Open while new workouts may be spawned
type Gate = Arc<RwLock<bool>>;

/// What to do with a `use` while a workout is already running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Refuse the second workout
    #[default]
    Reject,
    /// Run workouts side by side, interleaving their frames
    Allow,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReserveError {
    #[error("a workout is already running")]
    AlreadyRunning,

    #[error("device is shutting down")]
    ShuttingDown,
}

/// Owns everything a workout needs and the tasks running them
pub struct WorkoutCoordinator {
    workout: WorkoutConfig,
    sink: Arc<dyn TelemetrySink>,
    clock: Arc<dyn TimeProvider>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    gate: Gate,
    active: Arc<AtomicUsize>,
    next_id: AtomicU64,
}

impl WorkoutCoordinator {
    pub fn new(workout: WorkoutConfig, sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            workout,
            sink,
            clock: Arc::new(SystemTimeProvider),
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
            gate: Arc::new(RwLock::new(true)),
            active: Arc::new(AtomicUsize::new(0)),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.workout.overlap_policy
    }

    /// Workouts reserved or running
    pub fn active_workouts(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Token cancelled by [`WorkoutCoordinator::shutdown`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Claim a workout slot.
    ///
    /// The slot is held until the reservation is dropped or the launched
    /// workout ends.
    pub fn try_reserve(&self) -> Result<Reservation, ReserveError> {
        if !*self.gate.read() {
            return Err(ReserveError::ShuttingDown);
        }

        match self.workout.overlap_policy {
            OverlapPolicy::Reject => {
                self.active
                    .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                    .map_err(|_| ReserveError::AlreadyRunning)?;
            }
            OverlapPolicy::Allow => {
                self.active.fetch_add(1, Ordering::AcqRel);
            }
        }

        Ok(Reservation {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            slot: SlotGuard(self.active.clone()),
            workout: self.workout.clone(),
            sink: self.sink.clone(),
            clock: self.clock.clone(),
            tracker: self.tracker.clone(),
            cancel: self.cancel.child_token(),
            gate: self.gate.clone(),
        })
    }

    /// Cancel every running workout and wait for them to finish.
    ///
    /// Reservations still outstanding can no longer launch.
    pub async fn shutdown(&self) {
        info!(active = self.active_workouts(), "stopping workouts");
        *self.gate.write() = false;
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

struct SlotGuard(Arc<AtomicUsize>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A claimed workout slot that has not started yet
pub struct Reservation {
    id: u64,
    slot: SlotGuard,
    workout: WorkoutConfig,
    sink: Arc<dyn TelemetrySink>,
    clock: Arc<dyn TimeProvider>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    gate: Gate,
}

/// Handle to a spawned workout
pub struct LaunchedWorkout {
    pub id: u64,
    pub handle: JoinHandle<WorkoutSummary>,
    pub state: watch::Receiver<SessionState>,
}

impl Reservation {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Spawn the workout on the coordinator's tracker.
    ///
    /// Fails once the coordinator has begun shutting down; the slot is
    /// released either way.
    pub fn launch(self) -> Result<LaunchedWorkout, ReserveError> {
        let Reservation { id, slot, workout, sink, clock, tracker, cancel, gate } = self;

        // Held across the spawn so shutdown cannot close the tracker between
        // the check and the spawn.
        let open = gate.read();
        if !*open {
            return Err(ReserveError::ShuttingDown);
        }

        let session = WorkoutSession::new(&workout)
            .with_frame_builder(FrameBuilder::with_clock(&workout, clock));
        let state = session.subscribe();

        let span = info_span!("workout", id);
        let handle = tracker.spawn(
            async move {
                let summary = session.run(sink, &cancel).await;
                drop(slot);
                summary
            }
            .instrument(span),
        );

        drop(open);

        Ok(LaunchedWorkout { id, handle, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingSink;
    use crate::workout::session::WorkoutOutcome;

    fn coordinator(policy: OverlapPolicy) -> (WorkoutCoordinator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let workout = WorkoutConfig {
            reps_per_set: 2,
            total_sets: 2,
            rep_duration: 0.2,
            rest_between_sets: 1.0,
            overlap_policy: policy,
            ..Default::default()
        };
        (WorkoutCoordinator::new(workout, sink.clone()), sink)
    }

    #[test]
    fn test_overlap_policy_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: OverlapPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"allow\"").unwrap();
        assert_eq!(w.policy, OverlapPolicy::Allow);
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::Reject);
    }

    #[test]
    fn test_reject_allows_one_reservation() {
        let (coordinator, _) = coordinator(OverlapPolicy::Reject);

        let first = coordinator.try_reserve().unwrap();
        assert_eq!(coordinator.try_reserve().err(), Some(ReserveError::AlreadyRunning));
        assert_eq!(coordinator.active_workouts(), 1);

        drop(first);
        assert_eq!(coordinator.active_workouts(), 0);
        assert!(coordinator.try_reserve().is_ok());
    }

    #[test]
    fn test_allow_permits_overlap() {
        let (coordinator, _) = coordinator(OverlapPolicy::Allow);
        let a = coordinator.try_reserve().unwrap();
        let b = coordinator.try_reserve().unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(coordinator.active_workouts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_launched_workout_releases_slot() {
        let (coordinator, sink) = coordinator(OverlapPolicy::Reject);

        let launched = coordinator.try_reserve().unwrap().launch().unwrap();
        let summary = launched.handle.await.unwrap();

        assert_eq!(summary.outcome, WorkoutOutcome::Completed);
        assert_eq!(sink.frame_count(), 80);
        assert_eq!(*launched.state.borrow(), SessionState::Finished);
        assert_eq!(coordinator.active_workouts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_running_workouts() {
        let (coordinator, _) = coordinator(OverlapPolicy::Allow);
        let a = coordinator.try_reserve().unwrap().launch().unwrap();
        let b = coordinator.try_reserve().unwrap().launch().unwrap();

        coordinator.shutdown().await;

        assert_eq!(a.handle.await.unwrap().outcome, WorkoutOutcome::Cancelled);
        assert_eq!(b.handle.await.unwrap().outcome, WorkoutOutcome::Cancelled);
        assert_eq!(coordinator.active_workouts(), 0);
        assert_eq!(coordinator.try_reserve().err(), Some(ReserveError::ShuttingDown));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reservation_cannot_launch_after_shutdown() {
        let (coordinator, sink) = coordinator(OverlapPolicy::Reject);
        let reservation = coordinator.try_reserve().unwrap();
        assert_eq!(coordinator.active_workouts(), 1);

        coordinator.shutdown().await;

        assert_eq!(reservation.launch().err(), Some(ReserveError::ShuttingDown));
        assert_eq!(coordinator.active_workouts(), 0);
        assert_eq!(sink.frame_count(), 0);
    }
}
