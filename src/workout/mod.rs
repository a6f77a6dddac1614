//! Workout execution
//! Location: src/workout/mod.rs

pub mod coordinator;
pub mod progress;
pub mod session;

pub use coordinator::{
    LaunchedWorkout, OverlapPolicy, Reservation, ReserveError, WorkoutCoordinator,
};
pub use progress::{RepOutcome, SessionState, WorkoutPlan, WorkoutProgress};
pub use session::{WorkoutOutcome, WorkoutSession, WorkoutSummary};
