//! Sensor simulation for the smart dumbbell
//! Location: src/simulation/mod.rs

pub mod frame_builder;
pub mod kinematics;
pub mod vitals;

pub use frame_builder::{current_rep, FrameBuilder};
pub use kinematics::{height_factor, phase_samples, KinematicModel, Phase};
pub use vitals::{VitalsModel, VitalsReading};
