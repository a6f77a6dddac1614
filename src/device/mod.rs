// src/device/mod.rs
//! Device identity, telemetry types and the delivery seam

pub mod recording;
pub mod traits;
pub mod types;


pub use recording::RecordingSink;
pub use traits::*;
pub use types::*;
