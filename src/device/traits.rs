// src/device/traits.rs
//! Delivery seam between the simulator and whatever ingests its output

use crate::device::types::{DeviceIdentity, TelemetryFrame};
use async_trait::async_trait;
use std::fmt;

/// Result of one best-effort delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Collector answered 200
    Delivered,
    /// Collector answered with another status
    Rejected { status: u16 },
    /// Request never completed (connect, timeout, body encoding)
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered => write!(f, "delivered"),
            DeliveryOutcome::Rejected { status } => write!(f, "rejected with status {}", status),
            DeliveryOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Destination for identity registrations and telemetry frames.
///
/// Implementations must not retry and must not fail loudly: every attempt
/// ends in a [`DeliveryOutcome`] that the caller logs and moves past.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Announce the device identity
    async fn register(&self, identity: &DeviceIdentity) -> DeliveryOutcome;

    /// Push one telemetry frame
    async fn publish(&self, frame: &TelemetryFrame) -> DeliveryOutcome;
}
