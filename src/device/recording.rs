// src/device/recording.rs
//! In-memory sink for tests and demos

use crate::device::traits::{DeliveryOutcome, TelemetrySink};
use crate::device::types::{DeviceIdentity, TelemetryFrame};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Sink that keeps every registration and frame it is given.
///
/// The outcome it reports is configurable so callers can exercise the
/// drop-and-continue path without a network. An optional latency makes
/// every call take that long, like a slow collector.
pub struct RecordingSink {
    outcome: Mutex<DeliveryOutcome>,
    latency: Duration,
    registrations: Mutex<Vec<DeviceIdentity>>,
    frames: Mutex<Vec<TelemetryFrame>>,
    publish_times: Mutex<Vec<Instant>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_outcome(DeliveryOutcome::Delivered)
    }

    pub fn with_outcome(outcome: DeliveryOutcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            latency: Duration::ZERO,
            registrations: Mutex::new(Vec::new()),
            frames: Mutex::new(Vec::new()),
            publish_times: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_outcome(&self, outcome: DeliveryOutcome) {
        *self.outcome.lock() = outcome;
    }

    pub fn frames(&self) -> Vec<TelemetryFrame> {
        self.frames.lock().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().len()
    }

    /// When each `publish` call started, in call order
    pub fn publish_times(&self) -> Vec<Instant> {
        self.publish_times.lock().clone()
    }

    pub fn registrations(&self) -> Vec<DeviceIdentity> {
        self.registrations.lock().clone()
    }

    async fn respond(&self) -> DeliveryOutcome {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.outcome.lock().clone()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySink for RecordingSink {
    async fn register(&self, identity: &DeviceIdentity) -> DeliveryOutcome {
        self.registrations.lock().push(identity.clone());
        self.respond().await
    }

    async fn publish(&self, frame: &TelemetryFrame) -> DeliveryOutcome {
        self.publish_times.lock().push(Instant::now());
        self.frames.lock().push(frame.clone());
        self.respond().await
    }
}
