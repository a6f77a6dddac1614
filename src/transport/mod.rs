//! Outbound delivery to the collector service
//! Location: src/transport/mod.rs

pub mod collector;

pub use collector::CollectorClient;
