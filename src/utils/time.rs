use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use std::time::Duration;

/// Wall-clock format the collector expects on every frame.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn timestamp_string(&self) -> String {
        format_timestamp(&self.now())
    }
}

/// System time provider using the local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Mock time provider for deterministic testing
pub struct MockTimeProvider {
    current_time: Mutex<NaiveDateTime>,
}

impl MockTimeProvider {
    pub fn new(initial: NaiveDateTime) -> Self {
        Self {
            current_time: Mutex::new(initial),
        }
    }

    pub fn advance_by(&self, by: Duration) {
        let mut current = self.current_time.lock();
        if let Ok(delta) = chrono::Duration::from_std(by) {
            *current += delta;
        }
    }

    pub fn set_time(&self, time: NaiveDateTime) {
        *self.current_time.lock() = time;
    }
}

impl TimeProvider for MockTimeProvider {
    fn now(&self) -> NaiveDateTime {
        *self.current_time.lock()
    }
}

pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}
