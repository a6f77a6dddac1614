//! Common utility functions for dumbbell-core
//!
//! - Wall-clock access behind a [`TimeProvider`] so frames can be stamped
//!   deterministically in tests
//! - Field-level validation helpers used by the configuration layer
//! - Numeric rounding and duration conversion

pub mod conversion;
pub mod time;
pub mod validation;

pub use conversion::{round_to, secs_to_duration};

pub use time::{format_timestamp, MockTimeProvider, SystemTimeProvider, TimeProvider};

pub use validation::{
    validate_finite_range, validate_http_url, validate_non_empty, validate_positive,
    validate_range, validate_socket_addr, ValidationError, ValidationResult,
};
