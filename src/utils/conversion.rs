//! Numeric conversion helpers shared by the simulation modules.

use std::time::Duration;

/// Round `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Convert a seconds value from configuration into a [`Duration`].
///
/// Negative and non-finite inputs collapse to zero; config validation
/// rejects them before this is reached.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}
