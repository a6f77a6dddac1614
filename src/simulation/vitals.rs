//! Synthetic device vitals
//!
//! Temperature and battery are drawn independently per frame. There is no
//! drain or thermal model; the values only give the dashboard something to
//! render.

use crate::config::constants::vitals;
use crate::utils::conversion::round_to;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalsReading {
    pub temperature: f64,
    pub battery: u8,
}

/// Uniform ranges the readings are drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalsModel {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_battery: u8,
    pub max_battery: u8,
}

impl Default for VitalsModel {
    fn default() -> Self {
        Self {
            min_temperature: vitals::MIN_TEMPERATURE_C,
            max_temperature: vitals::MAX_TEMPERATURE_C,
            min_battery: vitals::MIN_BATTERY_PERCENT,
            max_battery: vitals::MAX_BATTERY_PERCENT,
        }
    }
}

impl VitalsModel {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> VitalsReading {
        let temperature = if self.min_temperature < self.max_temperature {
            rng.gen_range(self.min_temperature..=self.max_temperature)
        } else {
            self.min_temperature
        };
        let battery = if self.min_battery < self.max_battery {
            rng.gen_range(self.min_battery..=self.max_battery)
        } else {
            self.min_battery
        };

        VitalsReading {
            temperature: round_to(temperature, vitals::TEMPERATURE_DECIMALS),
            battery,
        }
    }
}
