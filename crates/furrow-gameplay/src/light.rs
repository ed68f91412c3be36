//! Light-level provider.
//!
//! Maps the clock's hour to a normalized light factor (0.0 = pitch black,
//! 1.0 = full daylight). Growth, planting and harvesting are all gated on
//! this value.

use serde::{Deserialize, Serialize};

use crate::clock::{HOURS_PER_DAY, SUNRISE_HOUR, SUNSET_HOUR};

/// Mapping from hour of day to light level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightCurve {
    /// Constant day level in `[6, 18)`, constant night level otherwise.
    Step {
        /// Light level during the day.
        day: f32,
        /// Light level during the night.
        night: f32,
    },
    /// Sine curve peaking at noon, never dropping below `floor`.
    Smooth {
        /// Minimum light level (moonlight).
        floor: f32,
    },
}

impl Default for LightCurve {
    fn default() -> Self {
        Self::Step {
            day: 1.0,
            night: 0.0,
        }
    }
}

impl LightCurve {
    /// Get the light level at the given hour (clamped to 0.0..=1.0).
    #[must_use]
    pub fn light_at(&self, hour: f32) -> f32 {
        let hour = if hour.is_finite() {
            hour.rem_euclid(HOURS_PER_DAY)
        } else {
            0.0
        };
        let level = match *self {
            Self::Step { day, night } => {
                if (SUNRISE_HOUR..SUNSET_HOUR).contains(&hour) {
                    day
                } else {
                    night
                }
            },
            Self::Smooth { floor } => {
                // Peak at noon, minimum at midnight
                let t = hour / HOURS_PER_DAY;
                let angle = t * std::f32::consts::TAU - std::f32::consts::FRAC_PI_2;
                let base = (angle.sin() + 1.0) / 2.0;
                let floor = floor.clamp(0.0, 1.0);
                floor + base * (1.0 - floor)
            },
        };
        if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
