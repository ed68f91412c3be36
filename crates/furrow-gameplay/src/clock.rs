//! Day/night clock.
//!
//! This module provides game time management:
//! - Hour counter advanced by real seconds with a configurable day length
//! - Sunrise, sunset and new-day transition events
//! - Latches guaranteeing one sunrise and one sunset per day

use serde::{Deserialize, Serialize};

/// Hours in a game day.
pub const HOURS_PER_DAY: f32 = 24.0;
/// Hour at which the sun rises.
pub const SUNRISE_HOUR: f32 = 6.0;
/// Hour at which the sun sets.
pub const SUNSET_HOUR: f32 = 18.0;
/// Default real seconds per game day.
pub const DEFAULT_DAY_LENGTH_SECONDS: f32 = 240.0;
/// Default starting hour (6:00 AM).
pub const DEFAULT_START_HOUR: f32 = 6.0;

/// Shortest allowed day length in real seconds.
const MIN_DAY_LENGTH_SECONDS: f32 = 0.01;

/// Events raised while the clock advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockEvent {
    /// A new day has started (carries the new day number).
    NewDay(u32),
    /// The sun rose.
    Sunrise,
    /// The sun set.
    Sunset,
}

impl ClockEvent {
    /// Get a description of this event.
    #[must_use]
    pub fn description(self) -> String {
        match self {
            Self::NewDay(day) => format!("Day {day} has begun"),
            Self::Sunrise => "The sun rises".to_string(),
            Self::Sunset => "The sun sets".to_string(),
        }
    }
}

/// Game clock with day/night cycle.
///
/// `hour` is kept in `[0, 24)` and `day` starts at 1. The sunrise and sunset
/// latches are cleared at every midnight so that each day produces exactly one
/// `Sunrise` followed by one `Sunset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    /// Current hour of day (0.0 = midnight).
    hour: f32,
    /// Current day number.
    day: u32,
    /// Real seconds per game day.
    day_length_seconds: f32,
    /// Sunrise already announced today.
    sunrise_fired: bool,
    /// Sunset already announced today.
    sunset_fired: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_LENGTH_SECONDS)
    }
}

impl Clock {
    /// Create a clock on day 1 at 6:00 AM.
    #[must_use]
    pub fn new(day_length_seconds: f32) -> Self {
        Self::with_time(DEFAULT_START_HOUR, 1, day_length_seconds)
    }

    /// Create with a specific starting time.
    ///
    /// The hour is wrapped into `[0, 24)` and the day is at least 1. Both
    /// latches start cleared, so the first `advance` announces the current
    /// half of the day.
    #[must_use]
    pub fn with_time(hour: f32, day: u32, day_length_seconds: f32) -> Self {
        let hour = if hour.is_finite() {
            hour.rem_euclid(HOURS_PER_DAY)
        } else {
            0.0
        };
        let mut clock = Self {
            hour,
            day: day.max(1),
            day_length_seconds: DEFAULT_DAY_LENGTH_SECONDS,
            sunrise_fired: false,
            sunset_fired: false,
        };
        clock.set_day_length(day_length_seconds);
        clock
    }

    /// Set the real seconds per game day.
    pub fn set_day_length(&mut self, seconds: f32) {
        self.day_length_seconds = if seconds.is_finite() {
            seconds.max(MIN_DAY_LENGTH_SECONDS)
        } else {
            DEFAULT_DAY_LENGTH_SECONDS
        };
    }

    /// Get the real seconds per game day.
    #[must_use]
    pub fn day_length(&self) -> f32 {
        self.day_length_seconds
    }

    /// Get the current hour of day (0.0 to 24.0, exclusive).
    #[must_use]
    pub fn hour(&self) -> f32 {
        self.hour
    }

    /// Get the current day number.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Get the current minute (0-59).
    #[must_use]
    pub fn minute(&self) -> u32 {
        (self.hour.fract() * 60.0) as u32 % 60
    }

    /// Check if it's daytime (6:00 to 18:00).
    #[must_use]
    pub fn is_day(&self) -> bool {
        (SUNRISE_HOUR..SUNSET_HOUR).contains(&self.hour)
    }

    /// Check if crops can grow at this hour (6:00 to 18:00 inclusive).
    #[must_use]
    pub fn is_growing_hour(&self) -> bool {
        (SUNRISE_HOUR..=SUNSET_HOUR).contains(&self.hour)
    }

    /// Get a formatted time string (HH:MM).
    #[must_use]
    pub fn format_time(&self) -> String {
        format!("{:02}:{:02}", self.hour as u32, self.minute())
    }

    /// Advance the clock by real elapsed seconds.
    ///
    /// Returns the transitions raised by this step: every midnight crossed
    /// yields a `NewDay`, then sunrise/sunset are evaluated against the final
    /// hour. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt_real_seconds: f32) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        if !dt_real_seconds.is_finite() || dt_real_seconds <= 0.0 {
            return events;
        }

        self.hour += dt_real_seconds * (HOURS_PER_DAY / self.day_length_seconds);

        while self.hour >= HOURS_PER_DAY {
            self.hour -= HOURS_PER_DAY;
            self.day += 1;
            self.sunrise_fired = false;
            self.sunset_fired = false;
            events.push(ClockEvent::NewDay(self.day));
        }

        if self.is_day() && !self.sunrise_fired {
            self.sunrise_fired = true;
            self.sunset_fired = false;
            events.push(ClockEvent::Sunrise);
        }

        if self.hour >= SUNSET_HOUR && !self.sunset_fired {
            self.sunset_fired = true;
            self.sunrise_fired = false;
            events.push(ClockEvent::Sunset);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growing_hours() {
        assert!(Clock::with_time(6.0, 1, 240.0).is_growing_hour());
        assert!(Clock::with_time(18.0, 1, 240.0).is_growing_hour());
        assert!(!Clock::with_time(18.0, 1, 240.0).is_day());
        assert!(!Clock::with_time(18.5, 1, 240.0).is_growing_hour());
        assert!(!Clock::with_time(3.0, 1, 240.0).is_growing_hour());
    }

    /// Advance `steps` times by `dt`, collecting all events.
    fn run(clock: &mut Clock, dt: f32, steps: usize) -> Vec<ClockEvent> {
        (0..steps).flat_map(|_| clock.advance(dt)).collect()
    }

    #[test]
    fn test_clock_creation() {
        let clock = Clock::default();
        assert!((clock.hour() - 6.0).abs() < f32::EPSILON);
        assert_eq!(clock.day(), 1);
        assert!(clock.is_day());
    }

    #[test]
    fn test_with_time_wraps_hour() {
        let clock = Clock::with_time(27.5, 0, 240.0);
        assert!((clock.hour() - 3.5).abs() < 0.001);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.format_time(), "03:30");
    }

    #[test]
    fn test_advance_rate() {
        // 240 s per day => 10 s per hour
        let mut clock = Clock::with_time(0.0, 1, 240.0);
        clock.advance(10.0);
        assert!((clock.hour() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_first_advance_announces_sunrise() {
        let mut clock = Clock::default();
        assert_eq!(clock.advance(0.1), vec![ClockEvent::Sunrise]);
        assert!(clock.advance(0.1).is_empty());
    }

    #[test]
    fn test_midnight_rollover() {
        let mut clock = Clock::with_time(23.5, 1, 240.0);
        let events = clock.advance(10.0);
        assert_eq!(clock.day(), 2);
        assert!((clock.hour() - 0.5).abs() < 0.001);
        assert_eq!(events, vec![ClockEvent::NewDay(2)]);
    }

    #[test]
    fn test_new_day_precedes_sunrise_in_one_step() {
        // 23:00 + 8 hours lands at 07:00 the next day
        let mut clock = Clock::with_time(23.0, 1, 240.0);
        let events = clock.advance(80.0);
        assert_eq!(events, vec![ClockEvent::NewDay(2), ClockEvent::Sunrise]);
    }

    #[test]
    fn test_full_day_emits_each_transition_once_in_order() {
        let mut clock = Clock::with_time(0.0, 1, 240.0);
        // Run to 23:00 on day 1 and discard those events.
        let warmup = run(&mut clock, 1.0, 230);
        assert_eq!(warmup, vec![ClockEvent::Sunrise, ClockEvent::Sunset]);

        // Exactly one day length in small steps.
        let events = run(&mut clock, 1.0, 240);
        assert_eq!(
            events,
            vec![ClockEvent::NewDay(2), ClockEvent::Sunrise, ClockEvent::Sunset]
        );
        assert_eq!(clock.day(), 2);
    }

    #[test]
    fn test_multi_day_step() {
        let mut clock = Clock::with_time(12.0, 1, 24.0);
        // 3 days in one step
        let events = clock.advance(72.0);
        let new_days: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ClockEvent::NewDay(_)))
            .collect();
        assert_eq!(new_days.len(), 3);
        assert_eq!(clock.day(), 4);
    }

    #[test]
    fn test_ignores_bad_delta() {
        let mut clock = Clock::default();
        assert!(clock.advance(-5.0).is_empty());
        assert!(clock.advance(f32::NAN).is_empty());
        assert!((clock.hour() - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_day_length_clamped() {
        let mut clock = Clock::default();
        clock.set_day_length(0.0);
        assert!(clock.day_length() > 0.0);
        clock.set_day_length(f32::INFINITY);
        assert!((clock.day_length() - DEFAULT_DAY_LENGTH_SECONDS).abs() < f32::EPSILON);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(ClockEvent::NewDay(3).description(), "Day 3 has begun");
        assert!(!ClockEvent::Sunset.description().is_empty());
    }
}
