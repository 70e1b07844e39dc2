#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Elastic sink timer that periodically lowers the hotel.
//!
//! The timer arms once the hotel first stands taller than a single floor.
//! Its interval shrinks as more floors are purchased: taller hotels sink
//! faster until the floor cap is reached, after which the interval stays at
//! its minimum.

use std::time::Duration;

use sinking_hotel_core::{Command, Event};
use tracing::debug;

const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_VARIABLE_INTERVAL: Duration = Duration::from_secs(15);
const DEFAULT_FLOOR_CAP: u32 = 100;

/// Configuration parameters required to construct the sink scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    min_interval: Duration,
    variable_interval: Duration,
    floor_cap: u32,
}

impl Config {
    /// Creates a configuration from the interval bounds and the floor cap.
    #[must_use]
    pub const fn new(min_interval: Duration, variable_interval: Duration, floor_cap: u32) -> Self {
        Self {
            min_interval,
            variable_interval,
            floor_cap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_INTERVAL,
            DEFAULT_VARIABLE_INTERVAL,
            DEFAULT_FLOOR_CAP,
        )
    }
}

/// Pure system that emits [`Command::SinkHotel`] whenever the timer elapses.
#[derive(Debug)]
pub struct SinkScheduler {
    config: Config,
    active: bool,
    armed: bool,
    elapsed: Duration,
    target: Duration,
    total_spawned_floors: u32,
}

impl SinkScheduler {
    /// Creates a disarmed scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut scheduler = Self {
            config,
            active: true,
            armed: false,
            elapsed: Duration::ZERO,
            target: Duration::ZERO,
            total_spawned_floors: 0,
        };
        scheduler.target = scheduler.compute_target();
        scheduler
    }

    /// Consumes world events and emits sink commands once the timer elapses.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::FloorAdded {
                    current_height,
                    total_spawned_floors,
                    ..
                } => {
                    self.total_spawned_floors = *total_spawned_floors;
                    self.target = self.compute_target();
                    if !self.armed && *current_height > 1 {
                        self.armed = true;
                        self.elapsed = Duration::ZERO;
                        debug!(target_secs = self.target.as_secs_f32(), "sink timer armed");
                    }
                }
                Event::TimeAdvanced { dt } => {
                    if !self.armed || !self.active {
                        continue;
                    }
                    self.elapsed = self.elapsed.saturating_add(*dt);
                    if self.elapsed >= self.target {
                        self.elapsed = Duration::ZERO;
                        self.target = self.compute_target();
                        debug!(
                            floors = self.total_spawned_floors,
                            next_secs = self.target.as_secs_f32(),
                            "sink timer elapsed"
                        );
                        out.push(Command::SinkHotel);
                    }
                }
                _ => {}
            }
        }
    }

    /// Pauses or resumes the countdown without losing accumulated time.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Reports whether the countdown is currently allowed to advance.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Reports whether the hotel has grown tall enough to start sinking.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Interval the current countdown runs towards.
    #[must_use]
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Fraction of the current countdown that has elapsed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if !self.armed || self.target.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f32() / self.target.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn compute_target(&self) -> Duration {
        let cap = self.config.floor_cap;
        if cap == 0 {
            return self.config.min_interval;
        }
        let remaining = cap.saturating_sub(self.total_spawned_floors);
        let share = f64::from(remaining) / f64::from(cap);
        self.config
            .min_interval
            .saturating_add(self.config.variable_interval.mul_f64(share))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_added(current_height: u32, total_spawned_floors: u32) -> Event {
        Event::FloorAdded {
            current_height,
            total_spawned_floors,
            funded: true,
        }
    }

    #[test]
    fn target_shrinks_with_floors_and_bottoms_out_at_minimum() {
        let mut scheduler = SinkScheduler::new(Config::default());
        assert_eq!(scheduler.target(), Duration::from_secs(20));

        let mut commands = Vec::new();
        scheduler.handle(&[floor_added(2, 50)], &mut commands);
        assert_eq!(scheduler.target(), Duration::from_millis(12_500));

        scheduler.handle(&[floor_added(3, 100)], &mut commands);
        assert_eq!(scheduler.target(), Duration::from_secs(5));

        scheduler.handle(&[floor_added(4, 250)], &mut commands);
        assert_eq!(scheduler.target(), Duration::from_secs(5));
        assert!(commands.is_empty());
    }

    #[test]
    fn zero_floor_cap_uses_minimum_interval() {
        let scheduler = SinkScheduler::new(Config::new(
            Duration::from_secs(3),
            Duration::from_secs(10),
            0,
        ));
        assert_eq!(scheduler.target(), Duration::from_secs(3));
    }

    #[test]
    fn single_floor_does_not_arm_the_timer() {
        let mut scheduler = SinkScheduler::new(Config::default());
        let mut commands = Vec::new();
        scheduler.handle(
            &[
                floor_added(1, 1),
                Event::TimeAdvanced {
                    dt: Duration::from_secs(60),
                },
            ],
            &mut commands,
        );
        assert!(!scheduler.is_armed());
        assert!(commands.is_empty());
        assert_eq!(scheduler.progress(), 0.0);
    }
}
