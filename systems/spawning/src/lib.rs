#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting guest waves.
//!
//! A wave is triggered every wave interval, starting on the very first tick.
//! Its size grows with the hotel's rating, and the guests of a wave are
//! released one per guest interval. Several waves may be in flight at once.

use std::time::Duration;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sinking_hotel_core::{
    Command, Event, GuestProfile, GuestRoute, LuxuryMultiplier, NeedAllotment, NeedType,
};
use tracing::debug;

const DEFAULT_WAVE_INTERVAL: Duration = Duration::from_secs(6);
const DEFAULT_GUEST_INTERVAL: Duration = Duration::from_millis(200);
const DEFAULT_NEED_SECS: f32 = 10.0;
const DEFAULT_LUXURY_CHANCE: f64 = 0.25;
const SECOND_GUEST_RATING: f32 = 0.4;
const THIRD_GUEST_RATING: f32 = 0.8;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    wave_interval: Duration,
    guest_interval: Duration,
    rng_seed: u64,
    luxury_chance: f64,
    guaranteed_need: NeedAllotment,
    need_pool: Vec<NeedAllotment>,
    route: GuestRoute,
}

impl Config {
    /// Creates a configuration using the provided cadence, seed and route.
    ///
    /// Every guest wants rest plus one other need drawn from dining, leisure
    /// and wellness, each lasting ten seconds.
    #[must_use]
    pub fn new(
        wave_interval: Duration,
        guest_interval: Duration,
        rng_seed: u64,
        route: GuestRoute,
    ) -> Self {
        Self {
            wave_interval,
            guest_interval,
            rng_seed,
            luxury_chance: DEFAULT_LUXURY_CHANCE,
            guaranteed_need: NeedAllotment::new(NeedType::Rest, DEFAULT_NEED_SECS),
            need_pool: [NeedType::Dining, NeedType::Leisure, NeedType::Wellness]
                .into_iter()
                .map(|need| NeedAllotment::new(need, DEFAULT_NEED_SECS))
                .collect(),
            route,
        }
    }

    /// Creates a configuration with the default cadence.
    #[must_use]
    pub fn with_defaults(rng_seed: u64, route: GuestRoute) -> Self {
        Self::new(DEFAULT_WAVE_INTERVAL, DEFAULT_GUEST_INTERVAL, rng_seed, route)
    }

    /// Overrides the probability that a guest is a premium guest.
    #[must_use]
    pub fn with_luxury_chance(mut self, luxury_chance: f64) -> Self {
        self.luxury_chance = luxury_chance;
        self
    }

    /// Overrides the need every guest has and the pool the second need is drawn from.
    #[must_use]
    pub fn with_needs(mut self, guaranteed: NeedAllotment, pool: Vec<NeedAllotment>) -> Self {
        self.guaranteed_need = guaranteed;
        self.need_pool = pool;
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct Wave {
    remaining: u32,
    next_in: Duration,
}

/// Pure system that deterministically emits guest spawn commands.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    countdown: Duration,
    waves: Vec<Wave>,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            countdown: Duration::ZERO,
            waves: Vec::new(),
        }
    }

    /// Consumes events and the current rating to emit spawn commands.
    ///
    /// `rating_fraction` is the hotel rating divided by its maximum.
    ///
    /// A zero wave interval disables the periodic waves; waves started with
    /// [`Spawning::trigger_wave`] are still released.
    pub fn handle(&mut self, events: &[Event], rating_fraction: f32, out: &mut Vec<Command>) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.advance(*dt, rating_fraction, out);
            }
        }
    }

    /// Starts a wave immediately, outside the regular cadence.
    ///
    /// The first guest is emitted right away; the rest follow one guest
    /// interval apart on subsequent ticks. The periodic countdown is untouched.
    pub fn trigger_wave(&mut self, rating_fraction: f32, out: &mut Vec<Command>) {
        let wave = self.start_wave(rating_fraction, Duration::ZERO, out);
        if wave.remaining > 0 {
            self.waves.push(wave);
        }
    }

    /// Drops every wave that still has guests to release.
    pub fn cancel(&mut self) {
        self.waves.clear();
    }

    /// Number of waves still releasing guests.
    #[must_use]
    pub fn waves_in_flight(&self) -> usize {
        self.waves.len()
    }

    /// Number of guests queued across all in-flight waves.
    #[must_use]
    pub fn pending_guests(&self) -> u32 {
        self.waves.iter().map(|wave| wave.remaining).sum()
    }

    fn advance(&mut self, dt: Duration, rating_fraction: f32, out: &mut Vec<Command>) {
        let mut waves = std::mem::take(&mut self.waves);
        for wave in &mut waves {
            self.release(wave, dt, out);
        }

        if !self.config.wave_interval.is_zero() {
            let mut left = dt;
            while self.countdown <= left {
                left -= self.countdown;
                self.countdown = self.config.wave_interval;
                waves.push(self.start_wave(rating_fraction, left, out));
            }
            self.countdown -= left;
        }

        waves.retain(|wave| wave.remaining > 0);
        self.waves = waves;
    }

    /// Draws a wave and releases the guests due within `elapsed`.
    fn start_wave(
        &mut self,
        rating_fraction: f32,
        elapsed: Duration,
        out: &mut Vec<Command>,
    ) -> Wave {
        let size = self.wave_size(rating_fraction);
        debug!(size, rating_fraction, "guest wave triggered");
        let mut wave = Wave {
            remaining: size,
            next_in: Duration::ZERO,
        };
        self.release(&mut wave, elapsed, out);
        wave
    }

    /// Emits every guest of the wave that becomes due within `elapsed`.
    fn release(&mut self, wave: &mut Wave, elapsed: Duration, out: &mut Vec<Command>) {
        let mut left = elapsed;
        while wave.remaining > 0 {
            if wave.next_in > left {
                wave.next_in -= left;
                return;
            }
            left -= wave.next_in;
            wave.remaining -= 1;
            wave.next_in = self.config.guest_interval;
            let profile = self.next_profile();
            out.push(Command::SpawnGuest {
                profile,
                route: self.config.route,
            });
        }
    }

    fn wave_size(&mut self, rating_fraction: f32) -> u32 {
        let mut possible = 1;
        if rating_fraction > SECOND_GUEST_RATING {
            possible += 1;
        }
        if rating_fraction > THIRD_GUEST_RATING {
            possible += 1;
        }
        self.rng.gen_range(1..=possible)
    }

    fn next_profile(&mut self) -> GuestProfile {
        let chance = self.config.luxury_chance;
        let luxury = if chance > 0.0 && self.rng.gen_bool(chance.min(1.0)) {
            LuxuryMultiplier::PREMIUM
        } else {
            LuxuryMultiplier::STANDARD
        };

        let guaranteed = self.config.guaranteed_need;
        let mut needs = vec![guaranteed];
        let extras: Vec<NeedAllotment> = self
            .config
            .need_pool
            .iter()
            .copied()
            .filter(|allotment| allotment.need != guaranteed.need)
            .collect();
        if let Some(extra) = extras.choose(&mut self.rng) {
            needs.push(*extra);
        }

        GuestProfile { luxury, needs }
    }
}
