use std::{fmt, time::Duration};

use anyhow::Result;
use sinking_hotel_core::{Command, Event};
use sinking_hotel_system_sinking::SinkScheduler;
use sinking_hotel_system_spawning::Spawning;
use sinking_hotel_world::{self as world, query, World};
use tracing::{debug, info};

use crate::config::{Scenario, ScriptStep};

/// Headless driver that couples the world with its systems.
pub(crate) struct Simulation {
    world: World,
    sinking: SinkScheduler,
    spawning: Spawning,
    script: Vec<ScriptStep>,
    next_step: usize,
    tick: Duration,
    tally: Tally,
}

/// Counters accumulated from the events of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) floors_added: u32,
    pub(crate) floors_rejected: u32,
    pub(crate) rooms_built: u32,
    pub(crate) placements_rejected: u32,
    pub(crate) sinks: u32,
    pub(crate) rooms_flooded: u32,
    pub(crate) rooms_sunk: u32,
    pub(crate) guests_spawned: u32,
    pub(crate) guests_despawned: u32,
    pub(crate) guests_drowned: u32,
    pub(crate) reviews: u32,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::FloorAdded { .. } => self.floors_added += 1,
            Event::FloorRejected { .. } => self.floors_rejected += 1,
            Event::RoomBuilt { .. } => self.rooms_built += 1,
            Event::RoomPlacementRejected { .. } => self.placements_rejected += 1,
            Event::HotelSank { .. } => self.sinks += 1,
            Event::RoomFlooded { .. } => self.rooms_flooded += 1,
            Event::RoomSunk { .. } => self.rooms_sunk += 1,
            Event::GuestSpawned { .. } => self.guests_spawned += 1,
            Event::GuestDespawned { .. } => self.guests_despawned += 1,
            Event::GuestDrowned { .. } => self.guests_drowned += 1,
            Event::ReviewPosted { .. } => self.reviews += 1,
            Event::TimeAdvanced { .. }
            | Event::MoneyChanged
            | Event::RatingChanged
            | Event::GuestEnteredRoom { .. }
            | Event::GuestLeaving { .. } => {}
        }
    }
}

/// Final state reported once a run completes.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) elapsed: Duration,
    pub(crate) ticks: u64,
    pub(crate) hotel_width: f32,
    pub(crate) money: f32,
    pub(crate) rating: f32,
    pub(crate) max_rating: u32,
    pub(crate) current_height: u32,
    pub(crate) total_spawned_floors: u32,
    pub(crate) rooms_standing: usize,
    pub(crate) guests_present: usize,
    pub(crate) tally: Tally,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tally = &self.tally;
        writeln!(
            f,
            "simulated {:.1}s over {} ticks",
            self.elapsed.as_secs_f32(),
            self.ticks
        )?;
        writeln!(
            f,
            "money ${:.2}, rating {:.2}/{}",
            self.money, self.rating, self.max_rating
        )?;
        writeln!(
            f,
            "floors: {} standing on a {:.0}-unit lot, {} ever built, {} bought, {} rejected, {} sinks",
            self.current_height,
            self.hotel_width,
            self.total_spawned_floors,
            tally.floors_added,
            tally.floors_rejected,
            tally.sinks
        )?;
        writeln!(
            f,
            "rooms: {} standing, {} built, {} rejected, {} flooded, {} sunk",
            self.rooms_standing,
            tally.rooms_built,
            tally.placements_rejected,
            tally.rooms_flooded,
            tally.rooms_sunk
        )?;
        write!(
            f,
            "guests: {} present, {} spawned, {} departed, {} drowned, {} reviews",
            self.guests_present,
            tally.guests_spawned,
            tally.guests_despawned,
            tally.guests_drowned,
            tally.reviews
        )
    }
}

impl Simulation {
    pub(crate) fn new(scenario: &Scenario) -> Result<Self> {
        let mut sinking = SinkScheduler::new(scenario.sinking_config()?);
        sinking.set_active(scenario.sinking.enabled);
        let spawning = Spawning::new(scenario.spawning_config()?);

        let mut script = scenario.script.clone();
        script.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));

        Ok(Self {
            world: World::new(scenario.world_config()),
            sinking,
            spawning,
            script,
            next_step: 0,
            tick: scenario.tick(),
            tally: Tally::default(),
        })
    }

    /// Runs whole ticks until at least `duration` of simulated time has passed.
    pub(crate) fn run(&mut self, duration: Duration) -> Summary {
        info!(
            duration_secs = duration.as_secs_f32(),
            tick_ms = self.tick.as_millis() as u64,
            "simulation started"
        );
        while query::elapsed(&self.world) < duration {
            self.step();
        }
        let summary = self.summary();
        info!(
            money = summary.money,
            rating = summary.rating,
            height = summary.current_height,
            "simulation finished"
        );
        summary
    }

    /// Applies due script commands, advances the clock and lets the systems react.
    pub(crate) fn step(&mut self) {
        let mut commands = self.due_script_commands();
        commands.push(Command::Tick { dt: self.tick });

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut follow_ups = Vec::new();
        self.sinking.handle(&events, &mut follow_ups);
        let rating_fraction = query::economy(&self.world).rating_fraction();
        self.spawning.handle(&events, rating_fraction, &mut follow_ups);
        for command in follow_ups {
            world::apply(&mut self.world, command, &mut events);
        }

        for event in &events {
            if let Event::RoomBuilt { room, template, .. } = event {
                if let Some(template) = query::room_template(&self.world, *template) {
                    debug!(room = room.get(), label = %template.label, "room opened");
                }
            }
            self.tally.record(event);
        }
    }

    fn due_script_commands(&mut self) -> Vec<Command> {
        let now = query::elapsed(&self.world).as_secs_f64();
        let rating_fraction = query::economy(&self.world).rating_fraction();
        let mut commands = Vec::new();
        while let Some(step) = self.script.get(self.next_step) {
            if step.at_secs > now {
                break;
            }
            debug!(at_secs = step.at_secs, action = ?step.action, "script step due");
            match step.action.to_command() {
                Some(command) => commands.push(command),
                None => self.spawning.trigger_wave(rating_fraction, &mut commands),
            }
            self.next_step += 1;
        }
        commands
    }

    pub(crate) fn summary(&self) -> Summary {
        let economy = query::economy(&self.world);
        Summary {
            elapsed: query::elapsed(&self.world),
            ticks: query::tick_index(&self.world),
            hotel_width: query::bounds(&self.world).width_in_units(),
            money: economy.money,
            rating: economy.rating,
            max_rating: economy.max_rating,
            current_height: query::current_height(&self.world),
            total_spawned_floors: query::total_spawned_floors(&self.world),
            rooms_standing: query::room_view(&self.world).len(),
            guests_present: query::guest_view(&self.world).len(),
            tally: self.tally,
        }
    }
}
