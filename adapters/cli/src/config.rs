use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sinking_hotel_core::{
    Command, EconomyConfig, GuestRoute, GuestTuning, HotelBounds, NeedAllotment, NeedType,
    Position, RoomTemplate, RoomTemplateId, TileOffset,
};
use sinking_hotel_system_sinking as sinking;
use sinking_hotel_system_spawning as spawning;
use sinking_hotel_world::WorldConfig;

/// Scenario shipped with the binary and used when no file is supplied.
const BUILTIN_SCENARIO: &str = include_str!("../scenario.toml");

/// Complete description of a headless simulation run.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub(crate) run: RunSection,
    #[serde(default)]
    pub(crate) hotel: HotelSection,
    #[serde(default)]
    pub(crate) economy: EconomyConfig,
    #[serde(default)]
    pub(crate) guests: GuestTuning,
    #[serde(default)]
    pub(crate) sinking: SinkingSection,
    #[serde(default)]
    pub(crate) spawning: SpawningSection,
    #[serde(default)]
    pub(crate) rooms: Vec<RoomTemplate>,
    #[serde(default)]
    pub(crate) script: Vec<ScriptStep>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunSection {
    pub(crate) duration_secs: f64,
    pub(crate) tick_ms: u64,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            duration_secs: 120.0,
            tick_ms: 100,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HotelSection {
    pub(crate) bounds: HotelBounds,
    pub(crate) initial_floors: u32,
    pub(crate) seed: u64,
}

impl Default for HotelSection {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            bounds: world.bounds,
            initial_floors: world.initial_floors,
            seed: world.rng_seed,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SinkingSection {
    pub(crate) enabled: bool,
    pub(crate) min_interval_secs: f64,
    pub(crate) variable_interval_secs: f64,
    pub(crate) floor_cap: u32,
}

impl Default for SinkingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_secs: 5.0,
            variable_interval_secs: 15.0,
            floor_cap: 100,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawningSection {
    pub(crate) wave_interval_secs: f64,
    pub(crate) guest_interval_secs: f64,
    pub(crate) luxury_chance: f64,
    pub(crate) seed: u64,
    pub(crate) guaranteed_need: NeedAllotment,
    pub(crate) need_pool: Vec<NeedAllotment>,
    pub(crate) route: GuestRoute,
}

impl Default for SpawningSection {
    fn default() -> Self {
        Self {
            wave_interval_secs: 6.0,
            guest_interval_secs: 0.2,
            luxury_chance: 0.25,
            seed: 0x9e37_79b9_7f4a_7c15,
            guaranteed_need: NeedAllotment::new(NeedType::Rest, 10.0),
            need_pool: [NeedType::Dining, NeedType::Leisure, NeedType::Wellness]
                .into_iter()
                .map(|need| NeedAllotment::new(need, 10.0))
                .collect(),
            route: GuestRoute {
                spawn: Position::new(-3.0, 0.0),
                entrance: Position::new(0.0, 0.0),
                exit: Position::new(0.0, 0.0),
                despawn: Position::new(-3.0, 0.0),
            },
        }
    }
}

/// Command scheduled at a point of simulated time.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ScriptStep {
    pub(crate) at_secs: f64,
    #[serde(flatten)]
    pub(crate) action: ScriptAction,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum ScriptAction {
    PurchaseFloor,
    BuildRoom { template: u32, x: i32, y: i32 },
    SinkHotel,
    ForceAllGuestsLeave,
    DespawnAllGuests,
    SpawnWave,
}

impl ScriptAction {
    /// World command for the action; `None` for actions handled by a system.
    pub(crate) fn to_command(&self) -> Option<Command> {
        let command = match self {
            Self::PurchaseFloor => Command::PurchaseFloor,
            Self::BuildRoom { template, x, y } => Command::BuildRoom {
                template: RoomTemplateId::new(*template),
                origin: TileOffset::new(*x, *y),
            },
            Self::SinkHotel => Command::SinkHotel,
            Self::ForceAllGuestsLeave => Command::ForceAllGuestsLeave,
            Self::DespawnAllGuests => Command::DespawnAllGuests,
            Self::SpawnWave => return None,
        };
        Some(command)
    }
}

impl Scenario {
    /// Parses the scenario bundled with the binary.
    pub(crate) fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_SCENARIO).context("failed to load the built-in scenario")
    }

    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.run.tick_ms == 0 {
            bail!("run.tick_ms must be positive");
        }
        if !(0.0..=1.0).contains(&self.spawning.luxury_chance) {
            bail!(
                "spawning.luxury_chance must lie in [0, 1], got {}",
                self.spawning.luxury_chance
            );
        }
        for (index, room) in self.rooms.iter().enumerate() {
            if room.shape.is_empty() {
                bail!("room {index} ({}) has an empty shape", room.label);
            }
            if !room.shape.contains(room.door_offset) {
                bail!("room {index} ({}) has its door outside its shape", room.label);
            }
        }
        for step in &self.script {
            if let ScriptAction::BuildRoom { template, .. } = step.action {
                if template as usize >= self.rooms.len() {
                    bail!(
                        "script step at {}s builds unknown room template {template}",
                        step.at_secs
                    );
                }
            }
        }
        Ok(())
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.run.tick_ms)
    }

    pub(crate) fn duration(&self) -> Result<Duration> {
        seconds(self.run.duration_secs, "run.duration_secs")
    }

    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig {
            bounds: self.hotel.bounds,
            economy: self.economy.clone(),
            guests: self.guests.clone(),
            catalog: self.rooms.clone(),
            initial_floors: self.hotel.initial_floors,
            rng_seed: self.hotel.seed,
        }
    }

    pub(crate) fn sinking_config(&self) -> Result<sinking::Config> {
        Ok(sinking::Config::new(
            seconds(self.sinking.min_interval_secs, "sinking.min_interval_secs")?,
            seconds(
                self.sinking.variable_interval_secs,
                "sinking.variable_interval_secs",
            )?,
            self.sinking.floor_cap,
        ))
    }

    pub(crate) fn spawning_config(&self) -> Result<spawning::Config> {
        let section = &self.spawning;
        Ok(spawning::Config::new(
            seconds(section.wave_interval_secs, "spawning.wave_interval_secs")?,
            seconds(section.guest_interval_secs, "spawning.guest_interval_secs")?,
            section.seed,
            section.route,
        )
        .with_luxury_chance(section.luxury_chance)
        .with_needs(section.guaranteed_need, section.need_pool.clone()))
    }
}

fn seconds(value: f64, field: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{field} must be a finite, non-negative number of seconds"))
}
