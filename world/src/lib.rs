#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Sinking Hotel.

mod economy;
mod floors;
mod guests;
pub mod navigation;
mod rooms;

use std::{rc::Rc, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sinking_hotel_core::{
    Command, EconomyConfig, Event, GuestId, GuestProfile, GuestRoute, GuestTuning, HotelBounds,
    PlacementError, RoomId, RoomTemplate, RoomTemplateId, TileOffset,
};
use tracing::{debug, info, warn};

use economy::HotelEconomy;
use floors::FloorPlan;
use guests::{Guest, GuestContext, GuestStep};
use navigation::ShapeGraphCache;
use rooms::HotelRoom;

const DEFAULT_INITIAL_FLOORS: u32 = 1;
const DEFAULT_RNG_SEED: u64 = 0x5eed_4073_1a9e_0001;

/// Everything required to boot a world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Outer bounds of the hotel.
    pub bounds: HotelBounds,
    /// Money, rent and rating tuning.
    pub economy: EconomyConfig,
    /// Behavioural tuning shared by every guest.
    pub guests: GuestTuning,
    /// Buildable rooms, indexed by [`RoomTemplateId`].
    pub catalog: Vec<RoomTemplate>,
    /// Floors purchased while the world boots.
    pub initial_floors: u32,
    /// Seed for room selection and wandering.
    pub rng_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds: HotelBounds::default(),
            economy: EconomyConfig::default(),
            guests: GuestTuning::default(),
            catalog: Vec::new(),
            initial_floors: DEFAULT_INITIAL_FLOORS,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Represents the authoritative Sinking Hotel world state.
#[derive(Debug)]
pub struct World {
    bounds: HotelBounds,
    tuning: GuestTuning,
    catalog: Vec<Rc<RoomTemplate>>,
    economy: HotelEconomy,
    floors: FloorPlan,
    rooms: Vec<HotelRoom>,
    guests: Vec<Guest>,
    graphs: ShapeGraphCache,
    rng: ChaCha8Rng,
    next_room_id: u32,
    next_guest_id: u32,
    tick_index: u64,
    elapsed: Duration,
}

impl World {
    /// Creates a new world and purchases its initial floors.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let mut world = Self {
            bounds: config.bounds,
            tuning: config.guests,
            catalog: config.catalog.into_iter().map(Rc::new).collect(),
            economy: HotelEconomy::new(&config.economy),
            floors: FloorPlan::new(),
            rooms: Vec::new(),
            guests: Vec::new(),
            graphs: ShapeGraphCache::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            next_room_id: 0,
            next_guest_id: 0,
            tick_index: 0,
            elapsed: Duration::ZERO,
        };

        let mut boot_events = Vec::new();
        for _ in 0..config.initial_floors {
            world.purchase_floor(&mut boot_events);
        }
        world
    }

    fn advance_guests(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let World {
            rooms,
            guests,
            economy,
            graphs,
            rng,
            tuning,
            ..
        } = self;
        let mut ctx = GuestContext {
            rooms,
            economy,
            graphs,
            rng,
            tuning,
            out: out_events,
        };

        let mut departed: Vec<GuestId> = Vec::new();
        for guest in guests.iter_mut() {
            if guest.advance(dt, &mut ctx) == GuestStep::Despawn {
                departed.push(guest.id());
            }
        }

        if departed.is_empty() {
            return;
        }
        guests.retain(|guest| !departed.contains(&guest.id()));
        for guest in departed {
            debug!(guest = guest.get(), "guest despawned");
            ctx.out.push(Event::GuestDespawned { guest });
        }
    }

    fn purchase_floor(&mut self, out_events: &mut Vec<Event>) {
        let row = match self.floors.add_floor(self.bounds.max_height()) {
            Ok(row) => row,
            Err(reason) => {
                warn!(%reason, "floor purchase rejected");
                out_events.push(Event::FloorRejected { reason });
                return;
            }
        };

        let price = self.economy.floor_purchase_price();
        let funded = self.economy.try_spend(price, out_events);
        if funded {
            self.floors.add_backing_unit(row);
        }

        info!(
            height = self.floors.current_height(),
            total = self.floors.total_spawned_floors(),
            funded,
            "floor added"
        );
        out_events.push(Event::FloorAdded {
            current_height: self.floors.current_height(),
            total_spawned_floors: self.floors.total_spawned_floors(),
            funded,
        });
    }

    fn build_room(
        &mut self,
        template: RoomTemplateId,
        origin: TileOffset,
        out_events: &mut Vec<Event>,
    ) {
        if let Err(reason) = self.place_room(template, origin, out_events) {
            debug!(
                template = template.get(),
                x = origin.x(),
                y = origin.y(),
                %reason,
                "room placement rejected"
            );
            out_events.push(Event::RoomPlacementRejected {
                template,
                origin,
                reason,
            });
        }
    }

    fn place_room(
        &mut self,
        template_id: RoomTemplateId,
        origin: TileOffset,
        out_events: &mut Vec<Event>,
    ) -> Result<RoomId, PlacementError> {
        let template = self
            .catalog
            .get(template_id.get() as usize)
            .cloned()
            .ok_or(PlacementError::UnknownTemplate)?;

        let price = template.scaled_purchase_price();
        if self.economy.money() < price {
            return Err(PlacementError::InsufficientFunds);
        }

        let tiles = self
            .floors
            .validate_footprint(&self.bounds, origin, template.shape.offsets())?;

        if !self.economy.try_spend(price, out_events) {
            return Err(PlacementError::InsufficientFunds);
        }
        self.floors.occupy(&tiles);

        let room = RoomId::new(self.next_room_id);
        self.next_room_id = self.next_room_id.saturating_add(1);
        info!(
            room = room.get(),
            template = template_id.get(),
            shape = template.shape.name(),
            "room built"
        );
        self.rooms
            .push(HotelRoom::new(room, template_id, template, origin));
        out_events.push(Event::RoomBuilt {
            room,
            template: template_id,
            origin,
        });
        Ok(room)
    }

    /// Lowers the structure and every room by one row.
    ///
    /// Rooms are processed in reverse order so sunk rooms can be removed in
    /// place; each room's occupants are notified before the next room sinks.
    fn sink(&mut self, out_events: &mut Vec<Event>) {
        self.floors.sink();
        let current_height = self.floors.current_height();
        let occupied_tiles = self.floors.occupied().len();

        let World { rooms, guests, .. } = self;
        for index in (0..rooms.len()).rev() {
            let room = &mut rooms[index];
            let room_id = room.id();
            let was_flooded = room.is_flooded();

            let mut drowned: Vec<GuestId> = Vec::new();
            let notice = room.sink(|guest_id, notice| {
                let Some(guest) = guests.iter_mut().find(|guest| guest.id() == guest_id) else {
                    return;
                };
                if guest.on_sink(notice) {
                    drowned.push(guest_id);
                }
            });

            if notice.flooded_or_sunk() && !was_flooded {
                debug!(
                    room = room_id.get(),
                    occupants = room.guest_count(),
                    row = room.origin().y(),
                    "room flooded"
                );
                out_events.push(Event::RoomFlooded { room: room_id });
            }

            if !drowned.is_empty() {
                guests.retain(|guest| !drowned.contains(&guest.id()));
                for guest in drowned {
                    out_events.push(Event::GuestDrowned {
                        guest,
                        room: room_id,
                    });
                }
            }

            if notice.sunk {
                let _ = rooms.remove(index);
                info!(room = room_id.get(), "room sunk");
                out_events.push(Event::RoomSunk { room: room_id });
            }
        }

        info!(current_height, occupied_tiles, "hotel sank");
        out_events.push(Event::HotelSank { current_height });
    }

    fn spawn_guest(&mut self, profile: GuestProfile, route: GuestRoute, out_events: &mut Vec<Event>) {
        let guest = GuestId::new(self.next_guest_id);
        self.next_guest_id = self.next_guest_id.saturating_add(1);
        self.guests.push(Guest::spawn(
            guest,
            &profile,
            route,
            self.economy.rent_per_second(),
            &self.tuning,
        ));
        debug!(guest = guest.get(), luxury = profile.luxury.get(), "guest spawned");
        out_events.push(Event::GuestSpawned { guest });
    }

    fn force_leave(&mut self, target: Option<GuestId>, out_events: &mut Vec<Event>) {
        let World {
            rooms,
            guests,
            economy,
            graphs,
            rng,
            tuning,
            ..
        } = self;
        let mut ctx = GuestContext {
            rooms,
            economy,
            graphs,
            rng,
            tuning,
            out: out_events,
        };

        match target {
            Some(id) => match guests.iter_mut().find(|guest| guest.id() == id) {
                Some(guest) => guest.force_leave(&mut ctx),
                None => debug!(guest = id.get(), "forced leave for unknown guest ignored"),
            },
            None => {
                for guest in guests.iter_mut() {
                    guest.force_leave(&mut ctx);
                }
            }
        }
    }

    fn despawn_all_guests(&mut self, out_events: &mut Vec<Event>) {
        let guests = std::mem::take(&mut self.guests);
        info!(count = guests.len(), "despawning every guest");
        for mut guest in guests {
            guest.detach(&mut self.rooms);
            out_events.push(Event::GuestDespawned { guest: guest.id() });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_guests(dt.as_secs_f32(), out_events);
        }
        Command::PurchaseFloor => world.purchase_floor(out_events),
        Command::BuildRoom { template, origin } => world.build_room(template, origin, out_events),
        Command::SinkHotel => world.sink(out_events),
        Command::SpawnGuest { profile, route } => world.spawn_guest(profile, route, out_events),
        Command::ForceGuestLeave { guest } => world.force_leave(Some(guest), out_events),
        Command::ForceAllGuestsLeave => world.force_leave(None, out_events),
        Command::DespawnAllGuests => world.despawn_all_guests(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use sinking_hotel_core::{
        EconomySnapshot, GuestId, GuestSnapshot, HotelBounds, RoomId, RoomSnapshot, RoomTemplate,
        RoomTemplateId, TileOffset,
    };

    /// Captures the hotel's money and rating.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        world.economy.snapshot()
    }

    /// Review scores currently averaged into the rating, oldest first.
    #[must_use]
    pub fn reviews(world: &World) -> Vec<u32> {
        world.economy.reviews().collect()
    }

    /// Label of the floor purchase control, including its price.
    #[must_use]
    pub fn floor_purchase_label(world: &World) -> String {
        format!(
            "{}, ${}",
            world.economy.floor_label(),
            world.economy.floor_purchase_price()
        )
    }

    /// Number of floors currently standing.
    #[must_use]
    pub fn current_height(world: &World) -> u32 {
        world.floors.current_height()
    }

    /// Number of floors ever added, including sunken ones.
    #[must_use]
    pub fn total_spawned_floors(world: &World) -> u32 {
        world.floors.total_spawned_floors()
    }

    /// Hotel-local rows of the structural units backing paid floors.
    #[must_use]
    pub fn backing_units(world: &World) -> &[i32] {
        world.floors.backing_units()
    }

    /// Reports whether a room fills the hotel-local tile.
    #[must_use]
    pub fn is_occupied(world: &World, tile: TileOffset) -> bool {
        world.floors.occupied().contains(tile)
    }

    /// Every filled hotel-local tile in coordinate order.
    #[must_use]
    pub fn occupied_tiles(world: &World) -> Vec<TileOffset> {
        world.floors.occupied().iter().collect()
    }

    /// Provides read-only access to the hotel bounds.
    #[must_use]
    pub fn bounds(world: &World) -> &HotelBounds {
        &world.bounds
    }

    /// Looks up a catalog entry.
    #[must_use]
    pub fn room_template(world: &World, template: RoomTemplateId) -> Option<&RoomTemplate> {
        world
            .catalog
            .get(template.get() as usize)
            .map(|template| template.as_ref())
    }

    /// Captures a read-only view of the standing rooms.
    #[must_use]
    pub fn room_view(world: &World) -> RoomView {
        let mut snapshots: Vec<RoomSnapshot> =
            world.rooms.iter().map(|room| room.snapshot()).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        RoomView { snapshots }
    }

    /// Captures a single room, if it still stands.
    #[must_use]
    pub fn room(world: &World, room: RoomId) -> Option<RoomSnapshot> {
        world
            .rooms
            .iter()
            .find(|candidate| candidate.id() == room)
            .map(|candidate| candidate.snapshot())
    }

    /// Captures a read-only view of the guests inside the simulation.
    #[must_use]
    pub fn guest_view(world: &World) -> GuestView {
        let mut snapshots: Vec<GuestSnapshot> =
            world.guests.iter().map(|guest| guest.snapshot()).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        GuestView { snapshots }
    }

    /// Captures a single guest, if it is still present.
    #[must_use]
    pub fn guest(world: &World, guest: GuestId) -> Option<GuestSnapshot> {
        world
            .guests
            .iter()
            .find(|candidate| candidate.id() == guest)
            .map(|candidate| candidate.snapshot())
    }

    /// Simulated time accumulated from ticks.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only snapshot describing all standing rooms.
    #[derive(Clone, Debug)]
    pub struct RoomView {
        snapshots: Vec<RoomSnapshot>,
    }

    impl RoomView {
        /// Iterator over the captured room snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &RoomSnapshot> {
            self.snapshots.iter()
        }

        /// Number of standing rooms.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no room stands.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<RoomSnapshot> {
            self.snapshots
        }
    }

    /// Read-only snapshot describing all guests.
    #[derive(Clone, Debug)]
    pub struct GuestView {
        snapshots: Vec<GuestSnapshot>,
    }

    impl GuestView {
        /// Iterator over the captured guest snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &GuestSnapshot> {
            self.snapshots.iter()
        }

        /// Number of guests.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the hotel has no guests.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<GuestSnapshot> {
            self.snapshots
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinking_hotel_core::{FloorError, LuxuryMultiplier, NeedType, RoomShape};

    fn lobby() -> RoomTemplate {
        RoomTemplate {
            label: String::from("Lobby"),
            shape: RoomShape::rectangle("single", 1, 1),
            capacity: 1,
            purchase_price: 100.0,
            rent_multiplier: 1.0,
            satisfied_needs: vec![NeedType::Leisure],
            door_offset: TileOffset::new(0, 0),
            luxury: LuxuryMultiplier::PREMIUM,
            fulfilling_rate: 1.0,
        }
    }

    #[test]
    fn world_boots_with_initial_floor_purchased() {
        let world = World::new(WorldConfig::default());
        assert_eq!(query::current_height(&world), 1);
        assert_eq!(query::total_spawned_floors(&world), 1);
        assert_eq!(query::backing_units(&world), &[0]);
        assert!((query::economy(&world).money - 1_985.0).abs() < 1e-3);
    }

    #[test]
    fn floor_label_includes_price() {
        let world = World::new(WorldConfig::default());
        assert_eq!(query::floor_purchase_label(&world), "New Floor, $15");
    }

    #[test]
    fn unknown_template_is_rejected() {
        let mut world = World::new(WorldConfig::default());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildRoom {
                template: RoomTemplateId::new(3),
                origin: TileOffset::new(0, 0),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::RoomPlacementRejected {
                template: RoomTemplateId::new(3),
                origin: TileOffset::new(0, 0),
                reason: PlacementError::UnknownTemplate,
            }]
        );
    }

    #[test]
    fn luxury_scales_room_price() {
        let mut world = World::new(WorldConfig {
            catalog: vec![lobby()],
            ..WorldConfig::default()
        });
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildRoom {
                template: RoomTemplateId::new(0),
                origin: TileOffset::new(0, 0),
            },
            &mut events,
        );
        assert!((query::economy(&world).money - 1_785.0).abs() < 1e-3);
        assert_eq!(query::room_view(&world).len(), 1);
    }

    #[test]
    fn unfunded_floor_still_raises_the_hotel() {
        let mut world = World::new(WorldConfig {
            economy: EconomyConfig {
                starting_money: 20.0,
                ..EconomyConfig::default()
            },
            ..WorldConfig::default()
        });
        let mut events = Vec::new();
        apply(&mut world, Command::PurchaseFloor, &mut events);

        assert_eq!(
            events,
            vec![Event::FloorAdded {
                current_height: 2,
                total_spawned_floors: 2,
                funded: false,
            }]
        );
        assert_eq!(query::backing_units(&world), &[0]);
        assert!((query::economy(&world).money - 5.0).abs() < 1e-3);
    }

    #[test]
    fn floors_stop_at_the_hotel_ceiling() {
        let mut world = World::new(WorldConfig {
            bounds: HotelBounds {
                min_y: 0,
                max_y: 2,
                ..HotelBounds::default()
            },
            ..WorldConfig::default()
        });
        let mut events = Vec::new();
        apply(&mut world, Command::PurchaseFloor, &mut events);
        apply(&mut world, Command::PurchaseFloor, &mut events);

        assert_eq!(
            events.last(),
            Some(&Event::FloorRejected {
                reason: FloorError::MaximumHeightReached,
            })
        );
        assert_eq!(query::current_height(&world), 2);
    }
}
