#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sinking Hotel simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and display layers to react to. Catalog data such as
//! [`RoomTemplate`] and tuning records such as [`EconomyConfig`] are read-only
//! inputs owned by whoever boots the world.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new floor is stacked on top of the hotel.
    PurchaseFloor,
    /// Requests construction of a catalog room anchored at the provided pivot.
    BuildRoom {
        /// Catalog entry describing the room to construct.
        template: RoomTemplateId,
        /// Hotel-local tile that the room's shape offsets are relative to.
        origin: TileOffset,
    },
    /// Lowers the whole hotel by a single row.
    SinkHotel,
    /// Requests that a guest is created at the route's spawn point.
    SpawnGuest {
        /// Luxury tier and needs assigned to the guest.
        profile: GuestProfile,
        /// Points the guest walks between while arriving and leaving.
        route: GuestRoute,
    },
    /// Forces a single guest to abandon its stay and leave the hotel.
    ForceGuestLeave {
        /// Handle returned when the guest was spawned.
        guest: GuestId,
    },
    /// Forces every guest to abandon its stay and leave the hotel.
    ForceAllGuestsLeave,
    /// Removes every guest immediately without collecting reviews.
    DespawnAllGuests,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The hotel's money balance was set. Listeners re-read the balance.
    MoneyChanged,
    /// The hotel's rating was set. Listeners re-read the rating.
    RatingChanged,
    /// Confirms that a floor was added on top of the hotel.
    FloorAdded {
        /// Number of floors currently standing after the purchase.
        current_height: u32,
        /// Number of floors ever added, including sunken ones.
        total_spawned_floors: u32,
        /// Whether the floor price was paid and a backing unit was built.
        funded: bool,
    },
    /// Reports that a floor purchase request was refused.
    FloorRejected {
        /// Specific reason the purchase failed.
        reason: FloorError,
    },
    /// Confirms that a room was constructed.
    RoomBuilt {
        /// Identifier assigned to the room by the world.
        room: RoomId,
        /// Catalog entry the room was built from.
        template: RoomTemplateId,
        /// Hotel-local pivot of the room.
        origin: TileOffset,
    },
    /// Reports that a room placement request was rejected.
    RoomPlacementRejected {
        /// Catalog entry requested for placement.
        template: RoomTemplateId,
        /// Pivot provided in the placement request.
        origin: TileOffset,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that the hotel sank by one row.
    HotelSank {
        /// Number of floors still standing after the sink pass.
        current_height: u32,
    },
    /// A room dipped below the hotel's lower bound for the first time.
    RoomFlooded {
        /// Identifier of the flooded room.
        room: RoomId,
    },
    /// A room went fully below the hotel's lower bound and was removed.
    RoomSunk {
        /// Identifier of the removed room.
        room: RoomId,
    },
    /// Confirms that a guest was created.
    GuestSpawned {
        /// Handle assigned to the new guest.
        guest: GuestId,
    },
    /// A guest checked into a room.
    GuestEnteredRoom {
        /// Guest that moved in.
        guest: GuestId,
        /// Room the guest now occupies.
        room: RoomId,
    },
    /// A guest started to leave the hotel.
    GuestLeaving {
        /// Guest heading for the exit.
        guest: GuestId,
    },
    /// A departing guest left a review.
    ReviewPosted {
        /// Guest that wrote the review.
        guest: GuestId,
        /// Score between one and the configured maximum rating.
        score: u32,
    },
    /// A guest reached the despawn point or was removed administratively.
    GuestDespawned {
        /// Guest that was removed.
        guest: GuestId,
    },
    /// A guest was destroyed because its room sank.
    GuestDrowned {
        /// Guest that was removed.
        guest: GuestId,
        /// Room that sank underneath the guest.
        room: RoomId,
    },
}

/// Unique identifier assigned to a guest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuestId(u32);

impl GuestId {
    /// Creates a new guest identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a constructed room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a room template within the catalog handed to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomTemplateId(u32);

impl RoomTemplateId {
    /// Creates a new template identifier with the provided catalog index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the catalog index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Integer tile coordinate, either hotel-local or relative to a room pivot.
///
/// Ordering is column-major (`x`, then `y`) and is used as the deterministic
/// tie-break wherever tiles compete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileOffset {
    x: i32,
    y: i32,
}

impl TileOffset {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component, growing upwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise sum of two coordinates.
    #[must_use]
    pub const fn plus(self, other: TileOffset) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// The four cardinal neighbours at unit distance.
    #[must_use]
    pub const fn neighbors(self) -> [TileOffset; 4] {
        [
            self.translated(1, 0),
            self.translated(0, 1),
            self.translated(-1, 0),
            self.translated(0, -1),
        ]
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileOffset) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Converts the tile into a continuous hotel-local position.
    #[must_use]
    pub fn to_position(self) -> Position {
        Position::new(self.x as f32, self.y as f32)
    }
}

/// Continuous hotel-local position used for walking guests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component, growing upwards.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position moved down by the provided number of units.
    #[must_use]
    pub fn lowered(self, units: f32) -> Self {
        Self::new(self.x, self.y - units)
    }

    /// Moves towards `target` by at most `max_step`, snapping once reachable.
    #[must_use]
    pub fn step_towards(self, target: Position, max_step: f32) -> Self {
        let distance = self.distance(target);
        if distance <= max_step || distance <= f32::EPSILON {
            return target;
        }
        let scale = max_step / distance;
        Self::new(
            self.x + (target.x - self.x) * scale,
            self.y + (target.y - self.y) * scale,
        )
    }
}

/// Kinds of needs a guest wants fulfilled during a stay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NeedType {
    /// Sleeping and lounging.
    Rest,
    /// Meals and drinks.
    Dining,
    /// Games, shows and other entertainment.
    Leisure,
    /// Spa, pool and gym.
    Wellness,
}

/// Scalar that segments standard and premium guests and rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct LuxuryMultiplier(u32);

impl LuxuryMultiplier {
    /// Tier used by regular guests and rooms.
    pub const STANDARD: Self = Self(1);
    /// Tier used by luxury guests and rooms.
    pub const PREMIUM: Self = Self(2);

    /// Creates a multiplier; zero is raised to one.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 {
            Self(1)
        } else {
            Self(value)
        }
    }

    /// Retrieves the raw multiplier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Multiplier as a float factor for prices and durations.
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.0 as f32
    }
}

impl From<u32> for LuxuryMultiplier {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<LuxuryMultiplier> for u32 {
    fn from(multiplier: LuxuryMultiplier) -> Self {
        multiplier.0
    }
}

impl Default for LuxuryMultiplier {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Footprint of a room as tile offsets relative to its pivot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoomShapeRecord")]
pub struct RoomShape {
    name: String,
    offsets: Vec<TileOffset>,
}

#[derive(Deserialize)]
struct RoomShapeRecord {
    name: String,
    offsets: Vec<TileOffset>,
}

impl From<RoomShapeRecord> for RoomShape {
    fn from(record: RoomShapeRecord) -> Self {
        Self::new(record.name, record.offsets)
    }
}

impl RoomShape {
    /// Creates a shape; repeated offsets keep their first occurrence only.
    #[must_use]
    pub fn new(name: impl Into<String>, offsets: Vec<TileOffset>) -> Self {
        let mut unique: Vec<TileOffset> = Vec::with_capacity(offsets.len());
        for offset in offsets {
            if !unique.contains(&offset) {
                unique.push(offset);
            }
        }
        Self {
            name: name.into(),
            offsets: unique,
        }
    }

    /// Axis-aligned rectangle anchored at the pivot and growing right and up.
    #[must_use]
    pub fn rectangle(name: impl Into<String>, width: u32, height: u32) -> Self {
        let mut offsets = Vec::new();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                offsets.push(TileOffset::new(x, y));
            }
        }
        Self::new(name, offsets)
    }

    /// Human readable name of the shape.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered tile offsets composing the footprint.
    #[must_use]
    pub fn offsets(&self) -> &[TileOffset] {
        &self.offsets
    }

    /// Number of tiles in the footprint.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Reports whether the footprint holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Reports whether the offset is part of the footprint.
    #[must_use]
    pub fn contains(&self, offset: TileOffset) -> bool {
        self.offsets.contains(&offset)
    }
}

/// Read-only catalog entry describing a buildable room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    /// Label shown to players.
    pub label: String,
    /// Footprint of the room.
    pub shape: RoomShape,
    /// Maximum number of simultaneous guests.
    pub capacity: u32,
    /// Base purchase price before the luxury multiplier is applied.
    pub purchase_price: f32,
    /// Factor applied to the hotel's rent rate while guests stay.
    #[serde(default = "default_rate")]
    pub rent_multiplier: f32,
    /// Need types fulfilled while staying in the room.
    pub satisfied_needs: Vec<NeedType>,
    /// Room-local tile guests enter and leave through.
    pub door_offset: TileOffset,
    /// Luxury tier of the room.
    #[serde(default)]
    pub luxury: LuxuryMultiplier,
    /// Seconds of need removed per second of stay.
    #[serde(default = "default_rate")]
    pub fulfilling_rate: f32,
}

fn default_rate() -> f32 {
    1.0
}

impl RoomTemplate {
    /// Price charged when the room is built, scaled by its luxury tier.
    #[must_use]
    pub fn scaled_purchase_price(&self) -> f32 {
        self.purchase_price * self.luxury.factor()
    }

    /// Reports whether staying in the room fulfils the provided need.
    #[must_use]
    pub fn satisfies(&self, need: NeedType) -> bool {
        self.satisfied_needs.contains(&need)
    }
}

/// A single need handed to a guest before luxury scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeedAllotment {
    /// Kind of need.
    pub need: NeedType,
    /// Seconds of fulfilment the guest wants.
    pub duration_secs: f32,
}

impl NeedAllotment {
    /// Creates a new need allotment.
    #[must_use]
    pub const fn new(need: NeedType, duration_secs: f32) -> Self {
        Self {
            need,
            duration_secs,
        }
    }
}

/// Template describing a guest handed to the world by a spawner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestProfile {
    /// Luxury tier of the guest.
    pub luxury: LuxuryMultiplier,
    /// Needs before luxury scaling; later entries of a repeated type are ignored.
    pub needs: Vec<NeedAllotment>,
}

/// Points a guest walks between outside the rooms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestRoute {
    /// Where the guest appears.
    pub spawn: Position,
    /// Where the guest enters the hotel.
    pub entrance: Position,
    /// Where the guest exits the hotel.
    pub exit: Position,
    /// Where the guest vanishes.
    pub despawn: Position,
}

/// Activity a guest is currently engaged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuestActivity {
    /// Walking from the spawn point to the entrance.
    Arriving,
    /// Looking for a room with matching needs.
    Waiting,
    /// Staying in a room.
    Enjoying,
    /// Walking to the exit and the despawn point.
    Leaving,
}

/// Outer bounds of the hotel in world tiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelBounds {
    /// Leftmost world column.
    pub min_x: i32,
    /// Rightmost world column.
    pub max_x: i32,
    /// Water line; rows below it are flooded.
    pub min_y: i32,
    /// Highest world row a floor may reach.
    pub max_y: i32,
    /// Horizontal world units per tile.
    pub scale: f32,
}

impl HotelBounds {
    /// Highest hotel-local column a room tile may occupy.
    #[must_use]
    pub fn max_column(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// Maximum number of floors that may stand at once.
    #[must_use]
    pub fn max_height(&self) -> u32 {
        u32::try_from(self.max_y - self.min_y).unwrap_or(0)
    }

    /// Width of the hotel measured in world units.
    #[must_use]
    pub fn width_in_units(&self) -> f32 {
        (self.max_x - self.min_x) as f32 * self.scale
    }
}

impl Default for HotelBounds {
    fn default() -> Self {
        Self {
            min_x: -8,
            max_x: 8,
            min_y: -4,
            max_y: 12,
            scale: 1.0,
        }
    }
}

/// Economic tuning of the hotel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money available when the world boots.
    pub starting_money: f32,
    /// Rent charged per second of stay before room multipliers.
    pub rent_per_second: f32,
    /// Price of stacking a new floor.
    pub floor_purchase_price: f32,
    /// Label shown on the floor purchase control.
    pub floor_label: String,
    /// Highest score a review can award.
    pub max_rating: u32,
    /// Number of recent reviews averaged into the rating.
    pub review_capacity: usize,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: 2_000.0,
            rent_per_second: 1.0,
            floor_purchase_price: 15.0,
            floor_label: String::from("New Floor"),
            max_rating: 5,
            review_capacity: 10,
        }
    }
}

/// Behavioural tuning shared by every guest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestTuning {
    /// Walking speed in tiles per second.
    pub walk_speed: f32,
    /// Distance under which a waypoint counts as reached.
    pub min_target_distance: f32,
    /// Delay between room searches after a search found nothing.
    pub room_search_cooldown_secs: f32,
    /// Interval between idle wandering rolls.
    pub wander_interval_secs: f32,
    /// Probability of wandering on each roll.
    pub wander_chance: f64,
    /// Total vacation time as a multiple of the summed need durations.
    pub vacation_time_factor: f32,
}

impl Default for GuestTuning {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            min_target_distance: 0.02,
            room_search_cooldown_secs: 0.5,
            wander_interval_secs: 0.5,
            wander_chance: 0.2,
            vacation_time_factor: 2.0,
        }
    }
}

/// Reasons a room placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The template identifier does not index the catalog.
    #[error("room template is not part of the catalog")]
    UnknownTemplate,
    /// The hotel cannot afford the room.
    #[error("not enough money to buy the room")]
    InsufficientFunds,
    /// A footprint tile lies outside the horizontal or lower bounds.
    #[error("room footprint leaves the hotel bounds")]
    OutOfBounds,
    /// A footprint tile lies on or above the first unbuilt floor.
    #[error("room footprint is above the highest built floor")]
    AboveCurrentHeight,
    /// A footprint tile overlaps an existing room.
    #[error("room footprint overlaps an occupied tile")]
    Occupied,
}

/// Reasons a floor purchase request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum FloorError {
    /// Another floor would exceed the hotel's maximum height.
    #[error("the hotel already reaches its maximum height")]
    MaximumHeightReached,
}

/// Immutable representation of a single room's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomSnapshot {
    /// Identifier assigned by the world.
    pub id: RoomId,
    /// Catalog entry the room was built from.
    pub template: RoomTemplateId,
    /// Hotel-local pivot of the room.
    pub origin: TileOffset,
    /// Current capacity; zero once flooded.
    pub capacity: u32,
    /// Number of guests currently checked in.
    pub guest_count: u32,
    /// Luxury tier of the room.
    pub luxury: LuxuryMultiplier,
    /// Whether any tile is below the lower bound.
    pub flooded: bool,
}

/// Immutable representation of a single guest's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct GuestSnapshot {
    /// Handle assigned by the world.
    pub id: GuestId,
    /// Current activity.
    pub activity: GuestActivity,
    /// Hotel-local position.
    pub position: Position,
    /// Room the guest is checked into, if any.
    pub room: Option<RoomId>,
    /// Luxury tier of the guest.
    pub luxury: LuxuryMultiplier,
    /// Remaining vacation budget.
    pub budget: f32,
    /// Remaining vacation time in seconds.
    pub vacation_time_left: f32,
    /// Remaining seconds per outstanding need, ordered by need type.
    pub needs: Vec<(NeedType, f32)>,
}

/// Economy figures exposed to display layers and systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EconomySnapshot {
    /// Money available.
    pub money: f32,
    /// Mean of the recent reviews.
    pub rating: f32,
    /// Highest possible rating.
    pub max_rating: u32,
    /// Number of reviews currently averaged.
    pub review_count: usize,
}

impl EconomySnapshot {
    /// Rating expressed as a fraction of the maximum rating.
    #[must_use]
    pub fn rating_fraction(&self) -> f32 {
        if self.max_rating == 0 {
            return 0.0;
        }
        self.rating / self.max_rating as f32
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FloorError, GuestId, HotelBounds, LuxuryMultiplier, PlacementError, Position, RoomId,
        RoomShape, TileOffset,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = TileOffset::new(-1, 1);
        let destination = TileOffset::new(2, -1);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbors_are_unit_distance() {
        let tile = TileOffset::new(3, 4);
        for neighbor in tile.neighbors() {
            assert_eq!(tile.manhattan_distance(neighbor), 1);
        }
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&GuestId::new(42));
        assert_round_trip(&RoomId::new(7));
        assert_round_trip(&PlacementError::AboveCurrentHeight);
        assert_round_trip(&FloorError::MaximumHeightReached);
    }

    #[test]
    fn shape_drops_repeated_offsets() {
        let shape = RoomShape::new(
            "dup",
            vec![
                TileOffset::new(0, 0),
                TileOffset::new(1, 0),
                TileOffset::new(0, 0),
            ],
        );
        assert_eq!(shape.len(), 2);
        assert_eq!(shape.offsets()[1], TileOffset::new(1, 0));
    }

    #[test]
    fn rectangle_shape_covers_every_tile() {
        let shape = RoomShape::rectangle("square", 2, 2);
        assert_eq!(shape.len(), 4);
        assert!(shape.contains(TileOffset::new(1, 1)));
        assert!(!shape.contains(TileOffset::new(2, 0)));
    }

    #[test]
    fn zero_luxury_is_raised_to_standard() {
        assert_eq!(LuxuryMultiplier::new(0), LuxuryMultiplier::STANDARD);
        assert!((LuxuryMultiplier::PREMIUM.factor() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn deserialized_zero_luxury_is_raised_to_standard() {
        let bytes = bincode::serialize(&0_u32).expect("serialize");
        let restored: LuxuryMultiplier = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, LuxuryMultiplier::STANDARD);
        assert_round_trip(&LuxuryMultiplier::PREMIUM);
    }

    #[test]
    fn bounds_derive_height_and_columns() {
        let bounds = HotelBounds::default();
        assert_eq!(bounds.max_height(), 16);
        assert_eq!(bounds.max_column(), 16);
        assert!((bounds.width_in_units() - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn step_towards_snaps_when_close() {
        let start = Position::new(0.0, 0.0);
        let target = Position::new(1.0, 0.0);
        let halfway = start.step_towards(target, 0.5);
        assert!((halfway.x - 0.5).abs() < 1e-6);
        assert_eq!(halfway.step_towards(target, 0.75), target);
    }
}
