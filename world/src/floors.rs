//! Floor lifecycle bookkeeping and the occupied-coordinate grid.

use std::collections::BTreeSet;

use sinking_hotel_core::{FloorError, HotelBounds, PlacementError, TileOffset};

/// Set of hotel-local tiles filled by rooms.
#[derive(Debug, Default)]
pub(crate) struct OccupiedCoordinates {
    tiles: BTreeSet<TileOffset>,
}

impl OccupiedCoordinates {
    pub(crate) fn contains(&self, tile: TileOffset) -> bool {
        self.tiles.contains(&tile)
    }

    pub(crate) fn insert(&mut self, tile: TileOffset) {
        let _ = self.tiles.insert(tile);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = TileOffset> + '_ {
        self.tiles.iter().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Moves every tile one row down; tiles on the bottom row are dropped.
    fn shift_down(&mut self) {
        self.tiles = self
            .tiles
            .iter()
            .filter(|tile| tile.y() > 0)
            .map(|tile| tile.translated(0, -1))
            .collect();
    }
}

/// Standing floors, structural backing units and tile occupancy of the hotel.
#[derive(Debug, Default)]
pub(crate) struct FloorPlan {
    current_height: u32,
    total_spawned_floors: u32,
    backing_units: Vec<i32>,
    occupied: OccupiedCoordinates,
}

impl FloorPlan {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current_height(&self) -> u32 {
        self.current_height
    }

    pub(crate) fn total_spawned_floors(&self) -> u32 {
        self.total_spawned_floors
    }

    pub(crate) fn backing_units(&self) -> &[i32] {
        &self.backing_units
    }

    pub(crate) fn occupied(&self) -> &OccupiedCoordinates {
        &self.occupied
    }

    /// Raises the hotel by one floor unless it already stands at `max_height`.
    ///
    /// Returns the hotel-local row of the new top floor.
    pub(crate) fn add_floor(&mut self, max_height: u32) -> Result<i32, FloorError> {
        if self.current_height.saturating_add(1) > max_height {
            return Err(FloorError::MaximumHeightReached);
        }
        let row = self.current_height as i32;
        self.current_height += 1;
        self.total_spawned_floors = self.total_spawned_floors.saturating_add(1);
        Ok(row)
    }

    pub(crate) fn add_backing_unit(&mut self, row: i32) {
        self.backing_units.push(row);
    }

    /// Lowers the structure by one row.
    pub(crate) fn sink(&mut self) {
        for index in (0..self.backing_units.len()).rev() {
            self.backing_units[index] -= 1;
            if self.backing_units[index] < 0 {
                let _ = self.backing_units.remove(index);
            }
        }
        self.occupied.shift_down();
        self.current_height = self.current_height.saturating_sub(1);
    }

    /// Resolves the hotel-local tiles of a footprint, rejecting any invalid tile.
    pub(crate) fn validate_footprint(
        &self,
        bounds: &HotelBounds,
        origin: TileOffset,
        offsets: &[TileOffset],
    ) -> Result<Vec<TileOffset>, PlacementError> {
        let max_column = bounds.max_column();
        let height = i32::try_from(self.current_height).unwrap_or(i32::MAX);

        let mut tiles = Vec::with_capacity(offsets.len());
        for &offset in offsets {
            let tile = origin.plus(offset);
            if tile.x() < 0 || tile.y() < 0 || tile.x() > max_column {
                return Err(PlacementError::OutOfBounds);
            }
            if tile.y() >= height {
                return Err(PlacementError::AboveCurrentHeight);
            }
            if self.occupied.contains(tile) {
                return Err(PlacementError::Occupied);
            }
            tiles.push(tile);
        }
        Ok(tiles)
    }

    pub(crate) fn occupy(&mut self, tiles: &[TileOffset]) {
        for &tile in tiles {
            self.occupied.insert(tile);
        }
    }
}
