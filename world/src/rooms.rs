//! Constructed rooms: occupancy, flooding and the sink notification registry.

use std::rc::Rc;

use sinking_hotel_core::{
    GuestId, LuxuryMultiplier, NeedType, Position, RoomId, RoomSnapshot, RoomTemplate,
    RoomTemplateId, TileOffset,
};

/// Outcome of lowering a room by one row, handed to every occupant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SinkNotice {
    pub(crate) flooded: bool,
    pub(crate) sunk: bool,
}

impl SinkNotice {
    pub(crate) fn flooded_or_sunk(&self) -> bool {
        self.flooded || self.sunk
    }
}

/// Room built from a catalog template and anchored at a hotel-local pivot.
#[derive(Debug)]
pub(crate) struct HotelRoom {
    id: RoomId,
    template_id: RoomTemplateId,
    template: Rc<RoomTemplate>,
    origin: TileOffset,
    capacity: u32,
    guest_count: u32,
    flooded: bool,
    sunk: bool,
    subscribers: Vec<GuestId>,
}

impl HotelRoom {
    pub(crate) fn new(
        id: RoomId,
        template_id: RoomTemplateId,
        template: Rc<RoomTemplate>,
        origin: TileOffset,
    ) -> Self {
        Self {
            id,
            template_id,
            capacity: template.capacity,
            template,
            origin,
            guest_count: 0,
            flooded: false,
            sunk: false,
            subscribers: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> RoomId {
        self.id
    }

    pub(crate) fn template(&self) -> &RoomTemplate {
        &self.template
    }

    pub(crate) fn origin(&self) -> TileOffset {
        self.origin
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> u32 {
        self.capacity
    }

    pub(crate) fn guest_count(&self) -> u32 {
        self.guest_count
    }

    pub(crate) fn is_flooded(&self) -> bool {
        self.flooded
    }

    pub(crate) fn is_sunk(&self) -> bool {
        self.sunk
    }

    pub(crate) fn at_capacity(&self) -> bool {
        self.guest_count >= self.capacity
    }

    pub(crate) fn luxury(&self) -> LuxuryMultiplier {
        self.template.luxury
    }

    pub(crate) fn satisfies(&self, need: NeedType) -> bool {
        self.template.satisfies(need)
    }

    pub(crate) fn offsets(&self) -> &[TileOffset] {
        self.template.shape.offsets()
    }

    pub(crate) fn door_offset(&self) -> TileOffset {
        self.template.door_offset
    }

    /// Hotel-local position of a room-local tile.
    pub(crate) fn tile_position(&self, tile: TileOffset) -> Position {
        self.origin.plus(tile).to_position()
    }

    /// Registers a guest as occupant and sink subscriber.
    pub(crate) fn check_in(&mut self, guest: GuestId) {
        self.guest_count = self.guest_count.saturating_add(1);
        if !self.subscribers.contains(&guest) {
            self.subscribers.push(guest);
        }
    }

    /// Removes a guest from the occupants and the sink subscribers.
    pub(crate) fn check_out(&mut self, guest: GuestId) {
        self.guest_count = self.guest_count.saturating_sub(1);
        self.subscribers.retain(|subscriber| *subscriber != guest);
    }

    #[cfg(test)]
    pub(crate) fn subscribers(&self) -> &[GuestId] {
        &self.subscribers
    }

    /// Lowers the room by one row and notifies every subscriber of the outcome.
    ///
    /// Flooding forces the capacity to zero but keeps the current occupants.
    /// Both flags are monotonic.
    pub(crate) fn sink(&mut self, mut notify: impl FnMut(GuestId, SinkNotice)) -> SinkNotice {
        self.origin = self.origin.translated(0, -1);

        let flooded_tiles = self
            .offsets()
            .iter()
            .filter(|offset| self.origin.y() + offset.y() < 0)
            .count();

        if flooded_tiles > 0 {
            self.flooded = true;
            self.capacity = 0;
        }
        if flooded_tiles == self.offsets().len() {
            self.sunk = true;
        }

        let notice = SinkNotice {
            flooded: self.flooded,
            sunk: self.sunk,
        };
        for &guest in &self.subscribers {
            notify(guest, notice);
        }
        notice
    }

    pub(crate) fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id,
            template: self.template_id,
            origin: self.origin,
            capacity: self.capacity,
            guest_count: self.guest_count,
            luxury: self.luxury(),
            flooded: self.flooded,
        }
    }
}
