//! Guest state machine: arrival, room selection, stays, reviews and departure.

use std::collections::{BTreeMap, VecDeque};

use rand::{seq::SliceRandom, Rng};
use rand_chacha::ChaCha8Rng;
use sinking_hotel_core::{
    Event, GuestActivity, GuestId, GuestProfile, GuestRoute, GuestSnapshot, GuestTuning,
    LuxuryMultiplier, NeedType, Position, RoomId, TileOffset,
};
use tracing::{debug, trace};

use crate::{
    economy::HotelEconomy,
    navigation::{shortest_path, ShapeGraphCache},
    rooms::{HotelRoom, SinkNotice},
};

const MAX_NEEDS: usize = 2;
const WAITING_PENALTY_SHARE: f32 = 0.1;
const WRONG_LUXURY_PENALTY_SHARE: f32 = 0.2;
const UNMET_NEED_SHARE: f32 = 0.7;
const HALF_MET_NEED_SHARE: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
struct NeedState {
    remaining: f32,
    allotted: f32,
}

/// Mutable world state a guest reads and writes while it advances.
pub(crate) struct GuestContext<'a> {
    pub(crate) rooms: &'a mut [HotelRoom],
    pub(crate) economy: &'a mut HotelEconomy,
    pub(crate) graphs: &'a mut ShapeGraphCache,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) tuning: &'a GuestTuning,
    pub(crate) out: &'a mut Vec<Event>,
}

/// What the owner must do with the guest after it advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GuestStep {
    Stay,
    Despawn,
}

#[derive(Debug)]
pub(crate) struct Guest {
    id: GuestId,
    activity: GuestActivity,
    luxury: LuxuryMultiplier,
    route: GuestRoute,
    position: Position,
    waypoints: VecDeque<Position>,
    room: Option<RoomId>,
    tile: TileOffset,
    path: VecDeque<TileOffset>,
    needs: BTreeMap<NeedType, NeedState>,
    budget: f32,
    vacation_time_total: f32,
    vacation_time_left: f32,
    waiting_time: f32,
    wrong_luxury_time: f32,
    search_cooldown: f32,
    wander_cooldown: f32,
}

impl Guest {
    /// Creates a guest at the spawn point, walking towards the entrance.
    ///
    /// Need durations are scaled by the guest's luxury tier; the budget and
    /// vacation time derive from the scaled total.
    pub(crate) fn spawn(
        id: GuestId,
        profile: &GuestProfile,
        route: GuestRoute,
        rent_per_second: f32,
        tuning: &GuestTuning,
    ) -> Self {
        let luxury = profile.luxury;
        let mut needs = BTreeMap::new();
        for allotment in &profile.needs {
            if needs.len() == MAX_NEEDS {
                break;
            }
            if needs.contains_key(&allotment.need) {
                continue;
            }
            let scaled = allotment.duration_secs.max(0.0) * luxury.factor();
            if scaled > 0.0 {
                let _ = needs.insert(
                    allotment.need,
                    NeedState {
                        remaining: scaled,
                        allotted: scaled,
                    },
                );
            }
        }

        let total: f32 = needs.values().map(|state| state.allotted).sum();
        let vacation_time = total * tuning.vacation_time_factor;

        Self {
            id,
            activity: GuestActivity::Arriving,
            luxury,
            route,
            position: route.spawn,
            waypoints: VecDeque::from([route.entrance]),
            room: None,
            tile: TileOffset::new(0, 0),
            path: VecDeque::new(),
            needs,
            budget: total * rent_per_second * luxury.factor(),
            vacation_time_total: vacation_time,
            vacation_time_left: vacation_time,
            waiting_time: 0.0,
            wrong_luxury_time: 0.0,
            search_cooldown: 0.0,
            wander_cooldown: tuning.wander_interval_secs,
        }
    }

    pub(crate) fn id(&self) -> GuestId {
        self.id
    }

    /// Runs one tick of the state machine.
    pub(crate) fn advance(&mut self, dt: f32, ctx: &mut GuestContext<'_>) -> GuestStep {
        if self.activity != GuestActivity::Arriving {
            self.vacation_time_left = (self.vacation_time_left - dt).max(0.0);
        }

        match self.activity {
            GuestActivity::Arriving => {
                if self.walk(dt, ctx.tuning) {
                    self.activity = GuestActivity::Waiting;
                }
            }
            GuestActivity::Waiting => self.wait(dt, ctx),
            GuestActivity::Enjoying => self.enjoy(dt, ctx),
            GuestActivity::Leaving => {
                if self.walk(dt, ctx.tuning) {
                    return GuestStep::Despawn;
                }
            }
        }
        GuestStep::Stay
    }

    /// Abandons the stay: outstanding needs are dropped before the review.
    pub(crate) fn force_leave(&mut self, ctx: &mut GuestContext<'_>) {
        if self.activity == GuestActivity::Leaving {
            return;
        }
        self.needs.clear();
        self.begin_leaving(ctx);
    }

    /// Leaves the current room without a review, used when the guest is removed.
    pub(crate) fn detach(&mut self, rooms: &mut [HotelRoom]) {
        if let Some(room_id) = self.room.take() {
            if let Some(room) = rooms.iter_mut().find(|room| room.id() == room_id) {
                room.check_out(self.id);
            }
        }
        self.path.clear();
    }

    /// Reacts to the current room sinking by one row.
    ///
    /// Returns `true` when the room went under and the guest must be destroyed.
    pub(crate) fn on_sink(&mut self, notice: SinkNotice) -> bool {
        if notice.sunk {
            return true;
        }
        self.position = self.position.lowered(1.0);
        for waypoint in &mut self.waypoints {
            *waypoint = waypoint.lowered(1.0);
        }
        false
    }

    pub(crate) fn snapshot(&self) -> GuestSnapshot {
        GuestSnapshot {
            id: self.id,
            activity: self.activity,
            position: self.position,
            room: self.room,
            luxury: self.luxury,
            budget: self.budget,
            vacation_time_left: self.vacation_time_left,
            needs: self
                .needs
                .iter()
                .map(|(need, state)| (*need, state.remaining))
                .collect(),
        }
    }

    /// Moves towards the next waypoint; returns `true` once none remain.
    fn walk(&mut self, dt: f32, tuning: &GuestTuning) -> bool {
        if let Some(&target) = self.waypoints.front() {
            if self.position.distance(target) > tuning.min_target_distance {
                self.position = self.position.step_towards(target, tuning.walk_speed * dt);
            }
            if self.position.distance(target) <= tuning.min_target_distance {
                let _ = self.waypoints.pop_front();
            }
        }
        self.waypoints.is_empty()
    }

    fn wait(&mut self, dt: f32, ctx: &mut GuestContext<'_>) {
        self.waiting_time += dt;

        if self.needs.is_empty() || self.budget <= 0.0 || self.vacation_time_left <= 0.0 {
            self.begin_leaving(ctx);
            return;
        }

        self.search_cooldown = (self.search_cooldown - dt).max(0.0);
        if self.search_cooldown > 0.0 {
            return;
        }

        match self.select_room(ctx.rooms, ctx.rng) {
            Some(index) => self.change_room(index, ctx),
            None => {
                trace!(guest = self.id.get(), "no room available");
                self.search_cooldown = ctx.tuning.room_search_cooldown_secs;
            }
        }
    }

    /// Picks a room serving an outstanding need, preferring the guest's luxury tier.
    fn select_room(&self, rooms: &[HotelRoom], rng: &mut ChaCha8Rng) -> Option<usize> {
        let candidates: Vec<usize> = rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| {
                !room.is_flooded()
                    && !room.is_sunk()
                    && Some(room.id()) != self.room
                    && !room.at_capacity()
                    && self.needs.keys().any(|need| room.satisfies(*need))
            })
            .map(|(index, _)| index)
            .collect();

        let preferred: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&index| rooms[index].luxury() == self.luxury)
            .collect();

        let pool = if preferred.is_empty() {
            &candidates
        } else {
            &preferred
        };
        pool.choose(rng).copied()
    }

    fn change_room(&mut self, index: usize, ctx: &mut GuestContext<'_>) {
        if let Some(previous) = self.room {
            if let Some(room) = ctx.rooms.iter_mut().find(|room| room.id() == previous) {
                room.check_out(self.id);
            }
        }

        let room = &mut ctx.rooms[index];
        room.check_in(self.id);
        self.room = Some(room.id());
        self.tile = room.door_offset();
        self.position = room.tile_position(self.tile);
        self.path.clear();
        self.waypoints.clear();
        self.activity = GuestActivity::Enjoying;
        self.wander_cooldown = ctx.tuning.wander_interval_secs;

        debug!(guest = self.id.get(), room = room.id().get(), "guest entered room");
        ctx.out.push(Event::GuestEnteredRoom {
            guest: self.id,
            room: room.id(),
        });
    }

    fn enjoy(&mut self, dt: f32, ctx: &mut GuestContext<'_>) {
        let Some(index) = self
            .room
            .and_then(|id| ctx.rooms.iter().position(|room| room.id() == id))
        else {
            self.room = None;
            self.path.clear();
            self.activity = GuestActivity::Waiting;
            return;
        };
        let room = &ctx.rooms[index];

        let served = self
            .needs
            .keys()
            .filter(|need| room.satisfies(**need))
            .count();

        if served == 0 || self.budget <= 0.0 || self.vacation_time_left <= 0.0 {
            let door = room.door_offset();
            if self.tile != door || !self.path.is_empty() {
                if self.path.is_empty() {
                    let graph = ctx.graphs.graph_for(room.offsets());
                    self.path = shortest_path(&graph, self.tile, door)
                        .into_iter()
                        .skip(1)
                        .collect();
                }
                self.follow_path(dt, room, ctx.tuning);
                return;
            }

            if !self.needs.is_empty() && self.budget > 0.0 && self.vacation_time_left > 0.0 {
                self.activity = GuestActivity::Waiting;
                self.search_cooldown = 0.0;
            } else {
                self.begin_leaving(ctx);
            }
            return;
        }

        let template = room.template();
        let rent = (ctx.economy.rent_per_second()
            * template.rent_multiplier
            * room.luxury().factor()
            * served as f32
            * dt)
            .clamp(0.0, self.budget);
        self.budget -= rent;
        ctx.economy.deposit(rent, ctx.out);

        let drain = dt * template.fulfilling_rate;
        self.needs.retain(|need, state| {
            if room.satisfies(*need) {
                state.remaining -= drain;
            }
            state.remaining > 0.0
        });

        if room.luxury() != self.luxury {
            self.wrong_luxury_time += dt;
        }

        if self.path.is_empty() {
            self.wander_cooldown -= dt;
            if self.wander_cooldown <= 0.0 {
                self.wander_cooldown = ctx.tuning.wander_interval_secs;
                let chance = ctx.tuning.wander_chance;
                if chance > 0.0 && ctx.rng.gen_bool(chance.min(1.0)) {
                    let graph = ctx.graphs.graph_for(room.offsets());
                    if let Some(&next) = graph.neighbors(self.tile).choose(ctx.rng) {
                        self.path.push_back(next);
                    }
                }
            }
        }
        self.follow_path(dt, room, ctx.tuning);
    }

    fn follow_path(&mut self, dt: f32, room: &HotelRoom, tuning: &GuestTuning) {
        let Some(&next) = self.path.front() else {
            return;
        };
        let target = room.tile_position(next);
        self.position = self.position.step_towards(target, tuning.walk_speed * dt);
        if self.position.distance(target) <= tuning.min_target_distance {
            self.tile = next;
            let _ = self.path.pop_front();
        }
    }

    fn begin_leaving(&mut self, ctx: &mut GuestContext<'_>) {
        if self.activity == GuestActivity::Leaving {
            return;
        }

        let score = self.review_score(ctx.economy.max_rating());
        let score = ctx.economy.post_review(score, ctx.out);
        debug!(guest = self.id.get(), score, "guest leaving");
        ctx.out.push(Event::GuestLeaving { guest: self.id });
        ctx.out.push(Event::ReviewPosted {
            guest: self.id,
            score,
        });

        self.detach(ctx.rooms);
        self.activity = GuestActivity::Leaving;
        self.waypoints = VecDeque::from([self.route.exit, self.route.despawn]);
    }

    /// Scores the stay from the maximum rating down, never below one.
    fn review_score(&self, max_rating: u32) -> u32 {
        let mut penalty = 0_u32;
        if self.waiting_time > WAITING_PENALTY_SHARE * self.vacation_time_total {
            penalty += 1;
        }
        for state in self.needs.values() {
            if state.remaining > UNMET_NEED_SHARE * state.allotted {
                penalty += 1;
            }
            if state.remaining > HALF_MET_NEED_SHARE * state.allotted {
                penalty += 1;
            }
        }
        if self.wrong_luxury_time > WRONG_LUXURY_PENALTY_SHARE * self.vacation_time_total {
            penalty += 1;
        }
        max_rating.saturating_sub(penalty).clamp(1, max_rating.max(1))
    }
}
