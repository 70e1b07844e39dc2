use std::time::Duration;

use sinking_hotel_core::{
    Command, Event, GuestActivity, GuestId, GuestProfile, GuestRoute, GuestTuning,
    LuxuryMultiplier, NeedAllotment, NeedType, Position, RoomId, RoomShape, RoomTemplate,
    RoomTemplateId, TileOffset,
};
use sinking_hotel_world::{apply, query, World, WorldConfig};

const STANDARD_ROOM: RoomTemplateId = RoomTemplateId::new(0);
const PREMIUM_ROOM: RoomTemplateId = RoomTemplateId::new(1);
const MAX_RATING: u32 = 5;

fn single_room(luxury: LuxuryMultiplier) -> RoomTemplate {
    RoomTemplate {
        label: String::from("Suite"),
        shape: RoomShape::rectangle("single", 1, 1),
        capacity: 1,
        purchase_price: 40.0,
        rent_multiplier: 1.0,
        satisfied_needs: vec![NeedType::Rest, NeedType::Dining],
        door_offset: TileOffset::new(0, 0),
        luxury,
        fulfilling_rate: 1.0,
    }
}

fn world() -> World {
    World::new(WorldConfig {
        catalog: vec![
            single_room(LuxuryMultiplier::STANDARD),
            single_room(LuxuryMultiplier::PREMIUM),
        ],
        guests: GuestTuning {
            wander_chance: 0.0,
            ..GuestTuning::default()
        },
        ..WorldConfig::default()
    })
}

fn spawn(luxury: LuxuryMultiplier, needs: &[(NeedType, f32)]) -> Command {
    Command::SpawnGuest {
        profile: GuestProfile {
            luxury,
            needs: needs
                .iter()
                .map(|&(need, secs)| NeedAllotment::new(need, secs))
                .collect(),
        },
        route: GuestRoute {
            spawn: Position::new(0.0, 0.0),
            entrance: Position::new(0.0, 0.0),
            exit: Position::new(0.0, 0.0),
            despawn: Position::new(-2.0, 0.0),
        },
    }
}

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(500),
        },
        &mut events,
    );
    events
}

fn submit(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn build(world: &mut World, template: RoomTemplateId, x: i32) {
    let events = submit(
        world,
        Command::BuildRoom {
            template,
            origin: TileOffset::new(x, 0),
        },
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::RoomBuilt { .. })),
        "room was not built: {events:?}"
    );
}

fn guest(world: &World, id: u32) -> sinking_hotel_core::GuestSnapshot {
    query::guest(world, GuestId::new(id)).expect("guest present")
}

#[test]
fn budget_depletes_exactly_as_needs_are_fulfilled() {
    let mut world = world();
    build(&mut world, STANDARD_ROOM, 0);
    let _ = submit(
        &mut world,
        spawn(
            LuxuryMultiplier::STANDARD,
            &[(NeedType::Rest, 10.0), (NeedType::Dining, 10.0)],
        ),
    );
    assert!((guest(&world, 0).budget - 20.0).abs() < f32::EPSILON);

    let _ = tick(&mut world);
    assert_eq!(guest(&world, 0).activity, GuestActivity::Waiting);
    let events = tick(&mut world);
    assert!(events.contains(&Event::GuestEnteredRoom {
        guest: GuestId::new(0),
        room: RoomId::new(0),
    }));
    let money_before = query::economy(&world).money;

    for _ in 0..19 {
        let _ = tick(&mut world);
    }
    let staying = guest(&world, 0);
    assert_eq!(staying.activity, GuestActivity::Enjoying);
    assert!((staying.budget - 1.0).abs() < 1e-5);
    assert_eq!(
        staying.needs,
        vec![(NeedType::Rest, 0.5), (NeedType::Dining, 0.5)]
    );

    let _ = tick(&mut world);
    let drained = guest(&world, 0);
    assert_eq!(drained.budget, 0.0);
    assert!(drained.needs.is_empty());
    assert!((query::economy(&world).money - money_before - 20.0).abs() < 1e-3);

    let events = tick(&mut world);
    assert!(events.contains(&Event::ReviewPosted {
        guest: GuestId::new(0),
        score: MAX_RATING,
    }));
    assert_eq!(guest(&world, 0).activity, GuestActivity::Leaving);
    assert_eq!(query::reviews(&world), vec![MAX_RATING]);
    assert!((query::economy(&world).rating - MAX_RATING as f32).abs() < f32::EPSILON);
    let room = query::room(&world, RoomId::new(0)).expect("room stands");
    assert_eq!(room.guest_count, 0);
}

#[test]
fn leaving_guests_walk_to_the_despawn_point() {
    let mut world = world();
    build(&mut world, STANDARD_ROOM, 0);
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Rest, 10.0)]),
    );
    let _ = tick(&mut world);
    let _ = tick(&mut world);

    let events = submit(
        &mut world,
        Command::ForceGuestLeave {
            guest: GuestId::new(0),
        },
    );
    assert!(events.contains(&Event::GuestLeaving {
        guest: GuestId::new(0)
    }));
    assert!(events.contains(&Event::ReviewPosted {
        guest: GuestId::new(0),
        score: MAX_RATING,
    }));
    assert!(guest(&world, 0).needs.is_empty());

    let repeated = submit(
        &mut world,
        Command::ForceGuestLeave {
            guest: GuestId::new(0),
        },
    );
    assert!(repeated.is_empty());

    let mut despawned = false;
    for _ in 0..10 {
        if tick(&mut world).contains(&Event::GuestDespawned {
            guest: GuestId::new(0),
        }) {
            despawned = true;
            break;
        }
    }
    assert!(despawned);
    assert!(query::guest_view(&world).is_empty());
    assert_eq!(query::reviews(&world).len(), 1);
}

#[test]
fn guests_prefer_rooms_of_their_luxury_tier() {
    let mut world = world();
    build(&mut world, STANDARD_ROOM, 0);
    build(&mut world, PREMIUM_ROOM, 1);
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::PREMIUM, &[(NeedType::Rest, 5.0)]),
    );

    let _ = tick(&mut world);
    let _ = tick(&mut world);

    assert_eq!(guest(&world, 0).room, Some(RoomId::new(1)));
}

#[test]
fn guests_fall_back_to_other_tiers_and_pay_luxury_rent() {
    let mut world = world();
    build(&mut world, PREMIUM_ROOM, 0);
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Rest, 10.0)]),
    );
    let _ = tick(&mut world);
    let _ = tick(&mut world);
    assert_eq!(guest(&world, 0).room, Some(RoomId::new(0)));

    let _ = tick(&mut world);
    assert!((guest(&world, 0).budget - 9.0).abs() < 1e-5);
}

#[test]
fn full_rooms_leave_guests_waiting() {
    let mut world = world();
    build(&mut world, STANDARD_ROOM, 0);
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Rest, 10.0)]),
    );
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Rest, 10.0)]),
    );

    let _ = tick(&mut world);
    let _ = tick(&mut world);

    assert_eq!(guest(&world, 0).activity, GuestActivity::Enjoying);
    assert_eq!(guest(&world, 1).activity, GuestActivity::Waiting);
    let room = query::room(&world, RoomId::new(0)).expect("room stands");
    assert_eq!(room.guest_count, 1);
}

#[test]
fn guests_without_matching_rooms_eventually_leave_with_a_bad_review() {
    let mut world = world();
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Wellness, 2.0)]),
    );

    let mut review = None;
    for _ in 0..20 {
        for event in tick(&mut world) {
            if let Event::ReviewPosted { score, .. } = event {
                review = Some(score);
            }
        }
    }

    let score = review.expect("guest left");
    assert!((1..=MAX_RATING).contains(&score));
    assert!(score < MAX_RATING);
}

#[test]
fn despawning_every_guest_frees_rooms_without_reviews() {
    let mut world = world();
    build(&mut world, STANDARD_ROOM, 0);
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Rest, 10.0)]),
    );
    let _ = tick(&mut world);
    let _ = tick(&mut world);

    let events = submit(&mut world, Command::DespawnAllGuests);

    assert_eq!(
        events,
        vec![Event::GuestDespawned {
            guest: GuestId::new(0)
        }]
    );
    assert!(query::guest_view(&world).is_empty());
    assert!(query::reviews(&world).is_empty());
    let room = query::room(&world, RoomId::new(0)).expect("room stands");
    assert_eq!(room.guest_count, 0);
}

#[test]
fn review_history_is_bounded_and_averaged() {
    let mut world = world();
    for _ in 0..12 {
        let _ = submit(
            &mut world,
            spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Rest, 10.0)]),
        );
    }

    let events = submit(&mut world, Command::ForceAllGuestsLeave);

    let posted = events
        .iter()
        .filter(|event| matches!(event, Event::ReviewPosted { .. }))
        .count();
    assert_eq!(posted, 12);
    let reviews = query::reviews(&world);
    assert_eq!(reviews.len(), 10);
    let mean = reviews.iter().sum::<u32>() as f32 / reviews.len() as f32;
    let economy = query::economy(&world);
    assert!((economy.rating - mean).abs() < 1e-5);
    assert!(economy.rating <= economy.max_rating as f32);
    assert_eq!(economy.review_count, 10);
}

#[test]
fn guest_wanders_inside_a_room_and_walks_back_to_the_door() {
    let hall = RoomTemplate {
        label: String::from("Hall"),
        shape: RoomShape::rectangle("hall", 4, 1),
        capacity: 1,
        purchase_price: 40.0,
        rent_multiplier: 1.0,
        satisfied_needs: vec![NeedType::Rest],
        door_offset: TileOffset::new(0, 0),
        luxury: LuxuryMultiplier::STANDARD,
        fulfilling_rate: 1.0,
    };
    let tuning = GuestTuning {
        wander_chance: 1.0,
        ..GuestTuning::default()
    };
    let tolerance = tuning.min_target_distance + 1e-4;
    let mut world = World::new(WorldConfig {
        catalog: vec![hall],
        guests: tuning,
        ..WorldConfig::default()
    });
    build(&mut world, STANDARD_ROOM, 0);
    let _ = submit(
        &mut world,
        spawn(LuxuryMultiplier::STANDARD, &[(NeedType::Rest, 5.0)]),
    );
    let door = Position::new(0.0, 0.0);

    let mut furthest = 0.0_f32;
    let mut left_from = None;
    let mut despawned = false;
    let mut reviews = Vec::new();
    for _ in 0..400 {
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );
        for event in &events {
            if let Event::ReviewPosted { score, .. } = event {
                reviews.push(*score);
            }
        }
        if events.contains(&Event::GuestDespawned {
            guest: GuestId::new(0),
        }) {
            despawned = true;
            break;
        }

        let snapshot = guest(&world, 0);
        match snapshot.activity {
            GuestActivity::Enjoying => furthest = furthest.max(snapshot.position.x),
            GuestActivity::Leaving if left_from.is_none() => {
                left_from = Some(snapshot.position);
            }
            _ => {}
        }
    }

    assert!(
        furthest >= 1.0 - tolerance,
        "guest never left the door tile while staying"
    );
    let left_from = left_from.expect("guest started leaving");
    assert!(
        left_from.distance(door) <= tolerance,
        "guest started leaving away from the door: {left_from:?}"
    );
    assert!(despawned, "guest never reached the despawn point");
    assert_eq!(reviews, vec![MAX_RATING]);
}
