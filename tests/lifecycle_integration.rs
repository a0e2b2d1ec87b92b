//! Integration tests for the relay lifecycle and the scheduled pipeline.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test lifecycle_integration
//! ```

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;

use collision_relay::collide::{CollideListenersExt, install_collision_relay};
use collision_relay::components::body::{AttachedBody, Body, BodyOwner};
use collision_relay::components::boxcollider::BoxCollider;
use collision_relay::components::mapposition::MapPosition;
use collision_relay::components::velocity::Velocity;
use collision_relay::events::collision::{CollisionKind, CollisionPair};
use collision_relay::events::lifecycle::{SceneDestroyed, SceneShutdown, SceneStarted};
use collision_relay::resources::listeners::{CollideCallback, CollisionListeners, Partners};
use collision_relay::resources::physicsworld::PhysicsWorld;
use collision_relay::resources::relay::{CollisionRelay, RelayState};
use collision_relay::systems::contacts::{ContactCache, contact_step, move_bodies};
use collision_relay::systems::dispatch::{dispatch_collisions, relay_is_active};

#[derive(Resource, Debug, Default)]
struct Hits(Vec<(u32, CollisionKind)>);

#[derive(Resource, Debug, Default)]
struct Step(u32);

fn recorder(kind: CollisionKind) -> CollideCallback {
    CollideCallback::new(move |world, _, _| {
        let step = world.resource::<Step>().0;
        world.resource_mut::<Hits>().0.push((step, kind));
    })
}

fn make_world(with_physics: bool) -> (World, Entity) {
    let mut world = World::new();
    if with_physics {
        world.insert_resource(PhysicsWorld::new());
    }
    world.insert_resource(ContactCache::default());
    world.insert_resource(Hits::default());
    world.insert_resource(Step::default());
    let scene = world.spawn_empty().id();
    install_collision_relay(&mut world, Some(scene));
    (world, scene)
}

fn make_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            move_bodies,
            contact_step,
            dispatch_collisions.run_if(relay_is_active),
        )
            .chain(),
    );
    schedule
}

fn run_steps(world: &mut World, schedule: &mut Schedule, steps: u32) {
    for _ in 0..steps {
        world.resource_mut::<Step>().0 += 1;
        schedule.run(world);
    }
}

fn spawn_box(world: &mut World, x: f32, vx: f32) -> (Entity, Entity) {
    let game_object = world.spawn_empty().id();
    let body = world
        .spawn((
            Body::default(),
            BodyOwner(game_object),
            MapPosition::new(x, 0.0),
            BoxCollider::new(10.0, 10.0),
            Velocity::new(vx, 0.0),
        ))
        .id();
    world.entity_mut(game_object).insert(AttachedBody(body));
    (game_object, body)
}

fn state(world: &World) -> RelayState {
    world.resource::<CollisionRelay>().state()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn install_starts_uninitialized_and_empty() {
    let (world, scene) = make_world(true);
    assert_eq!(state(&world), RelayState::Uninitialized);
    assert_eq!(world.resource::<CollisionRelay>().scene(), Some(scene));
    assert!(world.resource::<CollisionListeners>().is_empty());
    for kind in CollisionKind::ALL {
        assert!(!world.resource::<PhysicsWorld>().is_subscribed(kind));
    }
}

#[test]
fn installing_twice_keeps_the_running_relay() {
    let (mut world, scene) = make_world(true);
    world.trigger(SceneStarted {});
    let observers = world.query::<&Observer>().iter(&world).count();

    let other_scene = world.spawn_empty().id();
    install_collision_relay(&mut world, Some(other_scene));

    assert_eq!(state(&world), RelayState::Active);
    assert_eq!(world.resource::<CollisionRelay>().scene(), Some(scene));
    assert_eq!(world.query::<&Observer>().iter(&world).count(), observers);
}

#[test]
fn start_subscribes_to_every_kind() {
    let (mut world, _) = make_world(true);
    world.trigger(SceneStarted {});

    assert_eq!(state(&world), RelayState::Active);
    for kind in CollisionKind::ALL {
        assert!(world.resource::<PhysicsWorld>().is_subscribed(kind));
    }
}

#[test]
fn start_without_physics_stays_inert() {
    let (mut world, _) = make_world(false);
    world.trigger(SceneStarted {});
    assert_eq!(state(&world), RelayState::Uninitialized);

    // A later start with a physics world present activates the relay.
    world.insert_resource(PhysicsWorld::new());
    world.trigger(SceneStarted {});
    assert_eq!(state(&world), RelayState::Active);
}

#[test]
fn second_start_is_ignored() {
    let (mut world, _) = make_world(true);
    world.trigger(SceneStarted {});
    world.resource_mut::<PhysicsWorld>().unsubscribe(CollisionKind::Active);
    world.trigger(SceneStarted {});

    assert_eq!(state(&world), RelayState::Active);
    assert!(!world.resource::<PhysicsWorld>().is_subscribed(CollisionKind::Active));
}

#[test]
fn shutdown_unsubscribes_and_clears_listeners() {
    let (mut world, scene) = make_world(true);
    let (a, _) = spawn_box(&mut world, 0.0, 0.0);
    world.trigger(SceneStarted {});
    world.add_on_collide_start(a, Partners::any(), recorder(CollisionKind::Start), None);
    world.add_on_collide_end(a, Partners::any(), recorder(CollisionKind::End), None);

    world.trigger(SceneShutdown {});

    assert_eq!(state(&world), RelayState::TornDown);
    assert!(world.resource::<CollisionListeners>().is_empty());
    for kind in CollisionKind::ALL {
        assert!(!world.resource::<PhysicsWorld>().is_subscribed(kind));
    }
    assert_eq!(world.resource::<CollisionRelay>().scene(), Some(scene));

    // Repeated shutdowns are harmless
    world.trigger(SceneShutdown {});
    assert_eq!(state(&world), RelayState::TornDown);
}

#[test]
fn torn_down_relay_does_not_restart() {
    let (mut world, _) = make_world(true);
    world.trigger(SceneStarted {});
    world.trigger(SceneShutdown {});
    world.trigger(SceneStarted {});

    assert_eq!(state(&world), RelayState::TornDown);
    assert!(!world.resource::<PhysicsWorld>().is_subscribed(CollisionKind::Start));
}

#[test]
fn destroy_releases_scene() {
    let (mut world, _) = make_world(true);
    world.trigger(SceneStarted {});
    world.trigger(SceneDestroyed {});

    assert_eq!(state(&world), RelayState::TornDown);
    assert_eq!(world.resource::<CollisionRelay>().scene(), None);
}

#[test]
fn teardown_without_physics_is_silent() {
    let (mut world, _) = make_world(false);
    let (a, _) = spawn_box(&mut world, 0.0, 0.0);
    world.add_on_collide_start(a, Partners::any(), recorder(CollisionKind::Start), None);

    world.trigger(SceneShutdown {});
    world.trigger(SceneDestroyed {});

    assert!(world.resource::<CollisionListeners>().is_empty());
    assert_eq!(state(&world), RelayState::TornDown);
}

#[test]
fn restart_does_not_resurrect_listeners() {
    let (mut world, _) = make_world(true);
    let (a, body_a) = spawn_box(&mut world, 0.0, 0.0);
    let (_, body_b) = spawn_box(&mut world, 5.0, 0.0);
    world.trigger(SceneStarted {});
    world.add_on_collide_start(a, Partners::any(), recorder(CollisionKind::Start), None);
    world.trigger(SceneShutdown {});

    world
        .resource_mut::<PhysicsWorld>()
        .emit(CollisionKind::Start, vec![CollisionPair::new(body_a, body_b)]);
    let mut schedule = make_schedule();
    run_steps(&mut world, &mut schedule, 1);

    assert!(world.resource::<Hits>().0.is_empty());
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn nothing_dispatches_before_start() {
    let (mut world, _) = make_world(true);
    let (a, _) = spawn_box(&mut world, 0.0, 0.0);
    spawn_box(&mut world, 5.0, 0.0);
    world.add_on_collide_start(a, Partners::any(), recorder(CollisionKind::Start), None);

    let mut schedule = make_schedule();
    run_steps(&mut world, &mut schedule, 3);

    assert!(world.resource::<Hits>().0.is_empty());
    assert_eq!(world.resource::<PhysicsWorld>().pending_len(), 0);
}

#[test]
fn approaching_boxes_start_stay_and_end() {
    let (mut world, _) = make_world(true);
    // A moves right 5 units per step into a static B spanning x = 20..30.
    let (a, _) = spawn_box(&mut world, 0.0, 5.0);
    let (b, _) = spawn_box(&mut world, 20.0, 0.0);
    world.add_on_collide_start(a, b, recorder(CollisionKind::Start), None);
    world.add_on_collide_active(a, b, recorder(CollisionKind::Active), None);
    world.add_on_collide_end(a, b, recorder(CollisionKind::End), None);
    world.trigger(SceneStarted {});

    let mut schedule = make_schedule();
    run_steps(&mut world, &mut schedule, 7);

    assert_eq!(
        world.resource::<Hits>().0,
        vec![
            (3, CollisionKind::Start),
            (4, CollisionKind::Active),
            (5, CollisionKind::Active),
            (6, CollisionKind::End),
        ]
    );
}

#[test]
fn compound_parts_report_the_owner() {
    #[derive(Resource, Default)]
    struct Owners(Vec<Option<Entity>>);

    let (mut world, _) = make_world(true);
    world.init_resource::<Owners>();
    let (a, body_a) = spawn_box(&mut world, 0.0, 0.0);
    let (_, body_b) = spawn_box(&mut world, 100.0, 0.0);
    // A part of A sticking out far enough to reach B
    world.spawn((
        Body::new("arm"),
        bevy_ecs::hierarchy::ChildOf(body_a),
        MapPosition::new(95.0, 0.0),
        BoxCollider::new(10.0, 10.0),
    ));

    let cb = CollideCallback::new(|world, data, _| {
        world.resource_mut::<Owners>().0.push(data.game_object_a);
    });
    world.add_on_collide_start(a, body_b, cb, None);
    world.trigger(SceneStarted {});

    let mut schedule = make_schedule();
    run_steps(&mut world, &mut schedule, 1);

    // The arm touches B; the arm never collides with its own root.
    assert_eq!(world.resource::<Owners>().0, vec![Some(a)]);
}
