//! Collision relay demo.
//!
//! Runs a small scene on the reference contact generator: a compound player
//! body with a foot sensor drifting right, a handful of randomly moving
//! crates, and a wall of tiles. Targeted listeners and broadcast observers
//! report what they see.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --steps 200 --seed 7
//! cargo run -- --json
//! ```

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use collision_relay::collide::{CollideListenersExt, install_collision_relay};
use collision_relay::components::body::{AttachedBody, Body, BodyOwner};
use collision_relay::components::boxcollider::BoxCollider;
use collision_relay::components::mapposition::MapPosition;
use collision_relay::components::tile::{Tile, TileBody};
use collision_relay::components::velocity::Velocity;
use collision_relay::events::collision::{CollideData, CollisionBroadcast, CollisionKind, PairCollision};
use collision_relay::events::lifecycle::{SceneDestroyed, SceneShutdown, SceneStarted};
use collision_relay::resources::listeners::{CollideCallback, Partners};
use collision_relay::resources::physicsworld::PhysicsWorld;
use collision_relay::resources::relayconfig::RelayConfig;
use collision_relay::systems::contacts::{ContactCache, contact_step, move_bodies};
use collision_relay::systems::dispatch::{dispatch_collisions, relay_is_active};

/// Collision relay demo scene
#[derive(Parser)]
#[command(version, about = "Runs a small scene and prints the collisions the relay dispatches.")]
struct Cli {
    /// INI file with a [relay] section.
    #[arg(long, value_name = "PATH", default_value = "./relay.ini")]
    config: PathBuf,

    /// Number of physics steps to run.
    #[arg(long, default_value_t = 120)]
    steps: u32,

    /// Seed for the crates' start positions and velocities.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of crates.
    #[arg(long, default_value_t = 6)]
    crates: u32,

    /// Print one JSON object per targeted callback instead of log lines.
    #[arg(long)]
    json: bool,
}

#[derive(Resource, Debug, Default)]
struct Step(u32);

#[derive(Resource, Debug)]
struct Output {
    json: bool,
}

#[derive(Serialize)]
struct Report {
    step: u32,
    listener: &'static str,
    kind: CollisionKind,
    body_a: u64,
    body_b: u64,
    game_object_a: Option<u64>,
    game_object_b: Option<u64>,
    reversed: bool,
}

fn report(world: &mut World, listener: &'static str, kind: CollisionKind, data: &CollideData) {
    let step = world.resource::<Step>().0;
    if world.resource::<Output>().json {
        let line = Report {
            step,
            listener,
            kind,
            body_a: data.body_a.to_bits(),
            body_b: data.body_b.to_bits(),
            game_object_a: data.game_object_a.map(Entity::to_bits),
            game_object_b: data.game_object_b.map(Entity::to_bits),
            reversed: data.is_reversed,
        };
        match serde_json::to_string(&line) {
            Ok(text) => println!("{text}"),
            Err(e) => log::error!("Failed to serialize report: {e}"),
        }
    } else {
        info!(
            "[step {step}] {listener} ({}): {:?} ({:?}) <-> {:?} ({:?})",
            kind.event_name(),
            data.game_object_a,
            data.body_a,
            data.game_object_b,
            data.body_b
        );
    }
}

/// Spawns a game object with a box body and returns `(game_object, body)`.
fn spawn_box(world: &mut World, label: &str, pos: MapPosition, size: f32, vel: Velocity) -> (Entity, Entity) {
    let game_object = world.spawn_empty().id();
    let body = world
        .spawn((Body::new(label), BodyOwner(game_object), pos, BoxCollider::new(size, size), vel))
        .id();
    world.entity_mut(game_object).insert(AttachedBody(body));
    (game_object, body)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = RelayConfig::with_path(&cli.config);
    config.load_from_file().ok(); // ignore errors, use defaults

    let mut world = World::new();
    world.insert_resource(config);
    world.insert_resource(PhysicsWorld::new());
    world.insert_resource(ContactCache::default());
    world.insert_resource(Step::default());
    world.insert_resource(Output { json: cli.json });

    let scene = world.spawn_empty().id();
    install_collision_relay(&mut world, Some(scene));

    world.add_observer(|trigger: On<PairCollision>| {
        let ev = trigger.event();
        log::debug!("{}: {:?} <-> {:?}", ev.kind.pair_event_name(), ev.body_a, ev.body_b);
    });
    world.add_observer(|trigger: On<CollisionBroadcast>| {
        let ev = trigger.event();
        log::debug!("{}: {} pairs", ev.kind.event_name(), ev.pairs.len());
    });

    // Player: compound body with a foot sensor hanging below it
    let (player, player_body) = spawn_box(
        &mut world,
        "player",
        MapPosition::new(0.0, 0.0),
        16.0,
        Velocity::new(1.5, 0.0),
    );
    world.spawn((
        Body::new("foot"),
        ChildOf(player_body),
        MapPosition::new(4.0, 16.0),
        BoxCollider::new(8.0, 4.0),
        Velocity::new(1.5, 0.0),
    ));

    // Crates
    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut crates = Vec::new();
    for i in 0..cli.crates {
        let pos = MapPosition::new(rng.f32() * 200.0 - 20.0, rng.f32() * 60.0 - 30.0);
        let vel = Velocity::new(rng.f32() * 2.0 - 1.0, rng.f32() * 2.0 - 1.0);
        let (game_object, _) = spawn_box(&mut world, &format!("crate{i}"), pos, 10.0, vel);
        crates.push(game_object);
    }

    // Tile wall on the right
    let mut tiles = Vec::new();
    for row in -3..3 {
        let tile = world.spawn(Tile::new(12, row, 1)).id();
        let wrapper = world.spawn(TileBody { tile }).id();
        let body = world
            .spawn((
                Body::new("tile"),
                BodyOwner(wrapper),
                MapPosition::new(192.0, row as f32 * 16.0),
                BoxCollider::new(16.0, 16.0),
            ))
            .id();
        world.entity_mut(wrapper).insert(AttachedBody(body));
        tiles.push(tile);
    }

    let on_player_hit = CollideCallback::new(|world, data, _| {
        report(world, "player-start", CollisionKind::Start, data)
    });
    world.add_on_collide_start(player, Partners::any(), on_player_hit, None);

    let on_wall = CollideCallback::new(|world, data, _| {
        report(world, "crate-wall-start", CollisionKind::Start, data)
    });
    world.add_on_collide_start(crates.clone(), tiles.clone(), on_wall, None);

    // Only report the first time the player leaves a tile.
    let on_leave_wall = CollideCallback::new(|world, data, context| {
        report(world, "player-wall-end-once", CollisionKind::End, data);
        if let Some(scene) = context {
            log::debug!("one-shot listener fired in scene {scene:?}");
        }
        world.remove_all_collide_end_listeners();
    });
    world.add_on_collide_end(player, tiles, on_leave_wall, Some(scene));

    let mut step = Schedule::default();
    step.add_systems(
        (
            move_bodies,
            contact_step,
            dispatch_collisions.run_if(relay_is_active),
        )
            .chain(),
    );
    step.initialize(&mut world)
        .expect("Failed to initialize schedule");

    world.trigger(SceneStarted {});

    for n in 0..cli.steps {
        world.resource_mut::<Step>().0 = n;
        step.run(&mut world);
        world.clear_trackers();
    }

    world.trigger(SceneShutdown {});
    world.trigger(SceneDestroyed {});
    info!("Ran {} steps", cli.steps);
}
