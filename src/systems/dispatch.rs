//! Collision dispatch.
//!
//! [`dispatch_collisions`] is an exclusive system that drains the batches
//! queued on [`PhysicsWorld`] and hands each to [`dispatch_batch`]. For every
//! pair of a batch, in order:
//!
//! 1. the pair is resolved in place ([`resolve_pair`])
//! 2. [`PairCollision`] is triggered
//! 3. if the kind has listeners, four keys are probed: body A, game object A,
//!    body B, game object B. Keys on side A match against side B's body or
//!    game object and get the forward [`CollideData`]; keys on side B match
//!    against side A and get the reversed view.
//!
//! After the last pair, [`CollisionBroadcast`] is triggered with the whole
//! enriched batch.
//!
//! Callbacks get `&mut World` and may add or remove listeners. Each probe
//! iterates a snapshot of its key's list, so such changes only affect later
//! probes.

use bevy_ecs::prelude::*;
use log::trace;

use crate::events::collision::{
    CollideData, CollisionBatch, CollisionBroadcast, CollisionKind, PairCollision,
};
use crate::resources::listeners::CollisionListeners;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::relay::CollisionRelay;
use crate::resources::relayconfig::RelayConfig;
use crate::systems::pairresolver::resolve_pair;

/// Run condition: the relay is installed and subscribed.
pub fn relay_is_active(relay: Option<Res<CollisionRelay>>) -> bool {
    relay.is_some_and(|relay| relay.is_active())
}

/// Drain the physics world and dispatch every queued batch.
pub fn dispatch_collisions(world: &mut World) {
    let batches = match world.get_resource_mut::<PhysicsWorld>() {
        Some(mut physics) => physics.drain_batches(),
        None => return,
    };
    for batch in batches {
        dispatch_batch(world, batch);
    }
}

/// Dispatch one batch of collision pairs.
pub fn dispatch_batch(world: &mut World, mut batch: CollisionBatch) {
    let (broadcast_pairs, broadcast_batches) = world
        .get_resource::<RelayConfig>()
        .map_or((true, true), |config| {
            (config.broadcast_pairs, config.broadcast_batches)
        });
    let kind = batch.kind;
    trace!("Dispatching {} ({} pairs)", kind.event_name(), batch.pairs.len());

    for pair in batch.pairs.iter_mut() {
        resolve_pair(world, pair);

        if broadcast_pairs {
            world.trigger(PairCollision {
                kind,
                body_a: pair.body_a,
                body_b: pair.body_b,
                game_object_a: pair.game_object_a,
                game_object_b: pair.game_object_b,
                pair: *pair,
            });
        }

        if !has_listeners(world, kind) {
            continue;
        }

        let forward = CollideData::forward(pair);
        let reversed = CollideData::reversed(pair);
        probe(world, kind, Some(pair.body_a), &forward);
        probe(world, kind, pair.game_object_a, &forward);
        probe(world, kind, Some(pair.body_b), &reversed);
        probe(world, kind, pair.game_object_b, &reversed);
    }

    if broadcast_batches {
        world.trigger(CollisionBroadcast {
            kind,
            pairs: batch.pairs,
        });
    }
}

fn has_listeners(world: &World, kind: CollisionKind) -> bool {
    world
        .get_resource::<CollisionListeners>()
        .is_some_and(|listeners| !listeners.map(kind).is_empty())
}

/// Fire the listeners keyed on `key` whose target matches the partner side
/// of `data`.
fn probe(world: &mut World, kind: CollisionKind, key: Option<Entity>, data: &CollideData) {
    let Some(key) = key else {
        return;
    };
    let Some(entries) = world
        .get_resource::<CollisionListeners>()
        .and_then(|listeners| listeners.map(kind).snapshot(key))
    else {
        return;
    };
    for entry in entries.iter() {
        if entry.fires_for(data.body_b, data.game_object_b) {
            entry.callback.call(world, data, entry.context);
        }
    }
}
