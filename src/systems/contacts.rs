//! Reference contact generator.
//!
//! A minimal stand-in for a physics engine, used by the demo binary and the
//! tests: it moves bodies by their [`Velocity`], finds overlapping
//! [`BoxCollider`]s and reports start/active/end pairs to the
//! [`PhysicsWorld`] by comparing this step's contacts with the previous
//! step's. Parts of the same compound body never collide with each other.
//! Like most engines it only reports a kind when it has pairs for it.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

use crate::components::body::Body;
use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::velocity::Velocity;
use crate::events::collision::{CollisionKind, CollisionPair};
use crate::resources::physicsworld::PhysicsWorld;
use crate::systems::pairresolver::walk_to_root;

/// Body pairs touching at the end of the last step, ordered `(low, high)`.
#[derive(Resource, Debug, Default)]
pub struct ContactCache {
    pub touching: FxHashSet<(Entity, Entity)>,
}

pub fn move_bodies(mut query: Query<(&mut MapPosition, &Velocity)>) {
    for (mut position, velocity) in query.iter_mut() {
        position.x += velocity.x;
        position.y += velocity.y;
    }
}

fn root_of(entity: Entity, parents: &Query<&ChildOf>, bodies: &Query<(), With<Body>>) -> Entity {
    walk_to_root(entity, |current| {
        parents
            .get(current)
            .ok()
            .map(ChildOf::parent)
            .filter(|parent| bodies.contains(*parent))
    })
}

fn to_pairs(mut keys: Vec<(Entity, Entity)>) -> Vec<CollisionPair> {
    keys.sort();
    keys.into_iter()
        .map(|(a, b)| CollisionPair::new(a, b))
        .collect()
}

pub fn contact_step(
    colliders: Query<(Entity, &MapPosition, &BoxCollider), With<Body>>,
    parents: Query<&ChildOf>,
    bodies: Query<(), With<Body>>,
    mut cache: ResMut<ContactCache>,
    physics: Option<ResMut<PhysicsWorld>>,
) {
    let mut touching: FxHashSet<(Entity, Entity)> = FxHashSet::default();
    for [(entity_a, position_a, collider_a), (entity_b, position_b, collider_b)] in
        colliders.iter_combinations()
    {
        if root_of(entity_a, &parents, &bodies) == root_of(entity_b, &parents, &bodies) {
            continue;
        }
        if collider_a.overlaps(*position_a, collider_b, *position_b) {
            touching.insert((entity_a.min(entity_b), entity_a.max(entity_b)));
        }
    }

    let started: Vec<_> = touching.difference(&cache.touching).copied().collect();
    let active: Vec<_> = touching.intersection(&cache.touching).copied().collect();
    let ended: Vec<_> = cache.touching.difference(&touching).copied().collect();
    cache.touching = touching;

    let Some(mut physics) = physics else {
        return;
    };
    for (kind, keys) in [
        (CollisionKind::Start, started),
        (CollisionKind::Active, active),
        (CollisionKind::End, ended),
    ] {
        if !keys.is_empty() {
            physics.emit(kind, to_pairs(keys));
        }
    }
}
