//! Resolve raw bodies to the game objects that own them.
//!
//! A collision reported on a sub-part of a compound body is attributed to
//! the root body, and the root's [`BodyOwner`] is the resolved game object.
//! Tile wrappers ([`TileBody`]) are replaced by the tile they wrap.
//!
//! Resolution runs every step on every pair and is never cached: owners can
//! change between steps.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use log::warn;
use rustc_hash::FxHashSet;

use crate::components::body::{AttachedBody, Body, BodyOwner};
use crate::components::tile::{Tile, TileBody};
use crate::events::collision::CollisionPair;

/// Topmost ancestor of `body` in its compound hierarchy.
///
/// Walks [`ChildOf`] as long as the parent is itself a [`Body`].
pub fn root_body(world: &World, body: Entity) -> Entity {
    walk_to_root(body, |entity| {
        world
            .get::<ChildOf>(entity)
            .map(ChildOf::parent)
            .filter(|parent| world.get::<Body>(*parent).is_some())
    })
}

/// Follow `body_parent` upwards until it yields nothing.
///
/// A hierarchy that loops back on itself stops at the last entity before
/// the repeat and logs a warning.
pub(crate) fn walk_to_root(body: Entity, body_parent: impl Fn(Entity) -> Option<Entity>) -> Entity {
    let mut current = body;
    let mut visited: FxHashSet<Entity> = FxHashSet::default();
    visited.insert(current);
    while let Some(parent) = body_parent(current) {
        if !visited.insert(parent) {
            if parent != current {
                warn!(
                    "ChildOf cycle between bodies above {:?}; treating {:?} as the root",
                    body, current
                );
            }
            break;
        }
        current = parent;
    }
    current
}

/// The game object owning `body`'s root, with tile wrappers substituted by
/// their tile.
pub fn resolve_game_object(world: &World, body: Entity) -> Option<Entity> {
    let root = root_body(world, body);
    let owner = world.get::<BodyOwner>(root)?.0;
    match world.get::<TileBody>(owner) {
        Some(wrapper) => Some(wrapper.tile),
        None => Some(owner),
    }
}

/// Fill the game object fields of `pair` in place.
pub fn resolve_pair(world: &World, pair: &mut CollisionPair) {
    pair.game_object_a = resolve_game_object(world, pair.body_a);
    pair.game_object_b = resolve_game_object(world, pair.body_b);
}

/// Whether `entity` can take part in collisions: a raw body, a game object
/// exposing a body, or a tile.
pub fn is_physics_object(world: &World, entity: Entity) -> bool {
    world.get::<Body>(entity).is_some()
        || world.get::<AttachedBody>(entity).is_some()
        || world.get::<Tile>(entity).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_stops_at_first_repeated_entity() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();
        let parent_of = |entity: Entity| {
            if entity == a {
                Some(b)
            } else if entity == b {
                Some(c)
            } else {
                Some(a)
            }
        };
        assert_eq!(walk_to_root(a, parent_of), c);
    }

    #[test]
    fn walk_on_self_parent_returns_body() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        assert_eq!(walk_to_root(a, |entity| Some(entity)), a);
    }

    #[test]
    fn walk_without_parent_returns_body() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        assert_eq!(walk_to_root(a, |_| None), a);
    }
}
