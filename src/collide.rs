//! Collision listener registration.
//!
//! [`CollideListenersExt`] adds the registration API to [`World`]:
//!
//! ```ignore
//! let on_hit = CollideCallback::new(|world, data, context| {
//!     info!("{:?} hit {:?}", data.game_object_a, data.game_object_b);
//! });
//!
//! // Player against any of the enemies
//! let unsubscribe = world.add_on_collide_start(player, enemies.as_slice(), on_hit.clone(), None);
//!
//! // Player against anything
//! world.add_on_collide_active(player, None, on_hit.clone(), Some(hud));
//!
//! // Later, from anywhere that has the world (including inside a callback)
//! unsubscribe.unsubscribe(world);
//! ```
//!
//! Registrations are expanded over the cross product of both sides. Each
//! combination is validated on its own: an object that is neither a body, a
//! game object with a body nor a tile is rejected with a log line and the
//! remaining combinations still go through. Nothing here ever panics or
//! returns an error.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::events::collision::CollisionKind;
use crate::events::lifecycle::{
    observe_scene_destroyed, observe_scene_shutdown, observe_scene_started,
};
use crate::resources::listeners::{
    CollideCallback, CollisionListeners, ListenerEntry, Objects, Partners,
};
use crate::resources::relay::CollisionRelay;
use crate::resources::relayconfig::RelayConfig;
use crate::systems::pairresolver::is_physics_object;

/// Insert a fresh relay state, the listener and config resources if they
/// are missing, and spawn the lifecycle observers. `scene` is the host scene
/// entity, if there is one.
///
/// Installing into a world that already has a relay does nothing.
pub fn install_collision_relay(world: &mut World, scene: Option<Entity>) {
    if world.contains_resource::<CollisionRelay>() {
        debug!("Collision relay already installed");
        return;
    }
    world.insert_resource(CollisionRelay::new(scene));
    world.init_resource::<CollisionListeners>();
    world.init_resource::<RelayConfig>();
    world.spawn(Observer::new(observe_scene_started));
    world.spawn(Observer::new(observe_scene_shutdown));
    world.spawn(Observer::new(observe_scene_destroyed));
    world.flush();
}

/// Captures the exact arguments of a registration so it can be undone.
#[derive(Debug, Clone)]
pub struct CollideUnsubscribe {
    kind: CollisionKind,
    objects_a: Objects,
    objects_b: Partners,
    callback: CollideCallback,
    context: Option<Entity>,
}

impl CollideUnsubscribe {
    pub fn kind(&self) -> CollisionKind {
        self.kind
    }

    /// Remove the listeners this handle was created for. Safe to call more
    /// than once.
    pub fn unsubscribe(&self, world: &mut World) {
        remove_listeners(
            world,
            self.kind,
            &self.objects_a,
            &self.objects_b,
            &self.callback,
            self.context,
        );
    }
}

fn reject(world: &World, message: String) {
    let warn_on_rejected = world
        .get_resource::<RelayConfig>()
        .is_none_or(|config| config.warn_on_rejected);
    if warn_on_rejected {
        warn!("{}", message);
    } else {
        debug!("{}", message);
    }
}

/// Register `callback` for every combination of `objects_a` × `objects_b`.
/// Returns how many combinations were accepted.
pub fn add_listeners(
    world: &mut World,
    kind: CollisionKind,
    objects_a: &Objects,
    objects_b: &Partners,
    callback: &CollideCallback,
    context: Option<Entity>,
) -> usize {
    if !world.contains_resource::<CollisionListeners>() {
        warn!("Collision relay is not installed; {} listener ignored", kind.event_name());
        return 0;
    }

    let mut accepted = Vec::new();
    for object_a in objects_a.iter() {
        for object_b in objects_b.iter() {
            if !is_physics_object(world, object_a) {
                reject(
                    world,
                    format!(
                        "{}: {:?} is not a body, a game object with a body or a tile; listener skipped",
                        kind.event_name(),
                        object_a
                    ),
                );
                continue;
            }
            if let Some(target) = object_b
                && !is_physics_object(world, target)
            {
                reject(
                    world,
                    format!(
                        "{}: partner {:?} is not a body, a game object with a body or a tile; listener skipped",
                        kind.event_name(),
                        target
                    ),
                );
                continue;
            }
            accepted.push((object_a, object_b));
        }
    }

    let count = accepted.len();
    let mut listeners = world.resource_mut::<CollisionListeners>();
    let map = listeners.map_mut(kind);
    for (key, target) in accepted {
        map.insert(
            key,
            ListenerEntry {
                target,
                callback: callback.clone(),
                context,
            },
        );
    }
    count
}

/// Remove the listeners matching `callback`, `context` and one of
/// `objects_b` from every key in `objects_a`. Returns how many were removed.
pub fn remove_listeners(
    world: &mut World,
    kind: CollisionKind,
    objects_a: &Objects,
    objects_b: &Partners,
    callback: &CollideCallback,
    context: Option<Entity>,
) -> usize {
    let Some(mut listeners) = world.get_resource_mut::<CollisionListeners>() else {
        return 0;
    };
    let map = listeners.map_mut(kind);
    objects_a
        .iter()
        .map(|key| map.remove(key, objects_b.as_slice(), callback, context))
        .sum()
}

/// Registration API for targeted collision listeners.
pub trait CollideListenersExt {
    fn add_on_collide(
        &mut self,
        kind: CollisionKind,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: CollideCallback,
        context: Option<Entity>,
    ) -> CollideUnsubscribe;

    fn remove_on_collide(
        &mut self,
        kind: CollisionKind,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: &CollideCallback,
        context: Option<Entity>,
    );

    fn remove_all_collide_listeners_of(&mut self, kind: CollisionKind);

    /// Clear the start, active and end listeners.
    fn remove_all_collide_listeners(&mut self);

    fn add_on_collide_start(
        &mut self,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: CollideCallback,
        context: Option<Entity>,
    ) -> CollideUnsubscribe {
        self.add_on_collide(CollisionKind::Start, objects_a, objects_b, callback, context)
    }

    fn add_on_collide_active(
        &mut self,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: CollideCallback,
        context: Option<Entity>,
    ) -> CollideUnsubscribe {
        self.add_on_collide(CollisionKind::Active, objects_a, objects_b, callback, context)
    }

    fn add_on_collide_end(
        &mut self,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: CollideCallback,
        context: Option<Entity>,
    ) -> CollideUnsubscribe {
        self.add_on_collide(CollisionKind::End, objects_a, objects_b, callback, context)
    }

    fn remove_on_collide_start(
        &mut self,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: &CollideCallback,
        context: Option<Entity>,
    ) {
        self.remove_on_collide(CollisionKind::Start, objects_a, objects_b, callback, context);
    }

    fn remove_on_collide_active(
        &mut self,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: &CollideCallback,
        context: Option<Entity>,
    ) {
        self.remove_on_collide(CollisionKind::Active, objects_a, objects_b, callback, context);
    }

    fn remove_on_collide_end(
        &mut self,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: &CollideCallback,
        context: Option<Entity>,
    ) {
        self.remove_on_collide(CollisionKind::End, objects_a, objects_b, callback, context);
    }

    fn remove_all_collide_start_listeners(&mut self) {
        self.remove_all_collide_listeners_of(CollisionKind::Start);
    }

    fn remove_all_collide_active_listeners(&mut self) {
        self.remove_all_collide_listeners_of(CollisionKind::Active);
    }

    fn remove_all_collide_end_listeners(&mut self) {
        self.remove_all_collide_listeners_of(CollisionKind::End);
    }
}

impl CollideListenersExt for World {
    fn add_on_collide(
        &mut self,
        kind: CollisionKind,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: CollideCallback,
        context: Option<Entity>,
    ) -> CollideUnsubscribe {
        let objects_a = objects_a.into();
        let objects_b = objects_b.into();
        add_listeners(self, kind, &objects_a, &objects_b, &callback, context);
        CollideUnsubscribe {
            kind,
            objects_a,
            objects_b,
            callback,
            context,
        }
    }

    fn remove_on_collide(
        &mut self,
        kind: CollisionKind,
        objects_a: impl Into<Objects>,
        objects_b: impl Into<Partners>,
        callback: &CollideCallback,
        context: Option<Entity>,
    ) {
        remove_listeners(self, kind, &objects_a.into(), &objects_b.into(), callback, context);
    }

    fn remove_all_collide_listeners_of(&mut self, kind: CollisionKind) {
        if let Some(mut listeners) = self.get_resource_mut::<CollisionListeners>() {
            listeners.map_mut(kind).clear();
        }
    }

    fn remove_all_collide_listeners(&mut self) {
        if let Some(mut listeners) = self.get_resource_mut::<CollisionListeners>() {
            listeners.clear_all();
        }
    }
}
