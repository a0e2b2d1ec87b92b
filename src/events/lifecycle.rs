//! Host scene lifecycle events and the relay's observers.
//!
//! The host scene triggers [`SceneStarted`] once when it starts,
//! [`SceneShutdown`] whenever it shuts down and [`SceneDestroyed`] once when
//! it is destroyed. The observers in this module subscribe the relay to the
//! [`PhysicsWorld`] on start and unsubscribe and clear every listener on
//! teardown. They are spawned by
//! [`install_collision_relay`](crate::collide::install_collision_relay).
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::events::collision::CollisionKind;
use crate::resources::listeners::CollisionListeners;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::relay::{CollisionRelay, RelayState};

/// Event the host triggers once when its scene starts.
///
/// Emitting this event causes [`observe_scene_started`] to subscribe the
/// relay to every [`CollisionKind`] of the [`PhysicsWorld`]. It has no effect
/// on a relay that is already active or torn down.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneStarted {}

/// Event the host triggers whenever its scene shuts down.
///
/// Emitting this event causes [`observe_scene_shutdown`] to unsubscribe the
/// relay and drop every registered listener. It may be triggered any number
/// of times.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneShutdown {}

/// Event the host triggers once when its scene is destroyed.
///
/// Handled by [`observe_scene_destroyed`]: a shutdown that also releases
/// the relay's scene reference.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneDestroyed {}

/// Observer that subscribes the relay to the physics world's collision
/// batches.
///
/// Contract
/// - Without an installed [`CollisionRelay`], logs a warning and returns.
/// - Only a [`RelayState::Uninitialized`] relay is started; any other
///   state is left untouched.
/// - Without a [`PhysicsWorld`] the relay stays inert and a warning is
///   logged; a later start may still activate it.
/// - Otherwise subscribes every [`CollisionKind`] and moves the relay to
///   [`RelayState::Active`].
pub fn observe_scene_started(
    _trigger: On<SceneStarted>,
    relay: Option<ResMut<CollisionRelay>>,
    physics: Option<ResMut<PhysicsWorld>>,
) {
    let Some(mut relay) = relay else {
        warn!("SceneStarted observed but the collision relay is not installed");
        return;
    };
    if relay.state() != RelayState::Uninitialized {
        debug!("Collision relay already started ({:?})", relay.state());
        return;
    }
    let Some(mut physics) = physics else {
        warn!("Collision relay requires a physics world; collision events will not be dispatched");
        return;
    };
    for kind in CollisionKind::ALL {
        physics.subscribe(kind);
    }
    relay.set_state(RelayState::Active);
    info!("Collision relay subscribed to physics collision events");
}

/// Observer that tears the relay down when the scene shuts down.
///
/// Contract
/// - Unsubscribes every [`CollisionKind`] if a [`PhysicsWorld`] is still
///   present; a missing one is normal during teardown.
/// - Clears all [`CollisionListeners`]. Broadcast observers are left alone.
/// - Moves the relay to [`RelayState::TornDown`] from any state, so a later
///   [`SceneStarted`] does not resurrect it.
/// - Safe to run repeatedly.
pub fn observe_scene_shutdown(
    _trigger: On<SceneShutdown>,
    relay: Option<ResMut<CollisionRelay>>,
    physics: Option<ResMut<PhysicsWorld>>,
    listeners: Option<ResMut<CollisionListeners>>,
) {
    tear_down(relay, physics, listeners);
}

/// Observer for [`SceneDestroyed`].
///
/// Behaves as [`observe_scene_shutdown`], then releases the scene reference
/// held by [`CollisionRelay`].
pub fn observe_scene_destroyed(
    _trigger: On<SceneDestroyed>,
    relay: Option<ResMut<CollisionRelay>>,
    physics: Option<ResMut<PhysicsWorld>>,
    listeners: Option<ResMut<CollisionListeners>>,
) {
    if let Some(mut relay) = tear_down(relay, physics, listeners) {
        relay.release_scene();
    }
}

fn tear_down<'w>(
    relay: Option<ResMut<'w, CollisionRelay>>,
    physics: Option<ResMut<'w, PhysicsWorld>>,
    listeners: Option<ResMut<'w, CollisionListeners>>,
) -> Option<ResMut<'w, CollisionRelay>> {
    // No physics world is expected during a full teardown.
    if let Some(mut physics) = physics {
        for kind in CollisionKind::ALL {
            physics.unsubscribe(kind);
        }
    }
    if let Some(mut listeners) = listeners {
        listeners.clear_all();
    }
    let mut relay = relay?;
    if relay.state() != RelayState::TornDown {
        debug!("Collision relay torn down");
        relay.set_state(RelayState::TornDown);
    }
    Some(relay)
}
