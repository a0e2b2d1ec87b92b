//! Relay lifecycle state.
//!
//! The relay follows its host scene:
//!
//! ```text
//! Uninitialized --start--> Active --shutdown/destroy--> TornDown
//! ```
//!
//! A start without a [`PhysicsWorld`](crate::resources::physicsworld::PhysicsWorld)
//! leaves the relay `Uninitialized`, so a later start may still activate it.
//! `TornDown` is terminal.

use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayState {
    #[default]
    Uninitialized,
    Active,
    TornDown,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionRelay {
    state: RelayState,
    /// Scene entity the relay belongs to. Released on destroy.
    scene: Option<Entity>,
}

impl CollisionRelay {
    pub fn new(scene: Option<Entity>) -> Self {
        Self {
            state: RelayState::Uninitialized,
            scene,
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RelayState::Active
    }

    pub fn scene(&self) -> Option<Entity> {
        self.scene
    }

    pub(crate) fn set_state(&mut self, state: RelayState) {
        self.state = state;
    }

    pub(crate) fn release_scene(&mut self) {
        self.scene = None;
    }
}
