//! Linear velocity for bodies moved by the reference contact generator.

use bevy_ecs::prelude::Component;

/// Units per step. Applied to [`MapPosition`](crate::components::mapposition::MapPosition)
/// before contacts are computed.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
