//! Tile components.
//!
//! Tiles are hot-path objects: a tile layer may hold thousands of them. A
//! tile that takes part in physics gets a lightweight wrapper game object
//! carrying [`TileBody`] and [`AttachedBody`](crate::components::body::AttachedBody).
//! When a collision resolves to such a wrapper, the tile itself is reported
//! instead, so collision handlers never see the wrapper.

use bevy_ecs::prelude::*;

/// A single tile of a tile layer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Column in the layer.
    pub x: i32,
    /// Row in the layer.
    pub y: i32,
    /// Tileset index.
    pub index: u32,
}

impl Tile {
    pub fn new(x: i32, y: i32, index: u32) -> Self {
        Self { x, y, index }
    }
}

/// Wrapper game object that gives a [`Tile`] a physics body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBody {
    /// The wrapped tile entity.
    pub tile: Entity,
}
