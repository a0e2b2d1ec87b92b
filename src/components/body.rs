//! Physics body components.
//!
//! A raw rigid body is an entity carrying [`Body`]. Compound bodies are
//! expressed with the bevy hierarchy: every sub-part is a [`Body`] with a
//! [`ChildOf`](bevy_ecs::hierarchy::ChildOf) pointing at its parent body.
//! Collisions are reported on the parts, but listeners are usually keyed on
//! the whole, so the resolver walks up to the root before reading
//! [`BodyOwner`].
//!
//! Game objects (sprites, images, tile wrappers) that carry a body expose it
//! through [`AttachedBody`]. The body points back at its owner through
//! [`BodyOwner`], which only needs to be present on the root body.
//!
//! # Example
//!
//! ```ignore
//! let sprite = world.spawn_empty().id();
//! let body = world.spawn((Body::new("player"), BodyOwner(sprite))).id();
//! world.entity_mut(sprite).insert(AttachedBody(body));
//!
//! // A sensor attached to the same compound body
//! let foot = world.spawn((Body::new("foot"), ChildOf(body))).id();
//! ```

use bevy_ecs::prelude::*;

/// A raw rigid body as seen by the physics engine.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// Human readable label, used in logs only.
    pub label: String,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            label: "Body".to_string(),
        }
    }
}

impl Body {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Back-reference from a root body to the game object that owns it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyOwner(pub Entity);

/// Marks a game object that exposes a physics body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachedBody(pub Entity);
