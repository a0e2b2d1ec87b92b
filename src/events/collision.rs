//! Collision pair data and broadcast events.
//!
//! The physics engine reports one [`CollisionBatch`] per step and per
//! [`CollisionKind`]. After the pairs are enriched with their game objects,
//! the dispatcher triggers two kinds of broadcast events that any observer
//! can subscribe to, independent of the targeted listener registry:
//!
//! - [`PairCollision`] once per pair (`paircollisionstart`, ...)
//! - [`CollisionBroadcast`] once per batch (`collisionstart`, ...)
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<PairCollision>| {
//!     let ev = trigger.event();
//!     if ev.kind == CollisionKind::Start {
//!         info!("{:?} hit {:?}", ev.body_a, ev.body_b);
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;
use serde::Serialize;

/// Which phase of a contact a batch describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionKind {
    /// Bodies started touching during this step.
    Start,
    /// Bodies are still touching.
    Active,
    /// Bodies stopped touching during this step.
    End,
}

impl CollisionKind {
    pub const ALL: [CollisionKind; 3] = [CollisionKind::Start, CollisionKind::Active, CollisionKind::End];

    /// Name of the per-batch broadcast channel.
    pub fn event_name(self) -> &'static str {
        match self {
            CollisionKind::Start => "collisionstart",
            CollisionKind::Active => "collisionactive",
            CollisionKind::End => "collisionend",
        }
    }

    /// Name of the per-pair broadcast channel.
    pub fn pair_event_name(self) -> &'static str {
        match self {
            CollisionKind::Start => "paircollisionstart",
            CollisionKind::Active => "paircollisionactive",
            CollisionKind::End => "paircollisionend",
        }
    }
}

/// One contact between two bodies within a step.
///
/// The physics side fills `body_a`/`body_b`. The game object fields are
/// filled by the pair resolver every step and are never carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub body_a: Entity,
    pub body_b: Entity,
    pub game_object_a: Option<Entity>,
    pub game_object_b: Option<Entity>,
}

impl CollisionPair {
    /// A raw, not yet resolved pair.
    pub fn new(body_a: Entity, body_b: Entity) -> Self {
        Self {
            body_a,
            body_b,
            game_object_a: None,
            game_object_b: None,
        }
    }
}

/// All pairs of one kind reported by the physics engine for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBatch {
    pub kind: CollisionKind,
    pub pairs: Vec<CollisionPair>,
}

/// Data handed to targeted collision callbacks.
///
/// `body_a`/`game_object_a` always describe the side the listener was keyed
/// on. When that is the engine's second body, the view is swapped and
/// `is_reversed` is set. `pair` keeps the engine's order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollideData {
    pub body_a: Entity,
    pub game_object_a: Option<Entity>,
    pub body_b: Entity,
    pub game_object_b: Option<Entity>,
    pub pair: CollisionPair,
    pub is_reversed: bool,
}

impl CollideData {
    pub fn forward(pair: &CollisionPair) -> Self {
        Self {
            body_a: pair.body_a,
            game_object_a: pair.game_object_a,
            body_b: pair.body_b,
            game_object_b: pair.game_object_b,
            pair: *pair,
            is_reversed: false,
        }
    }

    pub fn reversed(pair: &CollisionPair) -> Self {
        Self {
            body_a: pair.body_b,
            game_object_a: pair.game_object_b,
            body_b: pair.body_a,
            game_object_b: pair.game_object_a,
            pair: *pair,
            is_reversed: true,
        }
    }
}

/// Broadcast fired once per enriched pair, before targeted listeners run.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCollision {
    pub kind: CollisionKind,
    pub body_a: Entity,
    pub body_b: Entity,
    pub game_object_a: Option<Entity>,
    pub game_object_b: Option<Entity>,
    pub pair: CollisionPair,
}

/// Broadcast fired once per batch, after every pair has been dispatched.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CollisionBroadcast {
    pub kind: CollisionKind,
    pub pairs: Vec<CollisionPair>,
}
