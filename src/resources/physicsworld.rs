//! Physics world handle.
//!
//! [`PhysicsWorld`] stands for the external physics engine. Its presence as a
//! resource is what "a physics world exists" means to the relay. The engine
//! calls [`PhysicsWorld::emit`] once per step for each collision kind; only
//! kinds somebody subscribed to are queued. The relay's dispatch system
//! drains the queue with [`PhysicsWorld::drain_batches`].

use bevy_ecs::prelude::*;
use log::trace;
use rustc_hash::FxHashSet;

use crate::events::collision::{CollisionBatch, CollisionKind, CollisionPair};

#[derive(Resource, Debug, Default)]
pub struct PhysicsWorld {
    subscribed: FxHashSet<CollisionKind>,
    pending: Vec<CollisionBatch>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: CollisionKind) {
        self.subscribed.insert(kind);
    }

    /// Stop delivering `kind`. Batches of that kind already queued are dropped.
    pub fn unsubscribe(&mut self, kind: CollisionKind) {
        self.subscribed.remove(&kind);
        self.pending.retain(|batch| batch.kind != kind);
    }

    pub fn is_subscribed(&self, kind: CollisionKind) -> bool {
        self.subscribed.contains(&kind)
    }

    /// Report the pairs of one kind for the current step.
    pub fn emit(&mut self, kind: CollisionKind, pairs: Vec<CollisionPair>) {
        if !self.is_subscribed(kind) {
            trace!("Dropping {} with {} pairs: no subscriber", kind.event_name(), pairs.len());
            return;
        }
        self.pending.push(CollisionBatch { kind, pairs });
    }

    /// Take every queued batch, in emit order.
    pub fn drain_batches(&mut self) -> Vec<CollisionBatch> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
