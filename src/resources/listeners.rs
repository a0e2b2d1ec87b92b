//! Targeted collision listener registry.
//!
//! [`CollisionListeners`] holds one [`ListenerMap`] per [`CollisionKind`].
//! Each map is keyed by the entity a listener was registered on (a raw body,
//! a game object or a tile) and stores the listeners in insertion order. A
//! listener either names a partner (`target`) or matches any partner.
//!
//! Keys are never normalized: a listener registered on a body and one
//! registered on the body's game object live under different keys. The
//! dispatcher probes both representations of each side at dispatch time.
//!
//! Validation and cross-product expansion happen in
//! [`crate::collide`], which has access to the [`World`].

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::events::collision::{CollideData, CollisionKind};

type CollideFn = dyn Fn(&mut World, &CollideData, Option<Entity>) + Send + Sync;

/// A shareable collision callback.
///
/// The third argument is the `context` given at registration. Two callbacks
/// are equal only if they are clones of the same [`CollideCallback`], which
/// is what removal matches on.
#[derive(Clone)]
pub struct CollideCallback(Arc<CollideFn>);

impl CollideCallback {
    /// Wrap a closure. Each call creates a distinct identity; clone the
    /// result to register and later remove the same callback.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut World, &CollideData, Option<Entity>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the callback with exclusive world access, so it may add or
    /// remove listeners while a dispatch is running.
    pub fn call(&self, world: &mut World, data: &CollideData, context: Option<Entity>) {
        (self.0)(world, data, context);
    }
}

impl PartialEq for CollideCallback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CollideCallback {}

impl fmt::Debug for CollideCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollideCallback({:p})", Arc::as_ptr(&self.0))
    }
}

/// One registered listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerEntry {
    /// Partner to match; `None` matches any partner.
    pub target: Option<Entity>,
    pub callback: CollideCallback,
    pub context: Option<Entity>,
}

impl ListenerEntry {
    /// Whether this entry should fire against a partner reported as `body`
    /// owned by `game_object`.
    pub fn fires_for(&self, body: Entity, game_object: Option<Entity>) -> bool {
        match self.target {
            None => true,
            Some(target) => target == body || Some(target) == game_object,
        }
    }

    fn matches(
        &self,
        targets: &[Option<Entity>],
        callback: &CollideCallback,
        context: Option<Entity>,
    ) -> bool {
        targets.contains(&self.target) && self.callback == *callback && self.context == context
    }
}

pub type ListenerList = SmallVec<[ListenerEntry; 2]>;

/// Listeners of one kind, keyed by the entity they were registered on.
///
/// Invariant: no key maps to an empty list.
#[derive(Debug, Clone, Default)]
pub struct ListenerMap {
    entries: FxHashMap<Entity, ListenerList>,
}

impl ListenerMap {
    /// Append a listener under `key`.
    pub fn insert(&mut self, key: Entity, entry: ListenerEntry) {
        self.entries.entry(key).or_default().push(entry);
    }

    /// Remove every entry under `key` whose target is one of `targets` and
    /// whose callback and context equal the given ones. Returns how many
    /// entries were removed.
    pub fn remove(
        &mut self,
        key: Entity,
        targets: &[Option<Entity>],
        callback: &CollideCallback,
        context: Option<Entity>,
    ) -> usize {
        let Some(list) = self.entries.get_mut(&key) else {
            return 0;
        };
        let before = list.len();
        list.retain(|entry| !entry.matches(targets, callback, context));
        let removed = before - list.len();
        if list.is_empty() {
            self.entries.remove(&key);
        }
        removed
    }

    /// Listeners registered under `key`, in registration order.
    pub fn get(&self, key: Entity) -> Option<&[ListenerEntry]> {
        self.entries.get(&key).map(|list| list.as_slice())
    }

    /// Copy of the listeners under `key`, safe to iterate while the map is
    /// being modified by the callbacks themselves.
    pub fn snapshot(&self, key: Entity) -> Option<ListenerList> {
        self.entries.get(&key).cloned()
    }

    pub fn contains_key(&self, key: Entity) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listeners across all keys.
    pub fn listener_count(&self) -> usize {
        self.entries.values().map(|list| list.len()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The three listener maps, one per collision kind.
#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionListeners {
    start: ListenerMap,
    active: ListenerMap,
    end: ListenerMap,
}

impl CollisionListeners {
    pub fn map(&self, kind: CollisionKind) -> &ListenerMap {
        match kind {
            CollisionKind::Start => &self.start,
            CollisionKind::Active => &self.active,
            CollisionKind::End => &self.end,
        }
    }

    pub fn map_mut(&mut self, kind: CollisionKind) -> &mut ListenerMap {
        match kind {
            CollisionKind::Start => &mut self.start,
            CollisionKind::Active => &mut self.active,
            CollisionKind::End => &mut self.end,
        }
    }

    pub fn clear_all(&mut self) {
        self.start.clear();
        self.active.clear();
        self.end.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.active.is_empty() && self.end.is_empty()
    }
}

/// One or more entities a listener is keyed on.
///
/// Single values are normalized into a one-element sequence so callers can
/// pass either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objects(SmallVec<[Entity; 4]>);

impl Objects {
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.0
    }
}

impl From<Entity> for Objects {
    fn from(entity: Entity) -> Self {
        Self(smallvec::smallvec![entity])
    }
}

impl From<Vec<Entity>> for Objects {
    fn from(entities: Vec<Entity>) -> Self {
        Self(SmallVec::from_vec(entities))
    }
}

impl From<&[Entity]> for Objects {
    fn from(entities: &[Entity]) -> Self {
        Self(SmallVec::from_slice(entities))
    }
}

impl<const N: usize> From<[Entity; N]> for Objects {
    fn from(entities: [Entity; N]) -> Self {
        Self(entities.into_iter().collect())
    }
}

/// The partner side of a registration.
///
/// `None` (or [`Partners::any`]) is the wildcard. An explicitly empty list
/// yields no combinations at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partners(SmallVec<[Option<Entity>; 4]>);

impl Partners {
    /// Match any partner.
    pub fn any() -> Self {
        Self(smallvec::smallvec![None])
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Entity>> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Option<Entity>] {
        &self.0
    }
}

impl From<Entity> for Partners {
    fn from(entity: Entity) -> Self {
        Self(smallvec::smallvec![Some(entity)])
    }
}

impl From<Option<Entity>> for Partners {
    fn from(entity: Option<Entity>) -> Self {
        Self(smallvec::smallvec![entity])
    }
}

impl From<Vec<Entity>> for Partners {
    fn from(entities: Vec<Entity>) -> Self {
        Self(entities.into_iter().map(Some).collect())
    }
}

impl From<&[Entity]> for Partners {
    fn from(entities: &[Entity]) -> Self {
        Self(entities.iter().copied().map(Some).collect())
    }
}

impl<const N: usize> From<[Entity; N]> for Partners {
    fn from(entities: [Entity; N]) -> Self {
        Self(entities.into_iter().map(Some).collect())
    }
}
