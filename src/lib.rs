//! Collision relay library.
//!
//! Bridges the raw, pairwise collision batches of a physics engine to
//! entity-aware listeners. Each step the relay resolves every body pair to
//! the game objects that own the bodies, broadcasts the pairs, and fires the
//! listeners registered on either representation of either side.

pub mod collide;
pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
