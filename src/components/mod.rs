//! ECS components.
//!
//! Submodules overview:
//! - [`body`] – raw rigid bodies, their owners and game objects exposing a body
//! - [`boxcollider`] – axis-aligned rectangular collider used by the reference contact generator
//! - [`mapposition`] – world-space position
//! - [`tile`] – tiles and the lightweight wrapper that gives a tile a body
//! - [`velocity`] – per-step linear velocity

pub mod body;
pub mod boxcollider;
pub mod mapposition;
pub mod tile;
pub mod velocity;
