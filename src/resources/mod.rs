//! ECS resources.
//!
//! Overview
//! - `listeners` – the targeted listener registry, one map per collision kind
//! - `physicsworld` – the physics engine handle: subscriptions and queued batches
//! - `relay` – lifecycle state of the relay
//! - `relayconfig` – INI-backed settings
pub mod listeners;
pub mod physicsworld;
pub mod relay;
pub mod relayconfig;
