//! Relay systems.
//!
//! Submodules overview
//! - [`contacts`] – reference contact generator standing in for a physics engine
//! - [`dispatch`] – drain collision batches and fire broadcasts and listeners
//! - [`pairresolver`] – root body and game object resolution

pub mod contacts;
pub mod dispatch;
pub mod pairresolver;
