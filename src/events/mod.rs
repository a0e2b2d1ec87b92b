//! Event types and observers.
//!
//! Submodules:
//! - [`collision`] – collision pairs, callback data and the broadcast events
//! - [`lifecycle`] – host scene start/shutdown/destroy events and the relay's observers
pub mod collision;
pub mod lifecycle;
