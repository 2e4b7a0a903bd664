//! Sunglobe Time - clock synchronization and projection
//!
//! This crate implements the time core:
//! - Local clocks (system and manually driven)
//! - Remote time sources (HTTP JSON service)
//! - The clock synchronizer, sole writer of the authoritative reading
//! - The time projector, which turns a reading into "now" on every frame
//! - The sync schedule that spaces refresh attempts

pub mod clock;
pub mod projector;
pub mod schedule;
pub mod source;
pub mod sync;

pub use clock::*;
pub use projector::*;
pub use schedule::*;
pub use source::*;
pub use sync::*;
