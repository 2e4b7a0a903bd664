//! Sunglobe Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by the clock and scene crates:
//! - Time primitives (LocalTime, ZoneTime)
//! - The fixed target zone and its fallback reinterpretation
//! - Authoritative readings and the owned clock state
//! - Display locales
//! - Error types

pub mod error;
pub mod format;
pub mod reading;
pub mod time;
pub mod zone;

pub use error::*;
pub use format::*;
pub use reading::*;
pub use time::*;
pub use zone::*;
