//! Sunglobe Runtime - frame loop orchestration
//!
//! Every frame the driver:
//! 1. Applies finished sync reports to the clock state
//! 2. Starts a background sync if one is due
//! 3. Projects the zone clock
//! 4. Derives the sun light for the renderer
//! 5. Hands the frame to a sink

pub mod driver;
pub mod sink;
pub mod telemetry;

pub use driver::*;
pub use sink::*;
pub use telemetry::*;
