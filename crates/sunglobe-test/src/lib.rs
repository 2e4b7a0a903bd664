//! Sunglobe Test - simulation harness for the clock core
//!
//! - Remote clock models with drift relative to the local clock
//! - A time service with latency, loss and malformed replies
//! - A sync simulator that measures tracking error and jumps

pub mod service;
pub mod simulator;

pub use service::*;
pub use simulator::*;
