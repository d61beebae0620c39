//! Mien Time - Frame clocks
//!
//! This crate implements the clocks that feed the controller:
//! - FrameClock: accumulates sanitized render deltas into monotonic session time
//! - RealtimeClock: measures wall-clock deltas for drivers without a render clock

pub mod clock;

pub use clock::*;
