//! Mien Test Harness - Frame simulation and behavioral validation
//!
//! This crate provides:
//! - Synthetic renderers with steady, uneven and stalling frame pacing
//! - Scripted avatar sessions (speech bursts, emotions, clip requests)
//! - Frame traces for checking blink, mouth, clip and framing behavior

pub mod scenarios;
pub mod simulator;

pub use scenarios::*;
pub use simulator::*;
