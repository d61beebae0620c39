//! Mien Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout Mien:
//! - Expression channel registry (mouth, eyelid, emotion groups)
//! - Blend interpolator shared by every animated channel
//! - Frame time primitives (FrameTime, FrameDelta)
//! - Error taxonomy

pub mod blend;
pub mod channel;
pub mod error;
pub mod time;

pub use blend::*;
pub use channel::*;
pub use error::*;
pub use time::*;
