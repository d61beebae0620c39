//! Mien Scene - What the avatar's body does and how it is framed
//!
//! - Clip selection: exactly one motion clip plays at a time, speech wins
//! - Auto-framing: camera and orbit target derived from the avatar's bounds

pub mod clip;
pub mod framing;

pub use clip::*;
pub use framing::*;
