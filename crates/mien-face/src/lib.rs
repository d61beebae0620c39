//! Mien Face - Procedural facial expression
//!
//! The face is NOT keyframed. Every channel is moved toward a target each
//! frame, and the targets come from three independent drivers:
//!
//! - Blink cycle: periodic eyelid closure, no external input
//! - Mouth cycler: random mouth shapes while speaking, relaxed when silent
//! - Emotion pass: follows externally supplied emotion weights
//!
//! The FaceAnimator runs them in that order once per frame.

pub mod animator;
pub mod blink;
pub mod emotion;
pub mod mouth;

pub use animator::*;
pub use blink::*;
pub use emotion::*;
pub use mouth::*;
