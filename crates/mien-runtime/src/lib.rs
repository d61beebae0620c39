//! Mien Runtime - Avatar controller and frame loop
//!
//! Each rendered frame the controller runs, in order:
//! 1. Sanitize the frame delta and advance the frame clock
//! 2. Snapshot the external inputs (speaking flag, emotion targets)
//! 3. Switch clips if the speaking flag changed
//! 4. Blink cycle
//! 5. Speech mouth-shape cycler
//! 6. Emotion blend pass
//! 7. Publish expression weights to the rig
//! 8. Advance clip playback and the rig's pose
//!
//! Framing runs only when geometry becomes available or on reset.

pub mod config;
pub mod controller;
pub mod inputs;
pub mod rig;
pub mod telemetry;

pub use config::*;
pub use controller::*;
pub use inputs::*;
pub use rig::*;
pub use telemetry::*;
