//! Predefined avatar sessions and the behavioral checks run against them

use mien_core::{Channel, MienResult};
use mien_runtime::ControllerConfig;
use mien_scene::{AnimationClip, BoundingBox, ClipLibrary, Vec3};

use crate::simulator::{FrameJitter, FrameSimulator, ScriptEvent};

/// Clips shipped with the reference avatar
pub fn default_roster() -> ClipLibrary {
    [
        AnimationClip::new("Breathing", 4.0),
        AnimationClip::new("Fireball", 2.5),
        AnimationClip::new("Hip Hop Dancing", 8.0),
        AnimationClip::new("Talking", 6.0),
    ]
    .into_iter()
    .collect()
}

/// Roughly human-sized bounds standing on the origin
pub fn default_bounds() -> BoundingBox {
    BoundingBox::new(Vec3::new(0.0, 0.9, 0.0), Vec3::new(0.6, 1.8, 0.4))
}

fn seeded(seed: u64) -> ControllerConfig {
    ControllerConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

/// Idle avatar at a perfect 60 fps
pub fn steady(seed: u64) -> MienResult<FrameSimulator> {
    FrameSimulator::new(
        default_roster(),
        default_bounds(),
        seeded(seed),
        FrameJitter::steady(),
        seed,
    )
}

/// Idle avatar with noisy frame pacing
pub fn uneven(seed: u64) -> MienResult<FrameSimulator> {
    FrameSimulator::new(
        default_roster(),
        default_bounds(),
        seeded(seed),
        FrameJitter::uneven(),
        seed,
    )
}

/// Idle avatar on a renderer that stalls now and then
pub fn stuttering(seed: u64) -> MienResult<FrameSimulator> {
    FrameSimulator::new(
        default_roster(),
        default_bounds(),
        seeded(seed),
        FrameJitter::stuttering(),
        seed,
    )
}

/// Eleven seconds of chat:
/// - 1.0 to 4.0 speaking, happy from 1.0
/// - 5.0 user picks Fireball
/// - 6.0 to 8.0 speaking, user picks Hip Hop Dancing at 7.0
/// - 9.0 happy cleared
pub fn conversation(seed: u64) -> MienResult<FrameSimulator> {
    let mut sim = uneven(seed)?;
    sim.schedule(1.0, ScriptEvent::Speaking(true));
    sim.schedule(1.0, ScriptEvent::Emotion(Channel::Happy, 0.8));
    sim.schedule(4.0, ScriptEvent::Speaking(false));
    sim.schedule(5.0, ScriptEvent::SelectClip("Fireball".to_string()));
    sim.schedule(6.0, ScriptEvent::Speaking(true));
    sim.schedule(7.0, ScriptEvent::SelectClip("Hip Hop Dancing".to_string()));
    sim.schedule(8.0, ScriptEvent::Speaking(false));
    sim.schedule(9.0, ScriptEvent::Emotion(Channel::Happy, 0.0));
    Ok(sim)
}

/// Length of the conversation script plus settle time
pub const CONVERSATION_SECS: f64 = 11.0;
