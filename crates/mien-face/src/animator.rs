//! Face Animator - runs the face drivers in order, once per frame
//!
//! Order matters: blink first, then mouth, then emotions. Each driver only
//! writes its own channel group, so the order is observable only through
//! the per-frame events.

use mien_core::{Blender, Channel, ExpressionSet, FrameDelta, FrameTime};

use crate::{blend_emotions, BlinkConfig, BlinkCycle, BlinkEvent, EmotionTargets, MouthConfig, MouthCycler};

/// Capability to write expression weights on the avatar rig
/// The rig does not range-check; callers clamp before writing
pub trait ExpressionManager {
    /// Does the rig expose this expression?
    fn supports_expression(&self, name: &str) -> bool;

    /// Write an expression weight
    fn set_expression(&mut self, name: &str, value: f32);
}

/// External inputs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceInputs {
    pub speaking: bool,
    pub emotion: EmotionTargets,
}

/// What happened on the face during one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceFrame {
    pub blink: Option<BlinkEvent>,
    pub mouth_selected: Option<Channel>,
}

/// Procedural face state for one avatar
#[derive(Debug, Clone)]
pub struct FaceAnimator {
    blender: Blender,
    blink: BlinkCycle,
    mouth: MouthCycler,
    expressions: ExpressionSet,
}

impl FaceAnimator {
    pub fn new(blender: Blender, blink: BlinkConfig, mouth: MouthConfig, seed: Option<u64>) -> Self {
        FaceAnimator {
            blender,
            blink: BlinkCycle::new(blink),
            mouth: MouthCycler::new(mouth, seed),
            expressions: ExpressionSet::neutral(),
        }
    }

    /// Advance every face driver by one frame
    pub fn update(&mut self, now: FrameTime, delta: FrameDelta, inputs: &FaceInputs) -> FaceFrame {
        let blink = self
            .blink
            .update(now, delta, &self.blender, &mut self.expressions);

        let mouth_selected = self.mouth.update(
            inputs.speaking,
            now,
            delta,
            &self.blender,
            &mut self.expressions,
        );

        blend_emotions(&inputs.emotion, delta, &self.blender, &mut self.expressions);

        FaceFrame {
            blink,
            mouth_selected,
        }
    }

    /// Write every channel to the rig
    pub fn publish<M: ExpressionManager + ?Sized>(&self, manager: &mut M) {
        for (channel, value) in self.expressions.iter() {
            manager.set_expression(channel.name(), value);
        }
    }

    pub fn expressions(&self) -> &ExpressionSet {
        &self.expressions
    }

    pub fn blink(&self) -> &BlinkCycle {
        &self.blink
    }

    pub fn mouth(&self) -> &MouthCycler {
        &self.mouth
    }

    pub fn reseed(&mut self, seed: u64) {
        self.mouth.reseed(seed);
    }
}

impl Default for FaceAnimator {
    fn default() -> Self {
        Self::new(
            Blender::default(),
            BlinkConfig::default(),
            MouthConfig::default(),
            None,
        )
    }
}
