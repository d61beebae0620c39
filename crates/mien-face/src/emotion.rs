//! Emotion Blend Pass - emotion channels follow external targets
//!
//! Targets are owned by whoever drives the avatar (a UI panel, a chat
//! sentiment model, ...). The face only ever READS them, through a
//! TargetProvider polled once per frame.

use mien_core::{unit, Blender, Channel, ExpressionSet, FrameDelta, MienError, MienResult};
use serde::{Deserialize, Serialize};

/// Target weights for the emotion channels [0.0 - 1.0]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionTargets {
    pub happy: f32,
    pub angry: f32,
    pub sad: f32,
    pub relaxed: f32,
    pub surprised: f32,
}

impl EmotionTargets {
    /// No emotion
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Target for an emotion channel (0 for any other channel)
    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Happy => self.happy,
            Channel::Angry => self.angry,
            Channel::Sad => self.sad,
            Channel::Relaxed => self.relaxed,
            Channel::Surprised => self.surprised,
            _ => 0.0,
        }
    }

    /// Set a target, clamped to [0, 1]
    /// Only externally driven channels accept targets
    pub fn set(&mut self, channel: Channel, weight: f32) -> MienResult<()> {
        if !channel.is_externally_driven() {
            return Err(MienError::ChannelNotDrivable(channel));
        }
        if let Some(slot) = self.slot_mut(channel) {
            *slot = unit(weight);
        }
        Ok(())
    }

    fn slot_mut(&mut self, channel: Channel) -> Option<&mut f32> {
        match channel {
            Channel::Happy => Some(&mut self.happy),
            Channel::Angry => Some(&mut self.angry),
            Channel::Sad => Some(&mut self.sad),
            Channel::Relaxed => Some(&mut self.relaxed),
            Channel::Surprised => Some(&mut self.surprised),
            _ => None,
        }
    }

    /// Set a target by channel name
    pub fn set_named(&mut self, name: &str, weight: f32) -> MienResult<()> {
        self.set(Channel::from_name(name)?, weight)
    }

    /// Copy with every weight forced into [0, 1]
    pub fn sanitized(&self) -> EmotionTargets {
        EmotionTargets {
            happy: unit(self.happy),
            angry: unit(self.angry),
            sad: unit(self.sad),
            relaxed: unit(self.relaxed),
            surprised: unit(self.surprised),
        }
    }
}

/// Read-only source of emotion targets
pub trait TargetProvider: Send + Sync {
    /// Snapshot of the current targets
    fn emotion_targets(&self) -> EmotionTargets;
}

impl TargetProvider for EmotionTargets {
    fn emotion_targets(&self) -> EmotionTargets {
        *self
    }
}

/// Blend every emotion channel toward its target for one frame
pub fn blend_emotions(
    targets: &EmotionTargets,
    delta: FrameDelta,
    blender: &Blender,
    expressions: &mut ExpressionSet,
) {
    let targets = targets.sanitized();
    for channel in Channel::EMOTION {
        let value = blender.step(expressions.get(channel), targets.get(channel), delta);
        expressions.set(channel, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut targets = EmotionTargets::neutral();
        targets.set(Channel::Happy, 0.8).unwrap();
        targets.set_named("Surprised", 2.0).unwrap();

        assert_eq!(targets.get(Channel::Happy), 0.8);
        assert_eq!(targets.surprised, 1.0);
        assert_eq!(targets.get(Channel::Aa), 0.0);
    }

    #[test]
    fn test_rejects_internal_channels() {
        let mut targets = EmotionTargets::neutral();
        assert_eq!(
            targets.set(Channel::BlinkLeft, 1.0),
            Err(MienError::ChannelNotDrivable(Channel::BlinkLeft))
        );
        assert_eq!(
            targets.set_named("smirk", 1.0),
            Err(MienError::InvalidChannelName("smirk".to_string()))
        );
    }

    #[test]
    fn test_every_external_channel_is_settable() {
        let mut targets = EmotionTargets::neutral();
        for channel in Channel::ALL {
            let result = targets.set(channel, 0.4);
            assert_eq!(result.is_ok(), channel.is_externally_driven());
        }
        for channel in Channel::EMOTION {
            assert_eq!(targets.get(channel), 0.4);
        }
    }

    #[test]
    fn test_blend_toward_targets() {
        let blender = Blender::default();
        let delta = FrameDelta::from_secs(1.0 / 60.0);
        let mut expressions = ExpressionSet::neutral();
        let targets = EmotionTargets {
            happy: 1.0,
            ..Default::default()
        };

        for _ in 0..60 {
            blend_emotions(&targets, delta, &blender, &mut expressions);
        }

        assert!(expressions.get(Channel::Happy) > 0.99);
        assert_eq!(expressions.get(Channel::Sad), 0.0);
        // Non-emotion channels are untouched
        assert_eq!(expressions.get(Channel::Aa), 0.0);
    }

    #[test]
    fn test_blend_sanitizes_raw_targets() {
        let blender = Blender::default();
        let mut expressions = ExpressionSet::neutral();
        let targets = EmotionTargets {
            angry: f32::INFINITY,
            sad: -4.0,
            ..Default::default()
        };

        blend_emotions(&targets, FrameDelta::from_secs(0.1), &blender, &mut expressions);

        assert_eq!(expressions.get(Channel::Angry), 0.0);
        assert_eq!(expressions.get(Channel::Sad), 0.0);
    }
}
