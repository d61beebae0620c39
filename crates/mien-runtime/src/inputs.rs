//! External control inputs
//!
//! The speaking flag and emotion targets are written by other parts of the
//! application (chat streaming, UI sliders) at arbitrary times. Writers share
//! a cloneable handle; the controller takes ONE snapshot per frame so a frame
//! never sees half of an update.

use std::sync::Arc;

use mien_core::{Channel, MienResult};
use mien_face::EmotionTargets;
use parking_lot::RwLock;

/// Inputs as seen by one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    pub speaking: bool,
    pub emotion: EmotionTargets,
}

/// Shared, cloneable input handle
#[derive(Debug, Clone, Default)]
pub struct ControlInputs {
    state: Arc<RwLock<InputSnapshot>>,
}

impl ControlInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_speaking(&self, speaking: bool) {
        self.state.write().speaking = speaking;
    }

    pub fn is_speaking(&self) -> bool {
        self.state.read().speaking
    }

    /// Set one emotion target by name
    pub fn set_emotion_target(&self, name: &str, weight: f32) -> MienResult<()> {
        let channel = Channel::from_name(name)?;
        self.set_emotion(channel, weight)
    }

    pub fn set_emotion(&self, channel: Channel, weight: f32) -> MienResult<()> {
        self.state.write().emotion.set(channel, weight)
    }

    /// Replace every emotion target at once
    pub fn set_emotion_targets(&self, targets: EmotionTargets) {
        self.state.write().emotion = targets.sanitized();
    }

    /// Change several inputs under one lock
    /// Emotion weights are clamped afterwards
    pub fn apply(&self, change: impl FnOnce(&mut InputSnapshot)) {
        let mut state = self.state.write();
        change(&mut *state);
        state.emotion = state.emotion.sanitized();
    }

    /// Consistent copy of every input
    pub fn snapshot(&self) -> InputSnapshot {
        *self.state.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mien_core::MienError;
    use std::thread;

    #[test]
    fn test_handles_share_state() {
        let inputs = ControlInputs::new();
        let writer = inputs.clone();

        writer.set_speaking(true);
        writer.set_emotion_target("happy", 0.6).unwrap();

        let snapshot = inputs.snapshot();
        assert!(snapshot.speaking);
        assert_eq!(snapshot.emotion.happy, 0.6);
    }

    #[test]
    fn test_rejects_bad_channels() {
        let inputs = ControlInputs::new();
        assert_eq!(
            inputs.set_emotion_target("grumpy", 0.5),
            Err(MienError::InvalidChannelName("grumpy".to_string()))
        );
        assert_eq!(
            inputs.set_emotion_target("aa", 0.5),
            Err(MienError::ChannelNotDrivable(Channel::Aa))
        );
    }

    #[test]
    fn test_bulk_targets_are_clamped() {
        let inputs = ControlInputs::new();
        inputs.set_emotion_targets(EmotionTargets {
            sad: 3.0,
            angry: -1.0,
            ..Default::default()
        });

        let targets = inputs.snapshot().emotion;
        assert_eq!(targets.sad, 1.0);
        assert_eq!(targets.angry, 0.0);
    }

    #[test]
    fn test_apply_changes_together() {
        let inputs = ControlInputs::new();
        inputs.apply(|state| {
            state.speaking = true;
            state.emotion.angry = 7.0;
        });

        let snapshot = inputs.snapshot();
        assert!(snapshot.speaking);
        assert_eq!(snapshot.emotion.angry, 1.0);
    }

    #[test]
    fn test_snapshots_are_never_torn() {
        let inputs = ControlInputs::new();
        let writer = inputs.clone();

        let handle = thread::spawn(move || {
            for i in 0..2000 {
                let w = (i % 2) as f32;
                writer.set_emotion_targets(EmotionTargets {
                    happy: w,
                    sad: w,
                    ..Default::default()
                });
            }
        });

        for _ in 0..2000 {
            let snapshot = inputs.snapshot();
            assert_eq!(snapshot.emotion.happy, snapshot.emotion.sad);
        }

        handle.join().unwrap();
    }
}
