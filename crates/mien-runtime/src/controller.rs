//! Avatar Controller - per-frame driver for one avatar

use std::sync::Arc;

use mien_core::{Blender, Channel, ExpressionSet, FrameDelta, FrameTime, MienError, MienResult};
use mien_face::{BlinkEvent, FaceAnimator, FaceFrame, FaceInputs, TargetProvider};
use mien_scene::{ClipLibrary, ClipSelector, ClipTransition, FramingResult, OrbitCamera, ViewFramer};
use mien_time::FrameClock;

use crate::{AvatarRig, ControlInputs, ControllerConfig};

#[derive(Clone, Debug, Default)]
pub struct ControllerStats {
    pub frames: u64,
    pub clamped_frames: u64,
    pub blinks: u64,
    pub mouth_selections: u64,
    pub clip_switches: u64,
}

/// Result of one `update` call
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub now: FrameTime,
    pub delta: FrameDelta,
    pub face: FaceFrame,
    /// Inputs the frame was built from
    pub inputs: FaceInputs,
    /// Clip transition triggered by a speaking change this frame
    pub clip: Option<ClipTransition>,
}

/// Drives expressions, clips and framing for one avatar
pub struct AvatarController<R: AvatarRig> {
    rig: R,
    config: ControllerConfig,
    clock: FrameClock,
    face: FaceAnimator,
    clips: ClipSelector,
    framer: ViewFramer,
    inputs: ControlInputs,
    /// Overrides the emotion targets of the input handle
    targets: Option<Arc<dyn TargetProvider>>,
    /// Speaking flag the clip selector has already reacted to
    speaking: bool,
    stats: ControllerStats,
}

impl<R: AvatarRig> AvatarController<R> {
    /// Bind a controller to a loaded rig and its clips
    ///
    /// Fails if the rig lacks a registry expression or a library clip, or
    /// if the configured idle/speaking clips are missing. Starts the idle
    /// clip on success.
    pub fn new(mut rig: R, library: ClipLibrary, config: ControllerConfig) -> MienResult<Self> {
        config.validate()?;

        if let Some(channel) = Channel::ALL
            .iter()
            .find(|c| !rig.supports_expression(c.name()))
        {
            return Err(MienError::InvalidChannelName(channel.name().to_string()));
        }

        let available = rig.clip_names();
        if let Some(name) = library
            .names()
            .find(|n| !available.iter().any(|a| a.as_str() == *n))
        {
            return Err(MienError::MissingClip(name.to_string()));
        }

        let clips = ClipSelector::new(library, config.clips.clone())?;
        clips.initial().apply(&mut rig);

        let face = FaceAnimator::new(
            Blender::new(config.blend.gain),
            config.blink,
            config.mouth,
            config.seed,
        );
        let inputs = ControlInputs::new();

        tracing::info!(
            idle = %clips.active().name,
            clips = clips.library().len(),
            "avatar controller ready"
        );

        Ok(AvatarController {
            rig,
            clock: FrameClock::with_max_delta(config.max_frame_delta),
            face,
            clips,
            framer: ViewFramer::new(config.framing),
            targets: None,
            inputs,
            speaking: false,
            stats: ControllerStats::default(),
            config,
        })
    }

    /// Poll emotion targets from another source instead of the input handle
    pub fn with_target_provider(mut self, provider: Arc<dyn TargetProvider>) -> Self {
        self.targets = Some(provider);
        self
    }

    /// Handle for writers on other threads
    pub fn inputs(&self) -> ControlInputs {
        self.inputs.clone()
    }

    /// Per-frame entry point
    pub fn update(&mut self, delta_secs: f64) -> FrameReport {
        let delta = self.clock.advance(delta_secs);
        let now = self.clock.now();

        let snapshot = self.inputs.snapshot();
        let inputs = FaceInputs {
            speaking: snapshot.speaking,
            emotion: match &self.targets {
                Some(provider) => provider.emotion_targets(),
                None => snapshot.emotion,
            },
        };

        let clip = self.sync_speaking(inputs.speaking);

        let face = self.face.update(now, delta, &inputs);
        self.face.publish(&mut self.rig);

        self.clips.advance(delta.as_secs_f64());
        self.rig.update(delta.as_secs_f64());

        self.stats.frames += 1;
        self.stats.clamped_frames = self.clock.clamped_frames();
        if face.blink == Some(BlinkEvent::Closed) {
            self.stats.blinks += 1;
            tracing::trace!(?now, "blink");
        }
        if face.mouth_selected.is_some() {
            self.stats.mouth_selections += 1;
        }

        FrameReport {
            now,
            delta,
            face,
            inputs,
            clip,
        }
    }

    pub fn set_speaking(&self, speaking: bool) {
        self.inputs.set_speaking(speaking);
    }

    pub fn set_emotion_target(&self, name: &str, weight: f32) -> MienResult<()> {
        self.inputs.set_emotion_target(name, weight)
    }

    /// User clip selection
    /// The latest speaking signal is applied first, so speech wins even if
    /// it arrived after the last frame.
    pub fn select_clip(&mut self, name: &str) -> MienResult<()> {
        let speaking = self.inputs.is_speaking();
        self.sync_speaking(speaking);

        if let Some(transition) = self.clips.request(name)? {
            transition.apply(&mut self.rig);
            self.stats.clip_switches += 1;
        }
        Ok(())
    }

    /// Frame the avatar from its current geometry
    pub fn frame_avatar(&mut self) -> MienResult<FramingResult> {
        let bounds = self.rig.bounding_box();
        self.framer.frame(&bounds)
    }

    /// Re-frame if the avatar's geometry changed since the last framing
    pub fn refresh_framing(&mut self) -> MienResult<bool> {
        let bounds = self.rig.bounding_box();
        self.framer.refresh(&bounds)
    }

    /// Restore camera and orbit target to the initial framing
    /// Frames the avatar first if that never happened
    pub fn reset_view(&mut self) -> MienResult<()> {
        if self.framer.reset_view().is_none() {
            self.frame_avatar()?;
        }
        Ok(())
    }

    pub fn framing(&self) -> Option<&FramingResult> {
        self.framer.initial()
    }

    pub fn orbit_camera(&self) -> &OrbitCamera {
        self.framer.camera()
    }

    pub fn orbit_camera_mut(&mut self) -> &mut OrbitCamera {
        self.framer.camera_mut()
    }

    pub fn expressions(&self) -> &ExpressionSet {
        self.face.expressions()
    }

    pub fn face(&self) -> &FaceAnimator {
        &self.face
    }

    pub fn active_clip(&self) -> &str {
        &self.clips.active().name
    }

    pub fn playback_position(&self) -> f64 {
        self.clips.position()
    }

    pub fn now(&self) -> FrameTime {
        self.clock.now()
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    /// Restart the mouth-shape random sequence
    pub fn reseed(&mut self, seed: u64) {
        self.face.reseed(seed);
    }

    /// Stop the active clip and hand the rig back
    pub fn shutdown(mut self) -> R {
        let active = self.clips.active().name.clone();
        self.rig.stop(&active);
        tracing::info!(frames = self.stats.frames, "avatar controller shut down");
        self.rig
    }

    fn sync_speaking(&mut self, speaking: bool) -> Option<ClipTransition> {
        if speaking == self.speaking {
            return None;
        }
        self.speaking = speaking;

        let transition = self.clips.set_speaking(speaking)?;
        transition.apply(&mut self.rig);
        self.stats.clip_switches += 1;
        Some(transition)
    }
}
