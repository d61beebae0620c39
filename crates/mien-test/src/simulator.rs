//! Frame Simulator - Drives a controller with synthetic render timing
//!
//! Simulates:
//! - Renderers with uneven frame pacing
//! - Frame stalls (tab switches, GC pauses, asset loads)
//! - Scripted speech, emotion and clip requests at fixed session times

use mien_core::{Channel, ExpressionSet, MienError, MienResult};
use mien_face::BlinkEvent;
use mien_runtime::{AvatarController, ControllerConfig, HeadlessRig};
use mien_scene::{BoundingBox, ClipLibrary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frame pacing model for a simulated renderer
#[derive(Clone, Debug)]
pub struct FrameJitter {
    /// Nominal frame rate
    pub fps: f64,
    /// Relative per-frame jitter (0.1 = +/-10%)
    pub jitter: f64,
    /// Probability that a frame stalls
    pub stall_chance: f64,
    /// Delta reported by a stalled frame (seconds)
    pub stall_secs: f64,
}

impl FrameJitter {
    pub fn new(fps: f64, jitter: f64) -> Self {
        FrameJitter {
            fps,
            jitter,
            stall_chance: 0.0,
            stall_secs: 0.0,
        }
    }

    /// Perfect 60 fps
    pub fn steady() -> Self {
        Self::new(60.0, 0.0)
    }

    /// 60 fps with noisy pacing
    pub fn uneven() -> Self {
        Self::new(60.0, 0.3)
    }

    /// 30 fps with occasional multi-second stalls
    pub fn stuttering() -> Self {
        FrameJitter {
            stall_chance: 0.01,
            stall_secs: 2.5,
            ..Self::new(30.0, 0.2)
        }
    }

    /// Every frame must move session time forward
    pub fn validate(&self) -> MienResult<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(MienError::InvalidConfig(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(MienError::InvalidConfig(format!(
                "jitter must be within [0, 1), got {}",
                self.jitter
            )));
        }
        if !(0.0..=1.0).contains(&self.stall_chance) || !(self.stall_secs >= 0.0) {
            return Err(MienError::InvalidConfig(
                "stall_chance must be within [0, 1] and stall_secs non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Draw the next raw frame delta (seconds)
    pub fn next_delta(&self, rng: &mut StdRng) -> f64 {
        if self.stall_chance > 0.0 && rng.gen_bool(self.stall_chance) {
            return self.stall_secs;
        }
        let base = 1.0 / self.fps;
        let scale = if self.jitter > 0.0 {
            rng.gen_range(1.0 - self.jitter..=1.0 + self.jitter)
        } else {
            1.0
        };
        base * scale
    }
}

/// Input change applied at a scripted session time
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptEvent {
    Speaking(bool),
    Emotion(Channel, f32),
    SelectClip(String),
    ResetView,
}

/// One recorded frame
#[derive(Clone, Debug)]
pub struct FrameSample {
    /// Session time after the frame (seconds)
    pub time: f64,
    /// Raw delta fed to the controller
    pub raw_delta: f64,
    /// Delta the controller actually applied
    pub delta: f64,
    pub speaking: bool,
    pub clip: String,
    pub expressions: ExpressionSet,
    pub blink: Option<BlinkEvent>,
    pub mouth_selected: Option<Channel>,
    /// Mouth channels with a nonzero target this frame
    pub mouth_targets: usize,
}

/// Recorded frames of one run
#[derive(Clone, Debug, Default)]
pub struct SimulationTrace {
    pub samples: Vec<FrameSample>,
}

impl SimulationTrace {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&FrameSample> {
        self.samples.last()
    }

    /// Session times at which the eyelids started closing
    pub fn blink_closures(&self) -> Vec<f64> {
        self.samples
            .iter()
            .filter(|s| s.blink == Some(BlinkEvent::Closed))
            .map(|s| s.time)
            .collect()
    }

    /// Mouth shapes drawn, in order
    pub fn mouth_shapes(&self) -> Vec<Channel> {
        self.samples.iter().filter_map(|s| s.mouth_selected).collect()
    }

    /// Distinct clips in the order they became active
    pub fn clip_sequence(&self) -> Vec<String> {
        let mut sequence: Vec<String> = Vec::new();
        for sample in &self.samples {
            if sequence.last() != Some(&sample.clip) {
                sequence.push(sample.clip.clone());
            }
        }
        sequence
    }

    /// Largest channel value seen across the run
    pub fn peak(&self, channel: Channel) -> f32 {
        self.samples
            .iter()
            .map(|s| s.expressions.get(channel))
            .fold(0.0, f32::max)
    }

    /// Every recorded value is finite and within [0, 1]
    pub fn values_in_range(&self) -> bool {
        self.samples.iter().all(|s| {
            s.expressions
                .iter()
                .all(|(_, v)| v.is_finite() && (0.0..=1.0).contains(&v))
        })
    }

    /// Frames in which speaking and the speaking clip disagreed
    pub fn speaking_clip_mismatches(&self, speaking_clip: &str) -> usize {
        self.samples
            .iter()
            .filter(|s| s.speaking != (s.clip == speaking_clip))
            .count()
    }
}

/// Controller plus synthetic renderer
pub struct FrameSimulator {
    controller: AvatarController<HeadlessRig>,
    jitter: FrameJitter,
    rng: StdRng,
    /// Pending events sorted by time
    script: Vec<(f64, ScriptEvent)>,
    elapsed: f64,
}

impl FrameSimulator {
    pub fn new(
        library: ClipLibrary,
        bounds: BoundingBox,
        config: ControllerConfig,
        jitter: FrameJitter,
        seed: u64,
    ) -> MienResult<Self> {
        jitter.validate()?;
        let rig = HeadlessRig::new(&library, bounds);
        let controller = AvatarController::new(rig, library, config)?;

        Ok(FrameSimulator {
            controller,
            jitter,
            rng: StdRng::seed_from_u64(seed),
            script: Vec::new(),
            elapsed: 0.0,
        })
    }

    /// Schedule an event at a session time (seconds)
    pub fn schedule(&mut self, at: f64, event: ScriptEvent) {
        let index = self.script.partition_point(|(t, _)| *t <= at);
        self.script.insert(index, (at, event));
    }

    /// Run for `duration` seconds of session time
    pub fn run(&mut self, duration: f64) -> MienResult<SimulationTrace> {
        let mut trace = SimulationTrace::default();
        let end = self.elapsed + duration;

        while self.elapsed < end {
            self.apply_due_events()?;

            let raw = self.jitter.next_delta(&mut self.rng);
            trace.samples.push(self.step(raw));
        }

        Ok(trace)
    }

    /// Feed the exact same raw delta every frame, ignoring the script
    pub fn run_fixed(&mut self, raw_delta: f64, frames: usize) -> SimulationTrace {
        SimulationTrace {
            samples: (0..frames).map(|_| self.step(raw_delta)).collect(),
        }
    }

    fn step(&mut self, raw: f64) -> FrameSample {
        let report = self.controller.update(raw);
        self.elapsed = report.now.as_secs_f64();

        let mouth = self.controller.face().mouth();
        FrameSample {
            time: self.elapsed,
            raw_delta: raw,
            delta: report.delta.as_secs_f64(),
            speaking: self.controller.inputs().is_speaking(),
            clip: self.controller.active_clip().to_string(),
            expressions: *self.controller.expressions(),
            blink: report.face.blink,
            mouth_selected: report.face.mouth_selected,
            mouth_targets: Channel::MOUTH
                .iter()
                .filter(|&&c| mouth.target(c) > 0.0)
                .count(),
        }
    }

    fn apply_due_events(&mut self) -> MienResult<()> {
        let due = self.script.partition_point(|(t, _)| *t <= self.elapsed);
        let events: Vec<_> = self.script.drain(..due).collect();
        for (_, event) in events {
            match event {
                ScriptEvent::Speaking(speaking) => self.controller.set_speaking(speaking),
                ScriptEvent::Emotion(channel, weight) => {
                    self.controller.inputs().set_emotion(channel, weight)?
                }
                ScriptEvent::SelectClip(name) => self.controller.select_clip(&name)?,
                ScriptEvent::ResetView => self.controller.reset_view()?,
            }
        }
        Ok(())
    }

    pub fn controller(&self) -> &AvatarController<HeadlessRig> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AvatarController<HeadlessRig> {
        &mut self.controller
    }

    /// Session time reached so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    #[test]
    fn test_steady_jitter_is_exact() {
        let jitter = FrameJitter::steady();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(jitter.next_delta(&mut rng), 1.0 / 60.0);
        }
    }

    #[test]
    fn test_uneven_jitter_bounds() {
        let jitter = FrameJitter::uneven();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let dt = jitter.next_delta(&mut rng);
            assert!(dt >= 0.7 / 60.0 - 1e-12 && dt <= 1.3 / 60.0 + 1e-12);
        }
    }

    #[test]
    fn test_rejects_stalled_renderers() {
        for jitter in [
            FrameJitter::new(0.0, 0.0),
            FrameJitter::new(-30.0, 0.0),
            FrameJitter::new(f64::NAN, 0.0),
            FrameJitter::new(60.0, 1.0),
        ] {
            let result = FrameSimulator::new(
                scenarios::default_roster(),
                scenarios::default_bounds(),
                ControllerConfig::default(),
                jitter,
                0,
            );
            assert!(matches!(result.err(), Some(MienError::InvalidConfig(_))));
        }

        assert!(FrameJitter::stuttering().validate().is_ok());
    }

    #[test]
    fn test_script_runs_in_order() {
        let mut sim = scenarios::steady(3).unwrap();
        sim.schedule(1.0, ScriptEvent::Speaking(false));
        sim.schedule(0.5, ScriptEvent::Speaking(true));

        let trace = sim.run(1.5).unwrap();
        let first_speaking = trace.samples.iter().position(|s| s.speaking).unwrap();
        let last_speaking = trace.samples.iter().rposition(|s| s.speaking).unwrap();

        assert!(trace.samples[first_speaking].time > 0.5);
        assert!(trace.samples[last_speaking].time <= 1.0 + 1.0 / 30.0);
        assert!(!trace.last().unwrap().speaking);
    }

    #[test]
    fn test_run_reaches_duration() {
        let mut sim = scenarios::steady(4).unwrap();
        sim.run(2.0).unwrap();
        assert!(sim.elapsed() >= 2.0);
        assert_eq!(sim.controller().stats().clamped_frames, 0);
    }

    #[test]
    fn test_bad_script_event_surfaces() {
        let mut sim = scenarios::steady(5).unwrap();
        sim.schedule(0.0, ScriptEvent::SelectClip("Moonwalk".to_string()));
        assert!(sim.run(0.1).is_err());
    }
}
