//! Speech Mouth-Shape Cycler
//!
//! While speaking, one mouth shape at a time is picked at random, held
//! open for a short window, released, and replaced once the reselect
//! window has passed. While silent, every mouth shape relaxes to zero.
//!
//! Windows are wall-clock durations, so the talking rhythm does not
//! depend on the render frame rate.

use mien_core::{Blender, Channel, ExpressionSet, FrameDelta, FrameTime, MienError, MienResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Mouth cycler configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouthConfig {
    /// Target weight of the selected shape while held
    pub open_weight: f32,
    /// Seconds after selection at which the shape is released
    pub release_after: f64,
    /// Seconds after selection at which a new shape may be drawn
    pub reselect_after: f64,
    /// Relative random spread applied to both windows per selection
    pub window_jitter: f64,
}

impl Default for MouthConfig {
    fn default() -> Self {
        // 12 and 24 frames at 60 fps
        MouthConfig {
            open_weight: 0.5,
            release_after: 0.2,
            reselect_after: 0.4,
            window_jitter: 0.25,
        }
    }
}

impl MouthConfig {
    pub fn validate(&self) -> MienResult<()> {
        if !(0.0..=1.0).contains(&self.open_weight) {
            return Err(MienError::InvalidConfig(format!(
                "mouth.open_weight must be within [0, 1], got {}",
                self.open_weight
            )));
        }
        if !(self.release_after.is_finite() && self.release_after > 0.0) {
            return Err(MienError::InvalidConfig(format!(
                "mouth.release_after must be positive, got {}",
                self.release_after
            )));
        }
        if !(self.reselect_after.is_finite() && self.reselect_after >= self.release_after) {
            return Err(MienError::InvalidConfig(format!(
                "mouth.reselect_after must be >= release_after, got {}",
                self.reselect_after
            )));
        }
        if !(0.0..1.0).contains(&self.window_jitter) {
            return Err(MienError::InvalidConfig(format!(
                "mouth.window_jitter must be within [0, 1), got {}",
                self.window_jitter
            )));
        }
        Ok(())
    }
}

/// Speech mouth-shape cycler
/// INVARIANT: at most one mouth channel has a nonzero target at any time
#[derive(Debug, Clone)]
pub struct MouthCycler {
    config: MouthConfig,
    /// Selected shape is still being held open
    holding: bool,
    /// Currently selected shape
    selected: Option<Channel>,
    /// When the current shape was selected
    last_select: FrameTime,
    /// Release window drawn for the current selection
    release_after: f64,
    /// Reselect window drawn for the current selection
    reselect_after: f64,
    /// Speaking flag seen on the last update
    speaking: bool,
    rng: StdRng,
}

impl MouthCycler {
    /// Create a cycler; `None` seeds from OS entropy
    pub fn new(config: MouthConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        MouthCycler {
            holding: false,
            selected: None,
            last_select: FrameTime::ZERO,
            release_after: config.release_after,
            reselect_after: config.reselect_after,
            speaking: false,
            config,
            rng,
        }
    }

    /// Restart the random sequence
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn selected(&self) -> Option<Channel> {
        self.selected
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Target a mouth channel is being driven toward
    pub fn target(&self, channel: Channel) -> f32 {
        if self.speaking && self.holding && self.selected == Some(channel) {
            self.config.open_weight
        } else {
            0.0
        }
    }

    /// Advance one frame and blend the mouth channels
    /// Returns the newly selected shape, if one was drawn this frame
    pub fn update(
        &mut self,
        speaking: bool,
        now: FrameTime,
        delta: FrameDelta,
        blender: &Blender,
        expressions: &mut ExpressionSet,
    ) -> Option<Channel> {
        self.speaking = speaking;
        let mut drawn = None;

        if speaking
            && (self.selected.is_none() || now.secs_since(self.last_select) > self.reselect_after)
        {
            drawn = Some(self.select(now));
        }

        for channel in Channel::MOUTH {
            let value = blender.step(expressions.get(channel), self.target(channel), delta);
            expressions.set(channel, value);
        }

        if speaking && self.holding && now.secs_since(self.last_select) > self.release_after {
            self.holding = false;
        }

        drawn
    }

    fn select(&mut self, now: FrameTime) -> Channel {
        let channel = Channel::MOUTH[self.rng.gen_range(0..Channel::MOUTH.len())];

        let jitter = self.config.window_jitter;
        let scale = if jitter > 0.0 {
            self.rng.gen_range(1.0 - jitter..=1.0 + jitter)
        } else {
            1.0
        };

        self.selected = Some(channel);
        self.last_select = now;
        self.holding = true;
        self.release_after = self.config.release_after * scale;
        self.reselect_after = self.config.reselect_after * scale;

        tracing::trace!(%channel, hold = self.release_after, "mouth shape selected");
        channel
    }
}
