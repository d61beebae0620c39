//! Blink Cycle - autonomous periodic eyelid closure
//!
//! Modeled as a single `closed` flag with a timer, not discrete sub-states:
//! the lid target is 1 while closed and 0 otherwise, and the blend
//! interpolator produces the actual closing/opening motion.

use mien_core::{Blender, Channel, ExpressionSet, FrameDelta, FrameTime, MienError, MienResult};
use serde::{Deserialize, Serialize};

/// Blink timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Seconds between the starts of two blinks
    pub period: f64,
    /// Seconds the closed target is held before reopening
    pub close_hold: f64,
    /// Start in the closed state (blink once on load)
    pub initially_closed: bool,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        BlinkConfig {
            period: 5.0,
            close_hold: 0.4,
            initially_closed: true,
        }
    }
}

impl BlinkConfig {
    pub fn validate(&self) -> MienResult<()> {
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(MienError::InvalidConfig(format!(
                "blink.period must be positive, got {}",
                self.period
            )));
        }
        if !(self.close_hold.is_finite() && self.close_hold > 0.0 && self.close_hold < self.period) {
            return Err(MienError::InvalidConfig(format!(
                "blink.close_hold must be within (0, period), got {}",
                self.close_hold
            )));
        }
        Ok(())
    }
}

/// Blink transitions reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkEvent {
    /// Lids started closing this frame
    Closed,
    /// Lids started reopening this frame
    Opened,
}

/// Blink state machine
/// INVARIANT: `closed` becomes true only when more than `period` has
/// passed since the last toggle, and always clears `close_hold` later
#[derive(Debug, Clone)]
pub struct BlinkCycle {
    config: BlinkConfig,
    closed: bool,
    last_toggle: FrameTime,
}

impl BlinkCycle {
    pub fn new(config: BlinkConfig) -> Self {
        BlinkCycle {
            closed: config.initially_closed,
            last_toggle: FrameTime::ZERO,
            config,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn last_toggle(&self) -> FrameTime {
        self.last_toggle
    }

    /// Lid target for this frame
    pub fn target(&self) -> f32 {
        if self.closed {
            1.0
        } else {
            0.0
        }
    }

    /// Advance one frame and blend both eyelid channels
    pub fn update(
        &mut self,
        now: FrameTime,
        delta: FrameDelta,
        blender: &Blender,
        expressions: &mut ExpressionSet,
    ) -> Option<BlinkEvent> {
        let mut event = None;

        if now.secs_since(self.last_toggle) > self.config.period {
            self.last_toggle = now;
            self.closed = true;
            event = Some(BlinkEvent::Closed);
        }

        let target = self.target();
        for channel in Channel::EYELID {
            let value = blender.step(expressions.get(channel), target, delta);
            expressions.set(channel, value);
        }

        if self.closed && now.secs_since(self.last_toggle) > self.config.close_hold {
            self.closed = false;
            event = Some(BlinkEvent::Opened);
        }

        event
    }
}

impl Default for BlinkCycle {
    fn default() -> Self {
        Self::new(BlinkConfig::default())
    }
}
