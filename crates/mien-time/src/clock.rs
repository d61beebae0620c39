//! Clock implementations for Mien

use std::time::{Duration, Instant};

use mien_core::{FrameDelta, FrameTime, DEFAULT_MAX_FRAME_DELTA};

/// Frame clock - monotonic, driven by externally supplied deltas
/// INVARIANT: now() MUST be monotonically non-decreasing, NEVER jumps
/// by more than max_delta per frame
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Current session time
    now: FrameTime,
    /// Frames advanced so far
    frames: u64,
    /// Largest delta accepted per frame
    max_delta: f64,
    /// Frames whose raw delta had to be clamped
    clamped_frames: u64,
}

impl FrameClock {
    /// Create a new frame clock starting at zero
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_FRAME_DELTA)
    }

    pub fn with_max_delta(max_delta: f64) -> Self {
        FrameClock {
            now: FrameTime::ZERO,
            frames: 0,
            max_delta,
            clamped_frames: 0,
        }
    }

    /// Advance by an untrusted raw delta (seconds)
    /// Returns the sanitized delta that was actually applied
    pub fn advance(&mut self, raw_secs: f64) -> FrameDelta {
        let delta = FrameDelta::clamped(raw_secs, self.max_delta);

        if delta.as_secs_f64() != raw_secs {
            self.clamped_frames += 1;
            tracing::debug!(
                raw = raw_secs,
                applied = delta.as_secs_f64(),
                "clamped frame delta"
            );
        }

        self.now = self.now + delta;
        self.frames += 1;
        delta
    }

    /// Current session time without advancing
    pub fn now(&self) -> FrameTime {
        self.now
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clamped_frames(&self) -> u64 {
        self.clamped_frames
    }

    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Realtime clock - measures wall-clock time between ticks
/// For frame drivers that have no render clock of their own
#[derive(Debug)]
pub struct RealtimeClock {
    /// Clock creation instant
    reference: Instant,
    /// Last tick instant
    last_tick: Instant,
}

impl RealtimeClock {
    pub fn new() -> Self {
        let now = Instant::now();
        RealtimeClock {
            reference: now,
            last_tick: now,
        }
    }

    /// Seconds since the previous tick
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        elapsed.as_secs_f64()
    }

    /// Wall-clock time since creation
    pub fn elapsed(&self) -> Duration {
        self.reference.elapsed()
    }
}

impl Default for RealtimeClock {
    fn default() -> Self {
        Self::new()
    }
}
