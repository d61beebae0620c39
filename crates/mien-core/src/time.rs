//! Time primitives for Mien
//!
//! - FrameTime: monotonic session time, integer microseconds since start
//! - FrameDelta: sanitized elapsed seconds for one rendered frame

use std::ops::{Add, Sub};
use std::time::Duration;

/// Default upper bound for a single frame delta (seconds)
pub const DEFAULT_MAX_FRAME_DELTA: f64 = 0.1;

/// Monotonic session time
/// Represented as microseconds since the controller was created
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameTime(pub i64);

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        FrameTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        FrameTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        FrameTime((secs * 1_000_000.0) as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Seconds elapsed since `earlier` (zero if `earlier` is in the future)
    #[inline]
    pub fn secs_since(self, earlier: FrameTime) -> f64 {
        (self.0.saturating_sub(earlier.0)).max(0) as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, delta: FrameDelta) -> Self {
        FrameTime(self.0.saturating_add(delta.as_micros()))
    }
}

impl Add<FrameDelta> for FrameTime {
    type Output = FrameTime;

    #[inline]
    fn add(self, rhs: FrameDelta) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for FrameTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: FrameTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0).max(0) as u64)
    }
}

impl std::fmt::Debug for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{:.3}s", self.as_secs_f64())
    }
}

/// Elapsed time for one frame, in seconds
/// INVARIANT: finite and within [0, max_frame_delta]
#[derive(Clone, Copy, PartialEq, PartialOrd, Default, Debug)]
pub struct FrameDelta(f64);

impl FrameDelta {
    pub const ZERO: FrameDelta = FrameDelta(0.0);

    /// Sanitize with the default cap
    #[inline]
    pub fn from_secs(secs: f64) -> Self {
        Self::clamped(secs, DEFAULT_MAX_FRAME_DELTA)
    }

    /// Sanitize an untrusted delta: negative or non-finite input becomes
    /// zero, anything above `max` is capped.
    pub fn clamped(secs: f64, max: f64) -> Self {
        let max = if max.is_finite() && max > 0.0 { max } else { DEFAULT_MAX_FRAME_DELTA };
        if !secs.is_finite() || secs <= 0.0 {
            return FrameDelta::ZERO;
        }
        FrameDelta(secs.min(max))
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        (self.0 * 1_000_000.0).round() as i64
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}
