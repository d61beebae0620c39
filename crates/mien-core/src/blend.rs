//! Blend interpolator - time-step-aware approach toward a target
//!
//! Every animated channel moves toward its target by a fraction of the
//! remaining distance. The fraction is `delta * gain`, clamped to [0, 1].

use crate::FrameDelta;

/// Default blend gain (fraction of remaining distance per second)
pub const DEFAULT_BLEND_GAIN: f32 = 12.0;

/// Move `current` toward `target` by blend factor `rate`.
///
/// INVARIANT: result lies between `current` and `target` inclusive,
/// and equals `target` exactly once `rate >= 1`.
#[inline]
pub fn blend(current: f32, target: f32, rate: f32) -> f32 {
    let t = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };

    if t >= 1.0 {
        return target;
    }

    let value = current + (target - current) * t;
    // Rounding must never push the result past either endpoint
    value.clamp(current.min(target), current.max(target))
}

/// Blend gain bound to the per-frame delta
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blender {
    gain: f32,
}

impl Blender {
    pub fn new(gain: f32) -> Self {
        let gain = if gain.is_finite() { gain.max(0.0) } else { DEFAULT_BLEND_GAIN };
        Self { gain }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Blend factor for one frame
    #[inline]
    pub fn rate(&self, delta: FrameDelta) -> f32 {
        (delta.as_secs_f32() * self.gain).clamp(0.0, 1.0)
    }

    /// Blend one value for one frame
    #[inline]
    pub fn step(&self, current: f32, target: f32, delta: FrameDelta) -> f32 {
        blend(current, target, self.rate(delta))
    }
}

impl Default for Blender {
    fn default() -> Self {
        Self::new(DEFAULT_BLEND_GAIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blend_halfway() {
        assert!((blend(0.0, 1.0, 0.5) - 0.5).abs() < f32::EPSILON);
        assert!((blend(1.0, 0.0, 0.25) - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blend_snaps_above_one() {
        assert_eq!(blend(0.2, 0.9, 1.0), 0.9);
        assert_eq!(blend(0.2, 0.9, 3.5), 0.9);
    }

    #[test]
    fn test_blend_ignores_bad_rate() {
        assert_eq!(blend(0.4, 1.0, f32::NAN), 0.4);
        assert_eq!(blend(0.4, 1.0, -2.0), 0.4);
    }

    #[test]
    fn test_blender_rate() {
        let blender = Blender::default();
        let rate = blender.rate(FrameDelta::from_secs(1.0 / 60.0));
        assert!((rate - 0.2).abs() < 1e-6);

        // Long frame saturates
        assert_eq!(blender.rate(FrameDelta::from_secs(0.1)), 1.0);
    }

    #[test]
    fn test_blender_converges() {
        let blender = Blender::default();
        let dt = FrameDelta::from_secs(1.0 / 60.0);
        let mut value = 0.0;

        for _ in 0..60 {
            value = blender.step(value, 1.0, dt);
        }

        assert!(value > 0.999);
        assert!(value <= 1.0);
    }

    proptest! {
        #[test]
        fn blend_stays_between_endpoints(
            current in 0.0f32..=1.0,
            target in 0.0f32..=1.0,
            rate in 0.0f32..=1.0,
        ) {
            let value = blend(current, target, rate);
            prop_assert!(value >= current.min(target));
            prop_assert!(value <= current.max(target));
        }

        #[test]
        fn blend_is_monotonic_in_rate(
            current in 0.0f32..=1.0,
            target in 0.0f32..=1.0,
            a in 0.0f32..=1.0,
            b in 0.0f32..=1.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let near = (blend(current, target, lo) - current).abs();
            let far = (blend(current, target, hi) - current).abs();
            prop_assert!(near <= far + f32::EPSILON);
        }

        #[test]
        fn blend_at_full_rate_is_target(current in 0.0f32..=1.0, target in 0.0f32..=1.0) {
            prop_assert_eq!(blend(current, target, 1.0), target);
        }
    }
}
