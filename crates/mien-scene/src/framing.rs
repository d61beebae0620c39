//! Camera auto-framing
//!
//! The camera is placed once from the avatar's bounding box so the whole
//! body fits vertically, whatever the avatar's scale. The result is cached
//! as the initial view; user orbit/zoom/pan only moves the OrbitCamera and
//! `reset_view` restores the cached framing.

use mien_core::{MienError, MienResult};
use serde::{Deserialize, Serialize};

/// 3D vector in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, factor: f32) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance to another point
    pub fn distance(&self, other: &Vec3) -> f32 {
        self.sub(other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center: Vec3,
    pub size: Vec3,
}

impl BoundingBox {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: min.add(&max).scale(0.5),
            size: max.sub(&min),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center.sub(&self.size.scale(0.5))
    }

    pub fn max(&self) -> Vec3 {
        self.center.add(&self.size.scale(0.5))
    }

    /// A box that cannot be framed: non-finite, inverted, or without height
    pub fn is_degenerate(&self) -> bool {
        !self.center.is_finite()
            || !self.size.is_finite()
            || self.size.x < 0.0
            || self.size.z < 0.0
            || self.size.y <= f32::EPSILON
    }
}

/// Capability to query the avatar's current world-space bounds
pub trait GeometrySource {
    fn bounding_box(&self) -> BoundingBox;
}

/// Perspective lens parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLens {
    /// Vertical field of view (degrees)
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        CameraLens {
            fov_deg: 15.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraLens {
    pub fn fov_rad(&self) -> f32 {
        self.fov_deg.to_radians()
    }
}

/// Framing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub lens: CameraLens,
    pub light_intensity: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        FramingConfig {
            lens: CameraLens::default(),
            light_intensity: 3.0,
        }
    }
}

impl FramingConfig {
    pub fn validate(&self) -> MienResult<()> {
        let lens = &self.lens;
        if !(lens.fov_deg.is_finite() && lens.fov_deg > 0.0 && lens.fov_deg < 180.0) {
            return Err(MienError::InvalidConfig(format!(
                "framing.lens.fov_deg must be within (0, 180), got {}",
                lens.fov_deg
            )));
        }
        if !(lens.near > 0.0 && lens.far > lens.near && lens.aspect > 0.0) {
            return Err(MienError::InvalidConfig(
                "framing.lens requires 0 < near < far and aspect > 0".to_string(),
            ));
        }
        if !(self.light_intensity.is_finite() && self.light_intensity >= 0.0) {
            return Err(MienError::InvalidConfig(format!(
                "framing.light_intensity must be >= 0, got {}",
                self.light_intensity
            )));
        }
        Ok(())
    }
}

/// Directional key light placed with the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLight {
    pub position: Vec3,
    pub target: Vec3,
    pub intensity: f32,
}

/// Framing derived from one bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingResult {
    pub camera: Vec3,
    pub orbit_target: Vec3,
    /// Distance at which the full height fits the vertical fov
    pub distance: f32,
    pub light: KeyLight,
    pub lens: CameraLens,
    pub bounds: BoundingBox,
}

/// Compute camera, orbit target and key light for a bounding box
pub fn compute_framing(bounds: &BoundingBox, config: &FramingConfig) -> MienResult<FramingResult> {
    if bounds.is_degenerate() {
        return Err(MienError::DegenerateBoundingBox {
            size: bounds.size.to_array(),
        });
    }

    let c = bounds.center;
    let s = bounds.size;
    let half_fov_tan = (config.lens.fov_rad() / 2.0).tan();
    let distance = s.y / (2.0 * half_fov_tan);
    let front = c.z - s.z / 2.0 - distance;

    let result = FramingResult {
        camera: Vec3::new(0.0, c.y, front / 2.0),
        orbit_target: Vec3::new(c.x, c.y + s.y / 4.0, c.z),
        distance,
        light: KeyLight {
            position: Vec3::new(c.x, c.y * 2.0, front),
            target: c,
            intensity: config.light_intensity,
        },
        lens: config.lens,
        bounds: *bounds,
    };

    if !(result.camera.is_finite() && result.orbit_target.is_finite() && distance.is_finite()) {
        return Err(MienError::DegenerateBoundingBox { size: s.to_array() });
    }

    Ok(result)
}

/// User-controllable camera orbiting a target point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Rotate the camera around the target (radians)
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.position.sub(&self.target);
        let radius = offset.length();
        if radius < 1e-6 || !yaw.is_finite() || !pitch.is_finite() {
            return;
        }

        let theta = offset.x.atan2(offset.z) + yaw;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() - pitch)
            .clamp(0.01, std::f32::consts::PI - 0.01);

        let rotated = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        self.position = self.target.add(&rotated);
    }

    /// Scale the distance to the target (< 1 moves closer)
    pub fn zoom(&mut self, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let offset = self.position.sub(&self.target).scale(factor);
        self.position = self.target.add(&offset);
    }

    /// Move camera and target together
    pub fn pan(&mut self, offset: Vec3) {
        if !offset.is_finite() {
            return;
        }
        self.position = self.position.add(&offset);
        self.target = self.target.add(&offset);
    }
}

/// Caches the initial framing and owns the interactive camera
#[derive(Debug, Clone, Default)]
pub struct ViewFramer {
    config: FramingConfig,
    initial: Option<FramingResult>,
    camera: OrbitCamera,
}

impl ViewFramer {
    pub fn new(config: FramingConfig) -> Self {
        ViewFramer {
            config,
            initial: None,
            camera: OrbitCamera::default(),
        }
    }

    /// Frame a bounding box and make it the initial view
    pub fn frame(&mut self, bounds: &BoundingBox) -> MienResult<FramingResult> {
        let result = compute_framing(bounds, &self.config)?;
        self.initial = Some(result);
        self.camera = OrbitCamera::new(result.camera, result.orbit_target);

        tracing::debug!(
            distance = result.distance,
            camera = ?result.camera,
            "avatar framed"
        );
        Ok(result)
    }

    /// Re-frame only if the bounds differ from the cached framing
    /// Returns true if a new framing was computed
    pub fn refresh(&mut self, bounds: &BoundingBox) -> MienResult<bool> {
        match &self.initial {
            Some(initial) if initial.bounds == *bounds => Ok(false),
            _ => self.frame(bounds).map(|_| true),
        }
    }

    /// Restore the camera to the initial framing
    /// Returns None if nothing has been framed yet
    pub fn reset_view(&mut self) -> Option<FramingResult> {
        let initial = self.initial?;
        self.camera = OrbitCamera::new(initial.camera, initial.orbit_target);
        Some(initial)
    }

    pub fn initial(&self) -> Option<&FramingResult> {
        self.initial.as_ref()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }
}
