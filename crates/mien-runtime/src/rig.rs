//! Avatar rig boundary
//!
//! The rig (model, skeleton, expression manager, animation mixer) is owned
//! by the asset/render layer. The controller only talks to it through these
//! capabilities.

use std::collections::HashMap;

use mien_core::Channel;
use mien_face::ExpressionManager;
use mien_scene::{BoundingBox, ClipLibrary, ClipPlayer, GeometrySource};

/// Everything the controller needs from a loaded avatar
pub trait AvatarRig: ExpressionManager + ClipPlayer + GeometrySource {
    /// Advance the avatar's pose by `delta_secs`
    fn update(&mut self, delta_secs: f64);
}

/// Clip calls recorded by the headless rig
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigCall {
    Play(String),
    Stop(String),
}

/// In-memory rig with no rendering
/// Records every call, for tests, benches and headless tools
#[derive(Debug, Clone, Default)]
pub struct HeadlessRig {
    supported: Vec<String>,
    expressions: HashMap<String, f32>,
    clips: Vec<String>,
    playing: Vec<String>,
    calls: Vec<RigCall>,
    bounds: BoundingBox,
    pose_time: f64,
}

impl HeadlessRig {
    /// Rig exposing every registry channel and the clips of `library`
    pub fn new(library: &ClipLibrary, bounds: BoundingBox) -> Self {
        HeadlessRig {
            supported: Channel::ALL.iter().map(|c| c.name().to_string()).collect(),
            clips: library.names().map(str::to_string).collect(),
            bounds,
            ..Default::default()
        }
    }

    /// Drop support for one expression (e.g. a rig without `surprised`)
    pub fn without_expression(mut self, name: &str) -> Self {
        self.supported.retain(|n| n != name);
        self
    }

    /// Drop one clip from the rig's animation set
    pub fn without_clip(mut self, name: &str) -> Self {
        self.clips.retain(|n| n != name);
        self
    }

    /// Last value written for an expression
    pub fn expression(&self, name: &str) -> Option<f32> {
        self.expressions.get(name).copied()
    }

    pub fn playing(&self) -> &[String] {
        &self.playing
    }

    pub fn calls(&self) -> &[RigCall] {
        &self.calls
    }

    pub fn pose_time(&self) -> f64 {
        self.pose_time
    }

    /// Simulate the avatar's geometry changing (model swap, rescale)
    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = bounds;
    }
}

impl ExpressionManager for HeadlessRig {
    fn supports_expression(&self, name: &str) -> bool {
        self.supported.iter().any(|n| n == name)
    }

    fn set_expression(&mut self, name: &str, value: f32) {
        if self.supports_expression(name) {
            self.expressions.insert(name.to_string(), value);
        }
    }
}

impl ClipPlayer for HeadlessRig {
    fn clip_names(&self) -> Vec<String> {
        self.clips.clone()
    }

    fn play_from_start(&mut self, name: &str) {
        self.calls.push(RigCall::Play(name.to_string()));
        if !self.playing.iter().any(|n| n == name) {
            self.playing.push(name.to_string());
        }
    }

    fn stop(&mut self, name: &str) {
        self.calls.push(RigCall::Stop(name.to_string()));
        self.playing.retain(|n| n != name);
    }
}

impl GeometrySource for HeadlessRig {
    fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }
}

impl AvatarRig for HeadlessRig {
    fn update(&mut self, delta_secs: f64) {
        self.pose_time += delta_secs;
    }
}
