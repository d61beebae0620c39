//! Controller configuration
//!
//! Every field has a default matching the reference avatar behavior, so a
//! config file only needs the values it changes.

use std::path::Path;

use mien_core::{MienError, MienResult, DEFAULT_BLEND_GAIN, DEFAULT_MAX_FRAME_DELTA};
use mien_face::{BlinkConfig, MouthConfig};
use mien_scene::{ClipConfig, FramingConfig};
use serde::{Deserialize, Serialize};

/// Blend interpolator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Fraction of the remaining distance covered per second
    pub gain: f32,
}

impl Default for BlendConfig {
    fn default() -> Self {
        BlendConfig {
            gain: DEFAULT_BLEND_GAIN,
        }
    }
}

/// Avatar controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub blend: BlendConfig,
    pub blink: BlinkConfig,
    pub mouth: MouthConfig,
    pub clips: ClipConfig,
    pub framing: FramingConfig,
    /// Largest frame delta accepted (seconds); longer frames are clamped
    pub max_frame_delta: f64,
    /// Mouth-shape RNG seed; None seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            blend: BlendConfig::default(),
            blink: BlinkConfig::default(),
            mouth: MouthConfig::default(),
            clips: ClipConfig::default(),
            framing: FramingConfig::default(),
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            seed: None,
        }
    }
}

impl ControllerConfig {
    /// Configuration for renderers running well below 60 fps
    pub fn low_frame_rate() -> Self {
        ControllerConfig {
            blend: BlendConfig { gain: 8.0 },
            blink: BlinkConfig {
                close_hold: 0.6,
                ..Default::default()
            },
            max_frame_delta: 0.2,
            ..Default::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> MienResult<Self> {
        let config: ControllerConfig = serde_json::from_str(json)
            .map_err(|e| MienError::InvalidConfig(format!("parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> MienResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MienError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), "loaded controller config");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> MienResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MienError::InvalidConfig(format!("serialize error: {}", e)))
    }

    pub fn validate(&self) -> MienResult<()> {
        if !(self.blend.gain.is_finite() && self.blend.gain > 0.0) {
            return Err(MienError::InvalidConfig(format!(
                "blend.gain must be positive, got {}",
                self.blend.gain
            )));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(MienError::InvalidConfig(format!(
                "max_frame_delta must be positive, got {}",
                self.max_frame_delta
            )));
        }
        if self.clips.idle.is_empty() || self.clips.speaking.is_empty() {
            return Err(MienError::InvalidConfig(
                "clips.idle and clips.speaking must be named".to_string(),
            ));
        }
        self.blink.validate()?;
        self.mouth.validate()?;
        self.framing.validate()?;
        Ok(())
    }
}
