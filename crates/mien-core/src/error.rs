//! Error types for Mien

use thiserror::Error;

use crate::Channel;

/// Core Mien errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MienError {
    // Registry errors
    #[error("Invalid channel name: {0}")]
    InvalidChannelName(String),

    #[error("Channel {0} is driven internally and takes no external target")]
    ChannelNotDrivable(Channel),

    // Clip errors
    #[error("Missing clip: {0}")]
    MissingClip(String),

    // Framing errors
    #[error("Degenerate bounding box: size ({}, {}, {})", size[0], size[1], size[2])]
    DegenerateBoundingBox { size: [f32; 3] },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Mien operations
pub type MienResult<T> = Result<T, MienError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MienError::InvalidChannelName("jaw".to_string());
        assert_eq!(err.to_string(), "Invalid channel name: jaw");

        let err = MienError::DegenerateBoundingBox { size: [0.0, 0.0, 0.0] };
        assert_eq!(err.to_string(), "Degenerate bounding box: size (0, 0, 0)");

        let err = MienError::ChannelNotDrivable(Channel::Aa);
        assert!(err.to_string().contains("aa"));
    }
}
