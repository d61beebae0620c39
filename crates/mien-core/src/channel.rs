//! Expression channel registry
//!
//! The rig exposes a fixed set of named, unit-interval expression channels.
//! We never store raw morph targets here, only the SEMANTIC channel and the
//! group that decides who drives it:
//! - Mouth channels are driven by the speech cycler
//! - Eyelid channels are driven by the blink cycle
//! - Emotion channels follow externally supplied targets

use std::fmt;
use std::str::FromStr;

use crate::{MienError, MienResult};

/// Semantic grouping of expression channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelGroup {
    Mouth,
    Eyelid,
    Emotion,
}

/// A named expression channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    // Mouth shapes
    Aa,
    Ih,
    Ou,
    Ee,
    Oh,

    // Eyelids
    BlinkLeft,
    BlinkRight,

    // Emotions
    Happy,
    Angry,
    Sad,
    Relaxed,
    Surprised,
}

impl Channel {
    /// Number of channels in the registry
    pub const COUNT: usize = 12;

    /// All channels in registry order
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Aa,
        Channel::Ih,
        Channel::Ou,
        Channel::Ee,
        Channel::Oh,
        Channel::BlinkLeft,
        Channel::BlinkRight,
        Channel::Happy,
        Channel::Angry,
        Channel::Sad,
        Channel::Relaxed,
        Channel::Surprised,
    ];

    /// Mouth-shape channels cycled while speaking
    pub const MOUTH: [Channel; 5] = [
        Channel::Aa,
        Channel::Ih,
        Channel::Ou,
        Channel::Ee,
        Channel::Oh,
    ];

    /// Eyelid channels driven by the blink cycle
    pub const EYELID: [Channel; 2] = [Channel::BlinkLeft, Channel::BlinkRight];

    /// Emotion channels that follow external targets
    pub const EMOTION: [Channel; 5] = [
        Channel::Happy,
        Channel::Angry,
        Channel::Sad,
        Channel::Relaxed,
        Channel::Surprised,
    ];

    /// Stable rig-facing name
    pub fn name(self) -> &'static str {
        match self {
            Channel::Aa => "aa",
            Channel::Ih => "ih",
            Channel::Ou => "ou",
            Channel::Ee => "ee",
            Channel::Oh => "oh",
            Channel::BlinkLeft => "blinkLeft",
            Channel::BlinkRight => "blinkRight",
            Channel::Happy => "happy",
            Channel::Angry => "angry",
            Channel::Sad => "sad",
            Channel::Relaxed => "relaxed",
            Channel::Surprised => "surprised",
        }
    }

    pub fn group(self) -> ChannelGroup {
        match self {
            Channel::Aa | Channel::Ih | Channel::Ou | Channel::Ee | Channel::Oh => {
                ChannelGroup::Mouth
            }
            Channel::BlinkLeft | Channel::BlinkRight => ChannelGroup::Eyelid,
            _ => ChannelGroup::Emotion,
        }
    }

    /// Position in registry order
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolve a channel by name (ASCII case-insensitive)
    pub fn from_name(name: &str) -> MienResult<Channel> {
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| MienError::InvalidChannelName(name.to_string()))
    }

    /// Can an external target be set on this channel?
    pub fn is_externally_driven(self) -> bool {
        self.group() == ChannelGroup::Emotion
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = MienError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::from_name(s)
    }
}

/// Coerce a raw weight into the unit interval.
/// Non-finite input maps to 0.
#[inline]
pub fn unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Current values of every registry channel
///
/// INVARIANT: every stored value is within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpressionSet {
    values: [f32; Channel::COUNT],
}

impl ExpressionSet {
    /// All channels at rest
    pub fn neutral() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, channel: Channel) -> f32 {
        self.values[channel.index()]
    }

    /// Store a value, clamped to [0, 1]
    #[inline]
    pub fn set(&mut self, channel: Channel, value: f32) {
        self.values[channel.index()] = unit(value);
    }

    /// Iterate (channel, value) pairs in registry order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, f32)> + '_ {
        Channel::ALL.iter().map(move |c| (*c, self.values[c.index()]))
    }

    /// Largest value within a group
    pub fn peak(&self, group: ChannelGroup) -> f32 {
        self.iter()
            .filter(|(c, _)| c.group() == group)
            .map(|(_, v)| v)
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
        assert_eq!(Channel::MOUTH.len() + Channel::EYELID.len() + Channel::EMOTION.len(), Channel::COUNT);
    }

    #[test]
    fn test_groups() {
        assert!(Channel::MOUTH.iter().all(|c| c.group() == ChannelGroup::Mouth));
        assert!(Channel::EYELID.iter().all(|c| c.group() == ChannelGroup::Eyelid));
        assert!(Channel::EMOTION.iter().all(|c| c.is_externally_driven()));
        assert!(!Channel::BlinkLeft.is_externally_driven());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Channel::from_name("blinkLeft").unwrap(), Channel::BlinkLeft);
        assert_eq!(Channel::from_name("Surprised").unwrap(), Channel::Surprised);
        assert_eq!("oh".parse::<Channel>().unwrap(), Channel::Oh);

        let err = Channel::from_name("jawOpen").unwrap_err();
        assert_eq!(err, MienError::InvalidChannelName("jawOpen".to_string()));
    }

    #[test]
    fn test_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_name(channel.name()).unwrap(), channel);
        }
    }

    #[test]
    fn test_expression_set_clamps() {
        let mut set = ExpressionSet::neutral();
        set.set(Channel::Happy, 1.7);
        set.set(Channel::Sad, -0.3);
        set.set(Channel::Angry, f32::NAN);

        assert_eq!(set.get(Channel::Happy), 1.0);
        assert_eq!(set.get(Channel::Sad), 0.0);
        assert_eq!(set.get(Channel::Angry), 0.0);
    }

    #[test]
    fn test_peak() {
        let mut set = ExpressionSet::neutral();
        set.set(Channel::Ou, 0.3);
        set.set(Channel::Ee, 0.6);
        set.set(Channel::Happy, 0.9);

        assert!((set.peak(ChannelGroup::Mouth) - 0.6).abs() < f32::EPSILON);
        assert_eq!(set.peak(ChannelGroup::Eyelid), 0.0);
    }
}
