//! Animation Clip Selection
//!
//! Clips are loaded by the asset layer; here they are only names with a
//! duration. The selector is a plain state machine: it decides which single
//! clip is active and emits the stop/start transitions for the rig to apply.
//!
//! Priority rule: while the avatar is speaking, the speaking clip wins over
//! any user selection.

use std::collections::HashMap;

use mien_core::{MienError, MienResult};
use serde::{Deserialize, Serialize};

/// A loaded motion clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds (0 = unknown, playback position never wraps)
    pub duration: f64,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 { duration } else { 0.0 };
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Capability to play motion clips on the avatar rig
pub trait ClipPlayer {
    /// Names of every clip the rig can play
    fn clip_names(&self) -> Vec<String>;

    /// Start a clip from its beginning
    fn play_from_start(&mut self, name: &str);

    /// Stop a clip immediately
    fn stop(&mut self, name: &str);
}

/// Name → clip registry, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, AnimationClip>,
    order: Vec<String>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip, replacing any clip with the same name
    pub fn insert(&mut self, clip: AnimationClip) {
        if !self.clips.contains_key(&clip.name) {
            self.order.push(clip.name.clone());
        }
        self.clips.insert(clip.name.clone(), clip);
    }

    pub fn get(&self, name: &str) -> MienResult<&AnimationClip> {
        self.clips
            .get(name)
            .ok_or_else(|| MienError::MissingClip(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl FromIterator<AnimationClip> for ClipLibrary {
    fn from_iter<I: IntoIterator<Item = AnimationClip>>(iter: I) -> Self {
        let mut library = ClipLibrary::new();
        for clip in iter {
            library.insert(clip);
        }
        library
    }
}

/// Which clips play in the idle and speaking states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    pub idle: String,
    pub speaking: String,
}

impl Default for ClipConfig {
    fn default() -> Self {
        ClipConfig {
            idle: "Breathing".to_string(),
            speaking: "Talking".to_string(),
        }
    }
}

/// Stop/start pair the rig must apply, in that order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipTransition {
    pub stop: Option<String>,
    pub start: String,
}

impl ClipTransition {
    pub fn apply<P: ClipPlayer + ?Sized>(&self, player: &mut P) {
        if let Some(previous) = &self.stop {
            player.stop(previous);
        }
        player.play_from_start(&self.start);
    }
}

/// Active-clip state machine
/// INVARIANT: exactly one clip of the library is active
#[derive(Debug, Clone)]
pub struct ClipSelector {
    library: ClipLibrary,
    config: ClipConfig,
    active: AnimationClip,
    /// Playback position of the active clip (seconds)
    position: f64,
    speaking: bool,
}

impl ClipSelector {
    /// Create a selector with the idle clip active
    pub fn new(library: ClipLibrary, config: ClipConfig) -> MienResult<Self> {
        library.get(&config.speaking)?;
        let active = library.get(&config.idle)?.clone();

        Ok(ClipSelector {
            library,
            config,
            active,
            position: 0.0,
            speaking: false,
        })
    }

    /// Transition that starts the initial clip
    pub fn initial(&self) -> ClipTransition {
        ClipTransition {
            stop: None,
            start: self.active.name.clone(),
        }
    }

    pub fn active(&self) -> &AnimationClip {
        &self.active
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn library(&self) -> &ClipLibrary {
        &self.library
    }

    /// React to a change of the speaking signal
    pub fn set_speaking(&mut self, speaking: bool) -> Option<ClipTransition> {
        if speaking == self.speaking {
            return None;
        }
        self.speaking = speaking;

        if speaking {
            let name = self.config.speaking.clone();
            self.activate(&name)
        } else if self.active.name == self.config.speaking {
            let name = self.config.idle.clone();
            self.activate(&name)
        } else {
            None
        }
    }

    /// User-driven selection
    /// Unknown names fail; while speaking the request is validated but
    /// the speaking clip stays active.
    pub fn request(&mut self, name: &str) -> MienResult<Option<ClipTransition>> {
        self.library.get(name)?;

        if self.speaking {
            tracing::debug!(
                requested = name,
                active = %self.active.name,
                "clip request ignored while speaking"
            );
            return Ok(None);
        }

        Ok(self.activate(name))
    }

    /// Advance the active clip's playback position, looping on its duration
    pub fn advance(&mut self, delta_secs: f64) {
        if !(delta_secs.is_finite() && delta_secs > 0.0) {
            return;
        }
        self.position += delta_secs;
        if self.active.duration > 0.0 {
            self.position %= self.active.duration;
        }
    }

    fn activate(&mut self, name: &str) -> Option<ClipTransition> {
        if self.active.name == name {
            return None;
        }
        let next = self.library.get(name).ok()?.clone();
        let previous = std::mem::replace(&mut self.active, next);
        self.position = 0.0;

        tracing::info!(from = %previous.name, to = name, "clip switched");

        Some(ClipTransition {
            stop: Some(previous.name),
            start: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn library() -> ClipLibrary {
        [
            AnimationClip::new("Breathing", 4.0),
            AnimationClip::new("Fireball", 2.5),
            AnimationClip::new("Hip Hop Dancing", 8.0),
            AnimationClip::new("Talking", 6.0),
        ]
        .into_iter()
        .collect()
    }

    fn selector() -> ClipSelector {
        ClipSelector::new(library(), ClipConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let selector = selector();
        assert_eq!(selector.active().name, "Breathing");
        assert_eq!(
            selector.initial(),
            ClipTransition {
                stop: None,
                start: "Breathing".to_string()
            }
        );
    }

    #[test]
    fn test_missing_configured_clips() {
        let clips: ClipLibrary = [AnimationClip::new("Breathing", 4.0)].into_iter().collect();
        let err = ClipSelector::new(clips, ClipConfig::default()).unwrap_err();
        assert_eq!(err, MienError::MissingClip("Talking".to_string()));
    }

    #[test]
    fn test_user_selection() {
        let mut selector = selector();
        let transition = selector.request("Fireball").unwrap().unwrap();

        assert_eq!(transition.stop.as_deref(), Some("Breathing"));
        assert_eq!(transition.start, "Fireball");
        assert_eq!(selector.active().name, "Fireball");

        // Same clip again is a no-op
        assert_eq!(selector.request("Fireball").unwrap(), None);
    }

    #[test]
    fn test_missing_clip_is_surfaced() {
        let mut selector = selector();
        let err = selector.request("Moonwalk").unwrap_err();
        assert_eq!(err, MienError::MissingClip("Moonwalk".to_string()));
        assert_eq!(selector.active().name, "Breathing");
    }

    #[test]
    fn test_speaking_forces_talking() {
        let mut selector = selector();
        selector.request("Hip Hop Dancing").unwrap();

        let transition = selector.set_speaking(true).unwrap();
        assert_eq!(transition.stop.as_deref(), Some("Hip Hop Dancing"));
        assert_eq!(transition.start, "Talking");

        // Repeated signal is not a change
        assert_eq!(selector.set_speaking(true), None);
    }

    #[test]
    fn test_speaking_wins_over_user() {
        let mut selector = selector();
        selector.set_speaking(true);

        assert_eq!(selector.request("Hip Hop Dancing").unwrap(), None);
        assert_eq!(selector.active().name, "Talking");

        let transition = selector.set_speaking(false).unwrap();
        assert_eq!(transition.start, "Breathing");
        assert_eq!(selector.active().name, "Breathing");
    }

    #[test]
    fn test_speech_end_returns_to_idle() {
        let mut selector = selector();
        selector.set_speaking(true);
        selector.set_speaking(false);
        selector.request("Fireball").unwrap();
        assert_eq!(selector.active().name, "Fireball");

        selector.set_speaking(true);
        selector.request("Talking").unwrap();
        assert_eq!(selector.active().name, "Talking");
        selector.set_speaking(false);
        assert_eq!(selector.active().name, "Breathing");
    }

    #[test]
    fn test_manual_talking_falls_back_after_speech() {
        let mut selector = selector();
        selector.request("Talking").unwrap();

        // Speech starts and ends while Talking is already active
        assert_eq!(selector.set_speaking(true), None);
        let transition = selector.set_speaking(false).unwrap();
        assert_eq!(transition.start, "Breathing");
    }

    #[test]
    fn test_playback_loops() {
        let mut selector = selector();
        for _ in 0..50 {
            selector.advance(0.1);
        }
        // 5 seconds into a 4 second clip
        assert!((selector.position() - 1.0).abs() < 1e-6);

        selector.request("Fireball").unwrap();
        assert_eq!(selector.position(), 0.0);

        selector.advance(f64::NAN);
        selector.advance(-1.0);
        assert_eq!(selector.position(), 0.0);
    }

    #[test]
    fn test_transition_apply_order() {
        #[derive(Default)]
        struct Player {
            log: Vec<String>,
        }

        impl ClipPlayer for Player {
            fn clip_names(&self) -> Vec<String> {
                Vec::new()
            }
            fn play_from_start(&mut self, name: &str) {
                self.log.push(format!("play {}", name));
            }
            fn stop(&mut self, name: &str) {
                self.log.push(format!("stop {}", name));
            }
        }

        let mut player = Player::default();
        ClipTransition {
            stop: Some("Breathing".to_string()),
            start: "Talking".to_string(),
        }
        .apply(&mut player);

        assert_eq!(player.log, vec!["stop Breathing", "play Talking"]);
    }

    #[test]
    fn test_library_order_and_replace() {
        let mut clips = library();
        clips.insert(AnimationClip::new("Fireball", 3.0));

        assert_eq!(clips.len(), 4);
        assert_eq!(clips.get("Fireball").unwrap().duration, 3.0);
        assert_eq!(
            clips.names().collect::<Vec<_>>(),
            vec!["Breathing", "Fireball", "Hip Hop Dancing", "Talking"]
        );
    }

    proptest! {
        #[test]
        fn prop_speech_holds_talking(requests in prop::collection::vec(0usize..5, 0..40)) {
            let names = ["Breathing", "Fireball", "Hip Hop Dancing", "Talking", "Moonwalk"];
            let mut selector = selector();
            selector.set_speaking(true);

            for i in requests {
                let result = selector.request(names[i]);
                prop_assert_eq!(result.is_err(), names[i] == "Moonwalk");
                prop_assert_eq!(&selector.active().name, "Talking");
            }

            selector.set_speaking(false);
            prop_assert_eq!(&selector.active().name, "Breathing");
        }

        #[test]
        fn prop_silent_requests_follow_user(requests in prop::collection::vec(0usize..4, 1..40)) {
            let names = ["Breathing", "Fireball", "Hip Hop Dancing", "Talking"];
            let mut selector = selector();

            for &i in &requests {
                selector.request(names[i]).unwrap();
                prop_assert_eq!(&selector.active().name, names[i]);
            }
        }
    }
}
