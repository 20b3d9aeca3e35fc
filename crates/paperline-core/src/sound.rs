//! Sound cue capability consumed by the typewriter.
//!
//! Cues are fire-and-forget: the typewriter calls [`SoundCue::emit`] once per
//! revealed or removed cluster and never waits on playback. A failing cue is
//! logged and ignored.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What the cue is accompanying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundAction {
    Type,
    Erase,
}

impl fmt::Display for SoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundAction::Type => write!(f, "type"),
            SoundAction::Erase => write!(f, "erase"),
        }
    }
}

/// Plays (or pretends to play) a short cue.
///
/// `duration_hint` is the step delay of the animation, so implementations can
/// keep the cue shorter than one step.
pub trait SoundCue: Send + Sync {
    fn emit(&self, action: SoundAction, duration_hint: Duration) -> Result<()>;
}

/// Cue that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl SoundCue for SilentCue {
    fn emit(&self, _action: SoundAction, _duration_hint: Duration) -> Result<()> {
        Ok(())
    }
}

/// Persisted sound preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSettings {
    /// Whether cues are emitted at all.
    pub enabled: bool,
    /// Output volume in `0.0..=1.0`.
    pub volume: f32,
}

impl SoundSettings {
    const DEFAULT_VOLUME: f32 = 0.7;

    /// Flips `enabled` and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Sets the volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            Self::DEFAULT_VOLUME
        } else {
            volume.clamp(0.0, 1.0)
        };
    }
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: Self::DEFAULT_VOLUME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_cue_never_fails() {
        let cue = SilentCue;
        assert!(cue.emit(SoundAction::Type, Duration::from_millis(50)).is_ok());
        assert!(cue.emit(SoundAction::Erase, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(SoundAction::Type.to_string(), "type");
        assert_eq!(SoundAction::Erase.to_string(), "erase");
    }

    #[test]
    fn test_toggle_flips_enabled() {
        let mut settings = SoundSettings::default();
        assert!(settings.enabled);
        assert!(!settings.toggle());
        assert!(settings.toggle());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut settings = SoundSettings::default();
        settings.set_volume(1.5);
        assert!((settings.volume - 1.0).abs() < f32::EPSILON);
        settings.set_volume(-0.2);
        assert!(settings.volume.abs() < f32::EPSILON);
        settings.set_volume(f32::NAN);
        assert!((settings.volume - 0.7).abs() < f32::EPSILON);
    }
}
