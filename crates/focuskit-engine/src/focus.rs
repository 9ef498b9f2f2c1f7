//! Focus mode with an ambient sound selection.
//!
//! Only the selection and volume are tracked. Nothing is played.

use crate::analytics::{Analytics, AnalyticsEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default ambient volume in percent.
pub const DEFAULT_VOLUME: u8 = 30;

/// Largest ambient volume in percent.
pub const MAX_VOLUME: u8 = 100;

/// Background sound choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientSound {
    #[default]
    None,
    Rain,
    Coffee,
    Nature,
}

impl AmbientSound {
    /// All sounds in display order.
    pub const ALL: [Self; 4] = [Self::None, Self::Rain, Self::Coffee, Self::Nature];

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "No Sound",
            Self::Rain => "Rain",
            Self::Coffee => "Coffee Shop",
            Self::Nature => "Nature",
        }
    }

    /// Next sound in display order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Rain,
            Self::Rain => Self::Coffee,
            Self::Coffee => Self::Nature,
            Self::Nature => Self::None,
        }
    }
}

impl fmt::Display for AmbientSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Rain => write!(f, "rain"),
            Self::Coffee => write!(f, "coffee"),
            Self::Nature => write!(f, "nature"),
        }
    }
}

/// Distraction-free mode toggle.
#[derive(Debug, Clone)]
pub struct FocusMode {
    active: bool,
    sound: AmbientSound,
    volume: u8,
    analytics: Analytics,
}

impl FocusMode {
    pub fn new(volume: u8, analytics: Analytics) -> Self {
        Self {
            active: false,
            sound: AmbientSound::None,
            volume: volume.min(MAX_VOLUME),
            analytics,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sound(&self) -> AmbientSound {
        self.sound
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Enter or leave focus mode.
    pub fn toggle(&mut self) {
        self.active = !self.active;
        debug!(active = self.active, "focus mode toggled");
        if self.active {
            self.analytics.emit(AnalyticsEvent::FocusModeStart {
                ambient_sound: self.sound,
                sound_volume: self.volume,
            });
        }
    }

    /// Leave focus mode if active.
    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            debug!("focus mode deactivated");
        }
    }

    pub fn select_sound(&mut self, sound: AmbientSound) {
        self.sound = sound;
        self.analytics
            .emit(AnalyticsEvent::AmbientSoundChange { sound_type: sound });
    }

    /// Select the next ambient sound.
    pub fn cycle_sound(&mut self) {
        self.select_sound(self.sound.next());
    }

    /// Change the volume by `delta`, saturating within 0..=100.
    pub fn adjust_volume(&mut self, delta: i16) {
        let next = (i16::from(self.volume) + delta).clamp(0, i16::from(MAX_VOLUME));
        self.volume = u8::try_from(next).unwrap_or(MAX_VOLUME);
    }
}

impl Default for FocusMode {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME, Analytics::disabled())
    }
}
