//! Persisted user settings resolved into voice preferences

use crate::voice::{VoiceName, VoiceSpeed};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::warn;

pub const DEFAULT_VOICE_INDEX: i64 = 5;
pub const DEFAULT_SPEED_INDEX: i64 = 2;

/// Keys of the persisted settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    SelectedVoice,
    VoiceSpeed,
    AutoSpeech,
    AffectivaEmotionThreshold,
    AffectivaEmotionSpeaking,
    AutoPlayTutorial,
}

impl SettingsKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingsKey::SelectedVoice => "selected-voice",
            SettingsKey::VoiceSpeed => "voice-speed",
            SettingsKey::AutoSpeech => "auto-speech",
            SettingsKey::AffectivaEmotionThreshold => "affectiva-emotion-threshold",
            SettingsKey::AffectivaEmotionSpeaking => "affectiva-emotion-speaking",
            SettingsKey::AutoPlayTutorial => "auto-play-tutorial",
        }
    }
}

/// Read-only view of the persisted settings
pub trait SettingsStore: Send + Sync {
    fn integer(&self, key: SettingsKey) -> Option<i64>;
}

/// Settings held in memory
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<SettingsKey, i64>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: SettingsKey, value: i64) {
        self.values.write().insert(key, value);
    }

    pub fn remove(&self, key: SettingsKey) -> Option<i64> {
        self.values.write().remove(&key)
    }
}

impl SettingsStore for MemorySettings {
    fn integer(&self, key: SettingsKey) -> Option<i64> {
        self.values.read().get(&key).copied()
    }
}

pub fn voice_for_index(index: i64) -> Option<VoiceName> {
    match index {
        0 => Some(VoiceName::SamanthaEnhanced),
        1 => Some(VoiceName::Arthur),
        2 => Some(VoiceName::Nicky),
        3 | 4 => Some(VoiceName::Aaron),
        5 => Some(VoiceName::Siri),
        _ => None,
    }
}

pub fn speed_for_index(index: i64) -> Option<VoiceSpeed> {
    match index {
        0 => Some(VoiceSpeed::Low),
        1 => Some(VoiceSpeed::Medium),
        2 => Some(VoiceSpeed::High),
        _ => None,
    }
}

/// Voice and speed chosen in the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceSettings {
    pub voice: VoiceName,
    pub speed: VoiceSpeed,
}

impl VoiceSettings {
    /// Resolve stored indices. Missing or unknown indices use the defaults.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let voice_index = store
            .integer(SettingsKey::SelectedVoice)
            .unwrap_or(DEFAULT_VOICE_INDEX);
        let voice = voice_for_index(voice_index).unwrap_or_else(|| {
            warn!(index = voice_index, "Unknown {} index, using default", SettingsKey::SelectedVoice.as_str());
            VoiceName::Siri
        });

        let speed_index = store
            .integer(SettingsKey::VoiceSpeed)
            .unwrap_or(DEFAULT_SPEED_INDEX);
        let speed = speed_for_index(speed_index).unwrap_or_else(|| {
            warn!(index = speed_index, "Unknown {} index, using default", SettingsKey::VoiceSpeed.as_str());
            VoiceSpeed::High
        });

        Self { voice, speed }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: VoiceName::Siri,
            speed: VoiceSpeed::High,
        }
    }
}
