//! Voice identity and playback rate preferences

use crate::engines::SpeechEngine;
use crate::error::SpeechError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Locale of the voice used when nothing better resolves
pub const DEFAULT_LANGUAGE: &str = "en-US";

pub const RATE_MULTIPLIER_MIN: f32 = 0.5;
pub const RATE_MULTIPLIER_MAX: f32 = 2.0;

/// A concrete platform voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Platform identifier, `None` for the engine's own default voice
    pub identifier: Option<String>,
    /// Language code, e.g. "en-US"
    pub language: String,
}

impl Voice {
    pub fn new(identifier: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            language: language.into(),
        }
    }

    /// The engine's default voice for `language`. Always usable.
    pub fn system_default(language: impl Into<String>) -> Self {
        Self {
            identifier: None,
            language: language.into(),
        }
    }
}

/// Voices the application knows by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceName {
    Siri,
    SamanthaEnhanced,
    Samantha,
    Arthur,
    Nicky,
    Aaron,
}

impl VoiceName {
    pub fn identifier(self) -> &'static str {
        match self {
            VoiceName::Siri => "com.apple.ttsbundle.Siri_compact",
            VoiceName::SamanthaEnhanced => "com.apple.ttsbundle.Samantha-premium",
            VoiceName::Samantha => "com.apple.ttsbundle.Samantha-compact",
            VoiceName::Arthur => "com.apple.ttsbundle.siri_male_en-GB_compact",
            VoiceName::Nicky => "com.apple.ttsbundle.siri_female_en-US_compact",
            VoiceName::Aaron => "com.apple.ttsbundle.siri_male_en-US_compact",
        }
    }
}

impl FromStr for VoiceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "siri" => Ok(VoiceName::Siri),
            "samantha_enhanced" => Ok(VoiceName::SamanthaEnhanced),
            "samantha" => Ok(VoiceName::Samantha),
            "arthur" => Ok(VoiceName::Arthur),
            "nicky" => Ok(VoiceName::Nicky),
            "aaron" => Ok(VoiceName::Aaron),
            other => Err(format!("unknown voice name '{}'", other)),
        }
    }
}

/// Playback speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceSpeed {
    Low,
    Medium,
    High,
}

impl VoiceSpeed {
    pub fn multiplier(self) -> f32 {
        match self {
            VoiceSpeed::Low => 0.8,
            VoiceSpeed::Medium => 0.9,
            VoiceSpeed::High => 1.0,
        }
    }
}

impl FromStr for VoiceSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(VoiceSpeed::Low),
            "medium" => Ok(VoiceSpeed::Medium),
            "high" => Ok(VoiceSpeed::High),
            other => Err(format!("unknown voice speed '{}'", other)),
        }
    }
}

/// Snapshot of the voice settings an utterance is built with
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceProfile {
    pub voice: Voice,
    pub rate_multiplier: f32,
}

impl fmt::Display for VoiceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) x{:.2}",
            self.voice.identifier.as_deref().unwrap_or("default"),
            self.voice.language,
            self.rate_multiplier
        )
    }
}

/// Clamp a requested rate multiplier into the supported range. NaN maps to 1.0.
pub fn clamp_rate_multiplier(multiplier: f32) -> f32 {
    if multiplier.is_nan() {
        return 1.0;
    }
    multiplier.clamp(RATE_MULTIPLIER_MIN, RATE_MULTIPLIER_MAX)
}

/// Active voice identity and playback rate
#[derive(Debug, Clone)]
pub struct VoicePreferences {
    voice: Voice,
    rate_multiplier: f32,
    fallback_language: String,
    fallback_used: bool,
}

impl VoicePreferences {
    pub fn new(fallback_language: impl Into<String>) -> Self {
        let fallback_language = fallback_language.into();
        Self {
            voice: Voice::system_default(fallback_language.clone()),
            rate_multiplier: 1.0,
            fallback_language,
            fallback_used: false,
        }
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn rate_multiplier(&self) -> f32 {
        self.rate_multiplier
    }

    /// Whether the last `set_voice` had to substitute the default voice
    pub fn fallback_used(&self) -> bool {
        self.fallback_used
    }

    pub fn profile(&self) -> VoiceProfile {
        VoiceProfile {
            voice: self.voice.clone(),
            rate_multiplier: self.rate_multiplier,
        }
    }

    /// Find `identity` among the engine's installed voices
    pub fn resolve(identity: &str, engine: &dyn SpeechEngine) -> Result<Voice, SpeechError> {
        engine
            .voices()
            .into_iter()
            .find(|voice| voice.identifier.as_deref() == Some(identity))
            .ok_or_else(|| SpeechError::VoiceResolutionFailure(identity.to_string()))
    }

    /// Voice used when resolution fails
    pub fn default_voice(&self, engine: &dyn SpeechEngine) -> Voice {
        engine
            .voice_for_language(&self.fallback_language)
            .unwrap_or_else(|| Voice::system_default(self.fallback_language.clone()))
    }

    /// Switch to `identity`, substituting the default voice if it is unavailable
    pub fn set_voice(&mut self, identity: &str, engine: &dyn SpeechEngine) -> &Voice {
        match Self::resolve(identity, engine) {
            Ok(voice) => {
                debug!(voice = identity, "Voice resolved");
                self.voice = voice;
                self.fallback_used = false;
            }
            Err(e) => {
                let fallback = self.default_voice(engine);
                warn!(
                    language = %fallback.language,
                    "{}, falling back to default voice",
                    e
                );
                self.voice = fallback;
                self.fallback_used = true;
            }
        }
        &self.voice
    }

    /// Set the rate multiplier, clamping to the supported range. Returns the value kept.
    pub fn set_rate(&mut self, multiplier: f32) -> f32 {
        let clamped = clamp_rate_multiplier(multiplier);
        if clamped != multiplier {
            debug!(requested = multiplier, applied = clamped, "Rate multiplier clamped");
        }
        self.rate_multiplier = clamped;
        clamped
    }

    pub fn set_speed(&mut self, speed: VoiceSpeed) -> f32 {
        self.set_rate(speed.multiplier())
    }

    /// Engine rate for the current multiplier, kept inside the engine's legal range
    pub fn utterance_rate(&self, engine: &dyn SpeechEngine) -> f32 {
        let rate = engine.default_rate() * self.rate_multiplier;
        let (lo, hi) = engine.rate_range();
        if lo.is_nan() || hi.is_nan() {
            warn!(engine = engine.name(), "Engine reported an invalid rate range, not clamping");
            return rate;
        }
        let (min, max) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        rate.clamp(min, max)
    }
}

impl Default for VoicePreferences {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_rate_multiplier_bounds() {
        assert_eq!(clamp_rate_multiplier(0.1), RATE_MULTIPLIER_MIN);
        assert_eq!(clamp_rate_multiplier(9.0), RATE_MULTIPLIER_MAX);
        assert_eq!(clamp_rate_multiplier(0.9), 0.9);
        assert_eq!(clamp_rate_multiplier(f32::NAN), 1.0);
        assert_eq!(clamp_rate_multiplier(f32::INFINITY), RATE_MULTIPLIER_MAX);
        assert_eq!(clamp_rate_multiplier(f32::NEG_INFINITY), RATE_MULTIPLIER_MIN);
    }

    #[test]
    fn test_voice_name_round_trips_through_from_str() {
        for name in ["siri", "samantha_enhanced", "samantha", "arthur", "nicky", "aaron"] {
            assert!(name.parse::<VoiceName>().is_ok(), "{}", name);
        }
        assert!("hal".parse::<VoiceName>().is_err());
    }
}
