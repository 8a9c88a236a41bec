//! Tests for voice resolution and rate handling

mod common;

use common::{fixture, fixture_with};
use envision_spk::{
    HeadlessEngine, SpeechBoundary, SpeechConfig, SpeechEngine, SpeechError, Utterance, Voice,
    VoiceName, VoicePreferences, VoiceSpeed,
};

const SAMANTHA: &str = "com.apple.ttsbundle.Samantha-compact";
const NICKY: &str = "com.apple.ttsbundle.siri_female_en-US_compact";

#[test]
fn test_resolve_installed_voice() {
    let engine = HeadlessEngine::new();
    let voice = VoicePreferences::resolve(NICKY, &engine).unwrap();
    assert_eq!(voice.identifier.as_deref(), Some(NICKY));

    assert!(matches!(
        VoicePreferences::resolve("nonexistent-id", &engine),
        Err(SpeechError::VoiceResolutionFailure(id)) if id == "nonexistent-id"
    ));
}

#[test]
fn test_unknown_voice_falls_back_to_default() {
    let engine = HeadlessEngine::new();
    let mut preferences = VoicePreferences::default();

    let voice = preferences.set_voice("nonexistent-id", &engine).clone();
    assert_eq!(voice, preferences.default_voice(&engine));
    assert_eq!(voice.identifier.as_deref(), Some(SAMANTHA));
    assert!(preferences.fallback_used());

    preferences.set_voice(NICKY, &engine);
    assert!(!preferences.fallback_used());
    assert_eq!(preferences.voice().identifier.as_deref(), Some(NICKY));
}

#[test]
fn test_default_voice_without_language_match() {
    let engine = HeadlessEngine::with_voices(vec![Voice::new("only-french", "fr-FR")]);
    let mut preferences = VoicePreferences::new("en-US");

    preferences.set_voice("missing", &engine);
    assert_eq!(preferences.voice(), &Voice::system_default("en-US"));
    assert!(preferences.fallback_used());
}

#[test]
fn test_rate_clamped_to_supported_range() {
    let mut preferences = VoicePreferences::default();
    assert_eq!(preferences.set_rate(0.1), 0.5);
    assert_eq!(preferences.set_rate(3.0), 2.0);
    assert_eq!(preferences.set_rate(f32::NAN), 1.0);
    assert_eq!(preferences.set_speed(VoiceSpeed::Medium), 0.9);
    assert_eq!(preferences.rate_multiplier(), 0.9);
}

#[test]
fn test_utterance_rate_stays_in_engine_range() {
    let engine = HeadlessEngine::new();
    let mut preferences = VoicePreferences::default();

    preferences.set_rate(1.0);
    assert_eq!(preferences.utterance_rate(&engine), 0.5);

    // 0.5 * 2.0 hits the engine maximum exactly
    preferences.set_rate(2.0);
    assert_eq!(preferences.utterance_rate(&engine), 1.0);
}

#[test]
fn test_speed_presets() {
    assert_eq!(VoiceSpeed::Low.multiplier(), 0.8);
    assert_eq!(VoiceSpeed::Medium.multiplier(), 0.9);
    assert_eq!(VoiceSpeed::High.multiplier(), 1.0);
    assert_eq!("low".parse::<VoiceSpeed>().unwrap(), VoiceSpeed::Low);
    assert!("warp".parse::<VoiceSpeed>().is_err());
}

#[test]
fn test_coordinator_reports_fallback() {
    // The premium Samantha voice is not installed on the headless engine
    let f = fixture();
    assert!(f.coordinator.fallback_used());
    assert_eq!(
        f.coordinator.voice_profile().voice.identifier.as_deref(),
        Some(SAMANTHA)
    );

    let voice = f.coordinator.set_voice(VoiceName::Nicky.identifier());
    assert_eq!(voice.identifier.as_deref(), Some(NICKY));
    assert!(!f.coordinator.fallback_used());
}

#[test]
fn test_configured_voice_and_speed_applied() {
    let config = SpeechConfig {
        voice: VoiceName::Samantha,
        speed: VoiceSpeed::Low,
        ..SpeechConfig::default()
    };
    let f = fixture_with(config, HeadlessEngine::new());

    let profile = f.coordinator.voice_profile();
    assert_eq!(profile.voice.identifier.as_deref(), Some(SAMANTHA));
    assert_eq!(profile.rate_multiplier, 0.8);
    assert!(!f.coordinator.fallback_used());
}

#[test]
fn test_voice_change_applies_to_next_utterance() {
    let f = fixture();
    f.coordinator.speak_text("before", false).unwrap();
    f.coordinator.set_voice(NICKY);
    f.finish_engine();
    f.coordinator.speak_text("after", false).unwrap();

    let spoken = f.engine.spoken();
    assert_eq!(spoken[0].voice.identifier.as_deref(), Some(SAMANTHA));
    assert_eq!(spoken[1].voice.identifier.as_deref(), Some(NICKY));
}

/// Headless engine reporting a fixed rate range
struct RangeEngine {
    inner: HeadlessEngine,
    range: (f32, f32),
}

impl SpeechEngine for RangeEngine {
    fn speak(&self, utterance: &Utterance) {
        self.inner.speak(utterance)
    }
    fn pause(&self, boundary: SpeechBoundary) -> bool {
        self.inner.pause(boundary)
    }
    fn resume(&self) -> bool {
        self.inner.resume()
    }
    fn stop(&self, boundary: SpeechBoundary) -> bool {
        self.inner.stop(boundary)
    }
    fn is_speaking(&self) -> bool {
        self.inner.is_speaking()
    }
    fn default_rate(&self) -> f32 {
        self.inner.default_rate()
    }
    fn rate_range(&self) -> (f32, f32) {
        self.range
    }
    fn voices(&self) -> Vec<Voice> {
        self.inner.voices()
    }
    fn voice_for_language(&self, language: &str) -> Option<Voice> {
        self.inner.voice_for_language(language)
    }
    fn name(&self) -> &'static str {
        "range"
    }
}

#[test]
fn test_utterance_rate_with_nan_range_is_unclamped() {
    let mut preferences = VoicePreferences::default();
    preferences.set_rate(2.0);

    for range in [(f32::NAN, 1.0), (0.0, f32::NAN), (f32::NAN, f32::NAN)] {
        let engine = RangeEngine {
            inner: HeadlessEngine::new(),
            range,
        };
        assert_eq!(preferences.utterance_rate(&engine), 1.0);
    }
}

#[test]
fn test_utterance_rate_with_swapped_range() {
    let engine = RangeEngine {
        inner: HeadlessEngine::new(),
        range: (0.6, 0.2),
    };
    let mut preferences = VoicePreferences::default();

    preferences.set_rate(2.0);
    assert_eq!(preferences.utterance_rate(&engine), 0.6);
    preferences.set_rate(0.5);
    assert_eq!(preferences.utterance_rate(&engine), 0.25);
}
