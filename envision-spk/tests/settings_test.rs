//! Tests for persisted voice settings

mod common;

use common::fixture;
use envision_spk::settings::{
    speed_for_index, voice_for_index, DEFAULT_SPEED_INDEX, DEFAULT_VOICE_INDEX,
};
use envision_spk::{MemorySettings, SettingsKey, VoiceName, VoiceSettings, VoiceSpeed};

#[test]
fn test_voice_index_table() {
    assert_eq!(voice_for_index(0), Some(VoiceName::SamanthaEnhanced));
    assert_eq!(voice_for_index(1), Some(VoiceName::Arthur));
    assert_eq!(voice_for_index(2), Some(VoiceName::Nicky));
    assert_eq!(voice_for_index(3), Some(VoiceName::Aaron));
    assert_eq!(voice_for_index(4), Some(VoiceName::Aaron));
    assert_eq!(voice_for_index(5), Some(VoiceName::Siri));
    assert_eq!(voice_for_index(6), None);
    assert_eq!(voice_for_index(-1), None);
}

#[test]
fn test_speed_index_table() {
    assert_eq!(speed_for_index(0), Some(VoiceSpeed::Low));
    assert_eq!(speed_for_index(1), Some(VoiceSpeed::Medium));
    assert_eq!(speed_for_index(2), Some(VoiceSpeed::High));
    assert_eq!(speed_for_index(3), None);
}

#[test]
fn test_empty_store_uses_defaults() {
    let store = MemorySettings::new();
    let settings = VoiceSettings::load(&store);

    assert_eq!(settings, VoiceSettings::default());
    assert_eq!(voice_for_index(DEFAULT_VOICE_INDEX), Some(settings.voice));
    assert_eq!(speed_for_index(DEFAULT_SPEED_INDEX), Some(settings.speed));
}

#[test]
fn test_stored_indices_resolved() {
    let store = MemorySettings::new();
    store.set(SettingsKey::SelectedVoice, 1);
    store.set(SettingsKey::VoiceSpeed, 0);

    let settings = VoiceSettings::load(&store);
    assert_eq!(settings.voice, VoiceName::Arthur);
    assert_eq!(settings.speed, VoiceSpeed::Low);

    store.remove(SettingsKey::VoiceSpeed);
    assert_eq!(VoiceSettings::load(&store).speed, VoiceSpeed::High);
}

#[test]
fn test_unknown_indices_fall_back() {
    let store = MemorySettings::new();
    store.set(SettingsKey::SelectedVoice, 42);
    store.set(SettingsKey::VoiceSpeed, 9);

    assert_eq!(VoiceSettings::load(&store), VoiceSettings::default());
}

#[test]
fn test_settings_key_names() {
    assert_eq!(SettingsKey::SelectedVoice.as_str(), "selected-voice");
    assert_eq!(SettingsKey::VoiceSpeed.as_str(), "voice-speed");
}

#[test]
fn test_apply_settings_updates_coordinator() {
    let f = fixture();
    let store = MemorySettings::new();
    store.set(SettingsKey::SelectedVoice, 2);
    store.set(SettingsKey::VoiceSpeed, 1);

    let applied = f.coordinator.apply_settings(&store);
    assert_eq!(applied.voice, VoiceName::Nicky);

    let profile = f.coordinator.voice_profile();
    assert_eq!(profile.voice.identifier.as_deref(), Some(VoiceName::Nicky.identifier()));
    assert_eq!(profile.rate_multiplier, 0.9);
}
