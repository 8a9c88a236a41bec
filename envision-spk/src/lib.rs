//! envision-spk: Speech output coordination for envision
//!
//! Provides spoken feedback for visually impaired users with:
//! - Feature-flag gating of canned phrases
//! - One utterance in flight, with immediate interruption and a bounded queue
//! - Deferral to the platform screen reader while it is running
//! - Pause on UI focus changes with a delayed resume
//! - Voice and rate preferences with a guaranteed fallback voice

pub mod error;
pub mod config;
pub mod phrase;
pub mod gate;
pub mod voice;
pub mod settings;
pub mod utterance;
pub mod engines;
pub mod accessibility;
mod listeners;
pub mod output;
pub mod coordinator;

pub use error::SpeechError;
pub use config::SpeechConfig;
pub use phrase::{OptionFlags, Phrase, PhraseCatalog};
pub use gate::AnnouncementGate;
pub use voice::{Voice, VoiceName, VoicePreferences, VoiceProfile, VoiceSpeed};
pub use settings::{MemorySettings, SettingsKey, SettingsStore, VoiceSettings};
pub use utterance::{Completion, CompletionHandler, Utterance, UtteranceId, UtteranceRequest};
pub use engines::{EngineEvent, SpeechBoundary, SpeechEngine};
pub use engines::headless::HeadlessEngine;
pub use accessibility::{AccessibilityEvent, AccessibilityService, HeadlessAccessibility, Notification};
pub use output::{CompletionSignal, OutputRoute, OutputSink};
pub use coordinator::{CoordinatorState, SpeechCoordinator};
