//! Speech engine implementations

pub mod headless;

use crate::utterance::{Utterance, UtteranceId};
use crate::voice::Voice;

/// Where an engine may stop or pause within an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechBoundary {
    Immediate,
    Word,
}

/// Signals an engine delivers back to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Finished(UtteranceId),
    Cancelled(UtteranceId),
}

/// Trait for platform text-to-speech engines.
///
/// Calls never block: `speak` only submits, and the outcome is reported later
/// through [`EngineEvent`]s fed to the coordinator.
pub trait SpeechEngine: Send + Sync {
    /// Submit an utterance for synthesis
    fn speak(&self, utterance: &Utterance);

    /// Pause at the given boundary. Returns false if the engine refused.
    fn pause(&self, boundary: SpeechBoundary) -> bool;

    /// Continue after a pause
    fn resume(&self) -> bool;

    /// Stop speaking at the given boundary
    fn stop(&self, boundary: SpeechBoundary) -> bool;

    /// Whether an utterance is in progress (paused counts as speaking)
    fn is_speaking(&self) -> bool;

    /// Rate used when the multiplier is 1.0
    fn default_rate(&self) -> f32;

    /// Legal utterance rate range as (min, max)
    fn rate_range(&self) -> (f32, f32);

    /// Installed voices
    fn voices(&self) -> Vec<Voice>;

    /// Best installed voice for a language code
    fn voice_for_language(&self, language: &str) -> Option<Voice>;

    /// Get engine name
    fn name(&self) -> &'static str;
}
