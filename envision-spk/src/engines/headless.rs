//! Engine without audio output.
//! Tracks what would have been spoken; used for headless runs and tests.

use crate::engines::{EngineEvent, SpeechBoundary, SpeechEngine};
use crate::utterance::Utterance;
use crate::voice::{Voice, DEFAULT_LANGUAGE};
use parking_lot::Mutex;
use tracing::{debug, info};

/// A call the headless engine received
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Speak(String),
    Pause(SpeechBoundary),
    Resume,
    Stop(SpeechBoundary),
}

#[derive(Default)]
struct HeadlessState {
    current: Option<Utterance>,
    paused: bool,
    calls: Vec<EngineCall>,
    spoken: Vec<Utterance>,
}

pub struct HeadlessEngine {
    voices: Vec<Voice>,
    pause_supported: bool,
    state: Mutex<HeadlessState>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::with_voices(vec![
            Voice::new("com.apple.ttsbundle.Samantha-compact", DEFAULT_LANGUAGE),
            Voice::new("com.apple.ttsbundle.siri_female_en-US_compact", DEFAULT_LANGUAGE),
            Voice::new("com.apple.ttsbundle.siri_male_en-GB_compact", "en-GB"),
        ])
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            pause_supported: true,
            state: Mutex::new(HeadlessState::default()),
        }
    }

    /// Make every pause request fail
    pub fn without_pause(mut self) -> Self {
        self.pause_supported = false;
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().calls.clone()
    }

    /// Every utterance submitted so far
    pub fn spoken(&self) -> Vec<Utterance> {
        self.state.lock().spoken.clone()
    }

    pub fn current(&self) -> Option<Utterance> {
        self.state.lock().current.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    /// Complete the current utterance. Feed the event to the coordinator.
    pub fn finish_current(&self) -> Option<EngineEvent> {
        let mut state = self.state.lock();
        state.paused = false;
        state.current.take().map(|utterance| {
            debug!(id = %utterance.id, "Headless utterance finished");
            EngineEvent::Finished(utterance.id)
        })
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for HeadlessEngine {
    fn speak(&self, utterance: &Utterance) {
        info!(id = %utterance.id, rate = utterance.rate, "speak: {}", utterance.text);
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Speak(utterance.text.clone()));
        state.spoken.push(utterance.clone());
        state.current = Some(utterance.clone());
        state.paused = false;
    }

    fn pause(&self, boundary: SpeechBoundary) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Pause(boundary));
        if !self.pause_supported || state.current.is_none() || state.paused {
            return false;
        }
        state.paused = true;
        true
    }

    fn resume(&self) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Resume);
        if !state.paused {
            return false;
        }
        state.paused = false;
        true
    }

    fn stop(&self, boundary: SpeechBoundary) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Stop(boundary));
        state.paused = false;
        state.current.take().is_some()
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().current.is_some()
    }

    fn default_rate(&self) -> f32 {
        0.5
    }

    fn rate_range(&self) -> (f32, f32) {
        (0.0, 1.0)
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn voice_for_language(&self, language: &str) -> Option<Voice> {
        self.voices
            .iter()
            .find(|voice| voice.language == language)
            .cloned()
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}
