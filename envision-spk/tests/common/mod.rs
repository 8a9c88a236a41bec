//! Shared fixtures for coordinator tests

#![allow(dead_code)]

use envision_spk::{
    Completion, HeadlessAccessibility, HeadlessEngine, SpeechConfig, SpeechCoordinator,
    Utterance, UtteranceRequest,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct Fixture {
    pub coordinator: SpeechCoordinator,
    pub engine: Arc<HeadlessEngine>,
    pub accessibility: Arc<HeadlessAccessibility>,
}

pub fn fixture() -> Fixture {
    fixture_with(SpeechConfig::default(), HeadlessEngine::new())
}

pub fn fixture_with(config: SpeechConfig, engine: HeadlessEngine) -> Fixture {
    let engine = Arc::new(engine);
    let accessibility = Arc::new(HeadlessAccessibility::new(false));
    let coordinator = SpeechCoordinator::new(config, engine.clone(), accessibility.clone())
        .expect("valid config");
    Fixture {
        coordinator,
        engine,
        accessibility,
    }
}

impl Fixture {
    /// Let the engine finish whatever it is speaking
    pub fn finish_engine(&self) {
        let event = self.engine.finish_current().expect("engine was speaking");
        self.coordinator.handle_engine_event(event);
    }

    /// Let the screen reader finish its last announcement
    pub fn finish_announcement(&self) {
        let event = self.accessibility.finish_last().expect("announcement posted");
        self.coordinator.handle_accessibility_event(event);
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.engine.spoken().into_iter().map(|u| u.text).collect()
    }
}

/// Records every handler invocation as (tag, text, completion)
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<(String, String, Completion)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request<I, S>(&self, tag: &str, texts: I) -> UtteranceRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let events = self.events.clone();
        let tag = tag.to_string();
        UtteranceRequest::new(texts).on_finished(
            move |_: &SpeechCoordinator, utterance: &Utterance, completion: Completion| {
                events.lock().push((tag, utterance.text.clone(), completion));
            },
        )
    }

    pub fn events(&self) -> Vec<(String, String, Completion)> {
        self.events.lock().clone()
    }

    pub fn tags(&self) -> Vec<(String, Completion)> {
        self.events
            .lock()
            .iter()
            .map(|(tag, _, completion)| (tag.clone(), *completion))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}
