//! Output sinks: the speech engine or the screen reader

use crate::accessibility::{AccessibilityService, Notification};
use crate::engines::SpeechEngine;
use crate::utterance::{Utterance, UtteranceId};

/// Which sink an utterance went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRoute {
    Synthesizer,
    ScreenReader,
}

/// The signal that marks an announced utterance as done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSignal {
    EngineFinished(UtteranceId),
    Notification(Notification),
}

/// Destination for spoken output
pub enum OutputSink<'a> {
    Synthesizer(&'a dyn SpeechEngine),
    ScreenReader(&'a dyn AccessibilityService),
}

impl<'a> OutputSink<'a> {
    /// Defer to the screen reader while it is running, otherwise use the engine
    pub fn select(engine: &'a dyn SpeechEngine, accessibility: &'a dyn AccessibilityService) -> Self {
        if accessibility.is_screen_reader_running() {
            OutputSink::ScreenReader(accessibility)
        } else {
            OutputSink::Synthesizer(engine)
        }
    }

    pub fn route(&self) -> OutputRoute {
        match self {
            OutputSink::Synthesizer(_) => OutputRoute::Synthesizer,
            OutputSink::ScreenReader(_) => OutputRoute::ScreenReader,
        }
    }

    /// Signal that will complete `id` on this sink
    pub fn completion_signal(&self, id: UtteranceId) -> CompletionSignal {
        match self {
            OutputSink::Synthesizer(_) => CompletionSignal::EngineFinished(id),
            OutputSink::ScreenReader(_) => {
                CompletionSignal::Notification(Notification::AnnouncementDidFinish)
            }
        }
    }

    /// Hand the utterance to the sink
    pub fn announce(&self, utterance: &Utterance) -> CompletionSignal {
        match self {
            OutputSink::Synthesizer(engine) => engine.speak(utterance),
            OutputSink::ScreenReader(accessibility) => accessibility.post_announcement(&utterance.text),
        }
        self.completion_signal(utterance.id)
    }
}
