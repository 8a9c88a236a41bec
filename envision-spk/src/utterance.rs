//! Speech requests and the utterances built from them

use crate::coordinator::SpeechCoordinator;
use crate::voice::Voice;
use std::fmt;

/// Identifies one accepted speech request within a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub(crate) u64);

impl UtteranceId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of text handed to an output sink, with the voice and rate it is spoken with
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub voice: Voice,
    pub rate: f32,
}

/// How a request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Finished,
    Cancelled,
}

/// Called once when a request finishes, or is cancelled if it asked to be told
pub type CompletionHandler = Box<dyn FnOnce(&SpeechCoordinator, &Utterance, Completion) + Send + 'static>;

/// A request to speak some texts as one utterance
pub struct UtteranceRequest {
    pub(crate) texts: Vec<String>,
    pub(crate) immediate: bool,
    pub(crate) wants_cancellation_signal: bool,
    pub(crate) on_finished: Option<CompletionHandler>,
}

impl UtteranceRequest {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            immediate: false,
            wants_cancellation_signal: false,
            on_finished: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new([text.into()])
    }

    /// Interrupt whatever is being spoken instead of waiting behind it
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Also invoke the completion handler when the request is cancelled
    pub fn with_cancellation_signal(mut self, wants: bool) -> Self {
        self.wants_cancellation_signal = wants;
        self
    }

    pub fn on_finished<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&SpeechCoordinator, &Utterance, Completion) + Send + 'static,
    {
        self.on_finished = Some(Box::new(handler));
        self
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    pub fn wants_cancellation_signal(&self) -> bool {
        self.wants_cancellation_signal
    }

    /// Texts joined by single spaces. Empty texts still add their separator.
    pub fn compose(&self) -> String {
        compose_texts(&self.texts)
    }
}

impl fmt::Debug for UtteranceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtteranceRequest")
            .field("texts", &self.texts)
            .field("immediate", &self.immediate)
            .field("wants_cancellation_signal", &self.wants_cancellation_signal)
            .field("on_finished", &self.on_finished.is_some())
            .finish()
    }
}

pub fn compose_texts<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}
