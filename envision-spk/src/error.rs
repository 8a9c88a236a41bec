//! Error types for envision-spk

use crate::phrase::Phrase;
use thiserror::Error;

/// Speech coordination errors
///
/// `ConfigurationMiss`, `VoiceResolutionFailure` and `EngineBusyIgnored` are
/// degradations: they are logged where they happen and the coordinator keeps
/// going. Only the remaining variants are ever returned to callers.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("No announcement flag mapped for phrase {0:?}")]
    ConfigurationMiss(Phrase),

    #[error("Voice '{0}' is not available")]
    VoiceResolutionFailure(String),

    #[error("Engine rejected pause request")]
    EngineBusyIgnored,

    #[error("Speech queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Utterance text cannot be empty")]
    EmptyUtterance,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// Whether the error only degrades output instead of rejecting a request
    pub fn is_degradation(&self) -> bool {
        matches!(
            self,
            SpeechError::ConfigurationMiss(_)
                | SpeechError::VoiceResolutionFailure(_)
                | SpeechError::EngineBusyIgnored
        )
    }
}
