//! Canned phrases and the feature flags that gate them

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A phrase the application announces without composing it at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phrase {
    WelcomeMessage,
    Faces,
    NewFaceProcessing,
    MissedVoiceInput,
}

impl Phrase {
    /// Spoken text of the phrase
    pub fn text(self) -> &'static str {
        match self {
            Phrase::WelcomeMessage => "Welcome to Eye Sense",
            Phrase::Faces => "faces",
            Phrase::NewFaceProcessing => "Recognizing face",
            Phrase::MissedVoiceInput => "I missed it. Explain in other words",
        }
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

bitflags! {
    /// Feature switches deciding which phrases may be announced.
    ///
    /// Serialized as flag names joined by `|`, e.g. `"FACES | WELCOME_MESSAGE"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct OptionFlags: u32 {
        const WELCOME_MESSAGE     = 1 << 0;
        const FACES               = 1 << 1;
        const NEW_FACE_PROCESSING = 1 << 2;
        const MISSED_VOICE_INPUT  = 1 << 3;
    }
}

impl Default for OptionFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Known phrases and the flag each one belongs to
pub struct PhraseCatalog;

impl PhraseCatalog {
    const PHRASES: [Phrase; 4] = [
        Phrase::WelcomeMessage,
        Phrase::Faces,
        Phrase::NewFaceProcessing,
        Phrase::MissedVoiceInput,
    ];

    pub fn phrases() -> &'static [Phrase] {
        &Self::PHRASES
    }

    /// Flag a phrase belongs to in the stock mapping
    pub fn flag(phrase: Phrase) -> OptionFlags {
        match phrase {
            Phrase::WelcomeMessage => OptionFlags::WELCOME_MESSAGE,
            Phrase::Faces => OptionFlags::FACES,
            Phrase::NewFaceProcessing => OptionFlags::NEW_FACE_PROCESSING,
            Phrase::MissedVoiceInput => OptionFlags::MISSED_VOICE_INPUT,
        }
    }

    /// Stock phrase-to-flag mapping covering every phrase
    pub fn default_mapping() -> HashMap<Phrase, OptionFlags> {
        Self::PHRASES
            .iter()
            .map(|&phrase| (phrase, Self::flag(phrase)))
            .collect()
    }
}
