//! Announcement gating

use crate::error::SpeechError;
use crate::phrase::{OptionFlags, Phrase, PhraseCatalog};
use std::collections::HashMap;
use tracing::warn;

/// Decides whether a canned phrase may be spoken under the configured options
#[derive(Debug, Clone)]
pub struct AnnouncementGate {
    options: OptionFlags,
    mapping: HashMap<Phrase, OptionFlags>,
}

impl AnnouncementGate {
    pub fn new(options: OptionFlags) -> Self {
        Self::with_mapping(options, PhraseCatalog::default_mapping())
    }

    /// Gate with a custom, possibly partial, phrase-to-flag mapping
    pub fn with_mapping(options: OptionFlags, mapping: HashMap<Phrase, OptionFlags>) -> Self {
        Self { options, mapping }
    }

    pub fn options(&self) -> OptionFlags {
        self.options
    }

    pub fn set_options(&mut self, options: OptionFlags) {
        self.options = options;
    }

    /// Flag a phrase is mapped to
    pub fn flag_for(&self, phrase: Phrase) -> Result<OptionFlags, SpeechError> {
        self.mapping
            .get(&phrase)
            .copied()
            .ok_or(SpeechError::ConfigurationMiss(phrase))
    }

    /// Whether `phrase` may be spoken. Unmapped phrases are denied.
    pub fn allowed(&self, phrase: Phrase) -> bool {
        match self.flag_for(phrase) {
            Ok(flag) => !flag.is_empty() && self.options.contains(flag),
            Err(e) => {
                warn!("Denying announcement: {}", e);
                false
            }
        }
    }
}

impl Default for AnnouncementGate {
    fn default() -> Self {
        Self::new(OptionFlags::all())
    }
}
