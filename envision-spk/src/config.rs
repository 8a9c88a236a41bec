//! Configuration for speech coordination

use crate::error::SpeechError;
use crate::phrase::OptionFlags;
use crate::voice::{VoiceName, VoiceSpeed, DEFAULT_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound for the focus-change resume delay
pub const MAX_RESUME_DELAY_MS: u64 = 600_000;

/// Upper bound for queued speech requests
pub const MAX_QUEUE_SIZE: usize = 1024;

const ENV_PREFIX: &str = "ENVISION_SPEECH_";

/// Speech coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    /// Which canned phrases may be announced (all by default)
    pub options: OptionFlags,

    /// Preferred voice
    pub voice: VoiceName,

    /// Playback speed preset
    pub speed: VoiceSpeed,

    /// Locale used when the preferred voice cannot be resolved
    pub fallback_language: String,

    /// Delay before resuming speech paused by a focus change (default 7000 ms)
    pub resume_delay_ms: u64,

    /// Non-immediate requests kept while busy (0 rejects them outright)
    pub queue_size: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            options: OptionFlags::all(),
            voice: VoiceName::SamanthaEnhanced,
            speed: VoiceSpeed::High,
            fallback_language: DEFAULT_LANGUAGE.to_string(),
            resume_delay_ms: 7_000,
            queue_size: 16,
        }
    }
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resume_delay_ms == 0 {
            return Err("Resume delay must be greater than 0".to_string());
        }

        if self.resume_delay_ms > MAX_RESUME_DELAY_MS {
            return Err(format!(
                "Resume delay too large (max {} ms)",
                MAX_RESUME_DELAY_MS
            ));
        }

        if self.queue_size > MAX_QUEUE_SIZE {
            return Err(format!("Queue size too large (max {})", MAX_QUEUE_SIZE));
        }

        if self.fallback_language.is_empty() {
            return Err("Fallback language cannot be empty".to_string());
        }

        if self.fallback_language.len() > 32 {
            return Err("Fallback language too long (max 32 chars)".to_string());
        }

        // "en-US" or "en"
        if !self
            .fallback_language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(
                "Fallback language contains invalid characters (only alphanumeric and '-' allowed)"
                    .to_string(),
            );
        }

        Ok(())
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    /// Load configuration from a JSON or TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpeechError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from JSON or TOML, then validate it
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SpeechError> {
        let config = if let Ok(config) = serde_json::from_str::<SpeechConfig>(content) {
            config
        } else {
            toml::from_str::<SpeechConfig>(content).map_err(|e| {
                SpeechError::Config(format!("Unrecognized configuration format: {}", e))
            })?
        };

        config.validate().map_err(SpeechError::Config)?;
        Ok(config)
    }

    /// Load configuration from `ENVISION_SPEECH_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values are logged and left at their defaults. If the
    /// result fails validation, the whole configuration falls back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut config = Self::default();

        if let Some(options) = var("OPTIONS") {
            match bitflags::parser::from_str::<OptionFlags>(&options) {
                Ok(flags) => config.options = flags,
                Err(e) => tracing::warn!("Ignoring {}OPTIONS: {}", ENV_PREFIX, e),
            }
        }

        if let Some(voice) = var("VOICE") {
            match voice.parse::<VoiceName>() {
                Ok(name) => config.voice = name,
                Err(e) => tracing::warn!("Ignoring {}VOICE: {}", ENV_PREFIX, e),
            }
        }

        if let Some(speed) = var("SPEED") {
            match speed.parse::<VoiceSpeed>() {
                Ok(speed) => config.speed = speed,
                Err(e) => tracing::warn!("Ignoring {}SPEED: {}", ENV_PREFIX, e),
            }
        }

        if let Some(language) = var("LANGUAGE") {
            config.fallback_language = language;
        }

        if let Some(delay) = var("RESUME_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => config.resume_delay_ms = ms,
                Err(e) => tracing::warn!("Ignoring {}RESUME_DELAY_MS: {}", ENV_PREFIX, e),
            }
        }

        if let Some(size) = var("QUEUE_SIZE") {
            match size.parse::<usize>() {
                Ok(n) => config.queue_size = n,
                Err(e) => tracing::warn!("Ignoring {}QUEUE_SIZE: {}", ENV_PREFIX, e),
            }
        }

        if let Err(e) = config.validate() {
            tracing::warn!("Invalid {}* configuration, using defaults: {}", ENV_PREFIX, e);
            return Self::default();
        }

        config
    }
}
