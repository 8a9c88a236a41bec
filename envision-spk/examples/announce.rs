//! Drives a coordinator against the headless engine and screen reader

use envision_spk::{
    AccessibilityEvent, HeadlessAccessibility, HeadlessEngine, OptionFlags, Phrase,
    SpeechConfig, SpeechCoordinator, UtteranceRequest,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = SpeechConfig::from_env();
    config.options = OptionFlags::WELCOME_MESSAGE | OptionFlags::FACES;
    config.resume_delay_ms = 500;

    let engine = Arc::new(HeadlessEngine::new());
    let accessibility = Arc::new(HeadlessAccessibility::new(false));
    let coordinator = SpeechCoordinator::new(config, engine.clone(), accessibility.clone())?;

    coordinator.speak_phrase(Phrase::WelcomeMessage, false)?;
    // Not enabled above, dropped silently
    coordinator.speak_phrase(Phrase::MissedVoiceInput, false)?;

    coordinator.speak(
        UtteranceRequest::new(["Two", "people", "in", "front", "of", "you"]).on_finished(
            |_, utterance, completion| println!("{:?}: {}", completion, utterance.text),
        ),
    )?;

    if let Some(event) = engine.finish_current() {
        coordinator.handle_engine_event(event);
    }

    coordinator.handle_accessibility_event(AccessibilityEvent::ElementFocused);
    println!("after focus change: {:?}", coordinator.state());
    tokio::time::sleep(Duration::from_millis(600)).await;
    println!("after resume delay: {:?}", coordinator.state());

    if let Some(event) = engine.finish_current() {
        coordinator.handle_engine_event(event);
    }

    accessibility.set_screen_reader_running(true);
    coordinator.speak_phrase(Phrase::Faces, true)?;
    if let Some(event) = accessibility.finish_last() {
        coordinator.handle_accessibility_event(event);
    }

    println!("final: {:?}", coordinator);
    Ok(())
}
