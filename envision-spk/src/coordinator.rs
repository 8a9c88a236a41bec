//! Speech coordinator with queueing, interruption and screen reader routing

use crate::accessibility::{AccessibilityEvent, AccessibilityService, Notification};
use crate::config::SpeechConfig;
use crate::engines::{EngineEvent, SpeechBoundary, SpeechEngine};
use crate::error::SpeechError;
use crate::gate::AnnouncementGate;
use crate::listeners::OneShotListeners;
use crate::output::{CompletionSignal, OutputRoute, OutputSink};
use crate::phrase::{OptionFlags, Phrase};
use crate::settings::{SettingsStore, VoiceSettings};
use crate::utterance::{
    compose_texts, Completion, CompletionHandler, Utterance, UtteranceId, UtteranceRequest,
};
use crate::voice::{Voice, VoicePreferences, VoiceProfile, VoiceSpeed};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Halts with cancellation handlers before an immediate request discards them
const MAX_INTERRUPT_ROUNDS: usize = 8;

/// Coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Speaking,
    SpeakingViaScreenReader,
    PausedForFocusChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerAction {
    FinishAnnouncement(UtteranceId),
    PauseForFocus(UtteranceId),
}

struct ActiveUtterance {
    utterance: Utterance,
    route: OutputRoute,
    awaiting: CompletionSignal,
    handler: Option<CompletionHandler>,
    wants_cancellation_signal: bool,
}

struct PendingRequest {
    id: UtteranceId,
    request: UtteranceRequest,
}

struct CoordinatorCore {
    state: CoordinatorState,
    active: Option<ActiveUtterance>,
    pending: VecDeque<PendingRequest>,
    listeners: OneShotListeners<ListenerAction>,
    next_id: u64,
    pause_generation: u64,
    resume_task: Option<JoinHandle<()>>,
}

impl CoordinatorCore {
    fn new() -> Self {
        Self {
            state: CoordinatorState::Idle,
            active: None,
            pending: VecDeque::new(),
            listeners: OneShotListeners::new(),
            next_id: 1,
            pause_generation: 0,
            resume_task: None,
        }
    }

    fn is_busy(&self) -> bool {
        self.state != CoordinatorState::Idle || self.active.is_some() || !self.pending.is_empty()
    }

    fn allocate_id(&mut self) -> UtteranceId {
        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        id
    }

    fn active_id(&self) -> Option<UtteranceId> {
        self.active.as_ref().map(|active| active.utterance.id)
    }

    /// Invalidate any scheduled resume
    fn cancel_resume(&mut self) {
        self.pause_generation += 1;
        if let Some(task) = self.resume_task.take() {
            task.abort();
        }
    }
}

struct Inner {
    config: SpeechConfig,
    engine: Arc<dyn SpeechEngine>,
    accessibility: Arc<dyn AccessibilityService>,
    gate: RwLock<AnnouncementGate>,
    preferences: RwLock<VoicePreferences>,
    core: Mutex<CoordinatorCore>,
    runtime: Option<Handle>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(task) = self.core.get_mut().resume_task.take() {
            task.abort();
        }
    }
}

/// Serializes speech output for one engine.
///
/// At most one utterance is in flight. Handlers run without any internal
/// lock held, so they may call back into the coordinator.
#[derive(Clone)]
pub struct SpeechCoordinator {
    inner: Arc<Inner>,
}

impl SpeechCoordinator {
    /// Create a coordinator.
    ///
    /// Focus-change pauses are resumed on the tokio runtime current at this
    /// point; without one, focus changes never pause speech.
    pub fn new(
        config: SpeechConfig,
        engine: Arc<dyn SpeechEngine>,
        accessibility: Arc<dyn AccessibilityService>,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let mut preferences = VoicePreferences::new(config.fallback_language.clone());
        preferences.set_voice(config.voice.identifier(), engine.as_ref());
        preferences.set_speed(config.speed);

        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            warn!("No tokio runtime available, focus changes will not pause speech");
        }

        info!(
            engine = engine.name(),
            voice = %preferences.profile(),
            options = ?config.options,
            "Speech coordinator initialized"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                gate: RwLock::new(AnnouncementGate::new(config.options)),
                preferences: RwLock::new(preferences),
                core: Mutex::new(CoordinatorCore::new()),
                config,
                engine,
                accessibility,
                runtime,
            }),
        })
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.inner.config
    }

    pub fn engine(&self) -> &Arc<dyn SpeechEngine> {
        &self.inner.engine
    }

    pub fn state(&self) -> CoordinatorState {
        self.inner.core.lock().state
    }

    pub fn is_idle(&self) -> bool {
        !self.inner.core.lock().is_busy()
    }

    /// Utterance currently being spoken or announced
    pub fn active_utterance(&self) -> Option<Utterance> {
        self.inner
            .core
            .lock()
            .active
            .as_ref()
            .map(|active| active.utterance.clone())
    }

    /// Requests waiting behind the active one
    pub fn pending_len(&self) -> usize {
        self.inner.core.lock().pending.len()
    }

    /// One-shot listeners currently armed
    pub fn armed_listeners(&self) -> usize {
        self.inner.core.lock().listeners.len()
    }

    // Preferences

    pub fn voice_profile(&self) -> VoiceProfile {
        self.inner.preferences.read().profile()
    }

    pub fn fallback_used(&self) -> bool {
        self.inner.preferences.read().fallback_used()
    }

    /// Switch voice. Unavailable voices fall back to the default voice.
    pub fn set_voice(&self, identity: &str) -> Voice {
        self.inner
            .preferences
            .write()
            .set_voice(identity, self.inner.engine.as_ref())
            .clone()
    }

    pub fn set_rate(&self, multiplier: f32) -> f32 {
        self.inner.preferences.write().set_rate(multiplier)
    }

    pub fn set_speed(&self, speed: VoiceSpeed) -> f32 {
        self.inner.preferences.write().set_speed(speed)
    }

    /// Apply voice and speed from the persisted settings
    pub fn apply_settings(&self, store: &dyn SettingsStore) -> VoiceSettings {
        let settings = VoiceSettings::load(store);
        self.set_voice(settings.voice.identifier());
        self.set_speed(settings.speed);
        settings
    }

    pub fn options(&self) -> OptionFlags {
        self.inner.gate.read().options()
    }

    pub fn set_options(&self, options: OptionFlags) {
        info!(options = ?options, "Announcement options changed");
        self.inner.gate.write().set_options(options);
    }

    pub fn allowed(&self, phrase: Phrase) -> bool {
        self.inner.gate.read().allowed(phrase)
    }

    // Speaking

    /// Speak a canned phrase. Gated-out phrases are dropped and return `Ok(None)`.
    pub fn speak_phrase(
        &self,
        phrase: Phrase,
        immediate: bool,
    ) -> Result<Option<UtteranceId>, SpeechError> {
        if !self.allowed(phrase) {
            debug!(phrase = ?phrase, "Phrase not enabled, skipping");
            return Ok(None);
        }
        self.speak(UtteranceRequest::text(phrase.text()).immediate(immediate))
            .map(Some)
    }

    pub fn speak_text(&self, text: &str, immediate: bool) -> Result<UtteranceId, SpeechError> {
        self.speak(UtteranceRequest::text(text).immediate(immediate))
    }

    /// Speak a request.
    ///
    /// Immediate requests stop whatever is in flight first, including speech
    /// started by cancellation handlers, and are never queued. Other requests
    /// made while busy wait in a bounded queue.
    pub fn speak(&self, request: UtteranceRequest) -> Result<UtteranceId, SpeechError> {
        if request.compose().is_empty() {
            return Err(SpeechError::EmptyUtterance);
        }

        let mut interrupts = 0;
        let id = loop {
            let mut core = self.inner.core.lock();
            if core.is_busy() && request.immediate {
                // Cancellation handlers may start new speech, which is interrupted too
                drop(core);
                interrupts += 1;
                let notify = interrupts <= MAX_INTERRUPT_ROUNDS;
                if !notify {
                    warn!(rounds = MAX_INTERRUPT_ROUNDS, "Handlers keep restarting speech, discarding them");
                }
                self.halt(notify);
                continue;
            }

            let id = core.allocate_id();
            if core.is_busy() {
                let capacity = self.inner.config.queue_size;
                if core.pending.len() >= capacity {
                    warn!(id = %id, capacity, "Speech queue full, dropping request");
                    return Err(SpeechError::QueueFull { capacity });
                }
                core.pending.push_back(PendingRequest { id, request });
                debug!(id = %id, queued = core.pending.len(), "Coordinator busy, request queued");
                return Ok(id);
            }
            break id;
        };

        self.start(id, request);
        Ok(id)
    }

    /// Stop speaking. Drops queued requests and fires cancellation handlers
    /// of requests that asked for them. No-op when idle.
    pub fn stop(&self) {
        self.halt(true);
    }

    /// Stop speaking and discard every handler without calling it
    pub fn reset(&self) {
        self.halt(false);
    }

    // Platform signals

    pub fn handle_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::Finished(id) => self.complete(
                |active| active.awaiting == CompletionSignal::EngineFinished(id),
                Completion::Finished,
            ),
            EngineEvent::Cancelled(id) => self.complete(
                |active| active.awaiting == CompletionSignal::EngineFinished(id),
                Completion::Cancelled,
            ),
        }
    }

    pub fn handle_accessibility_event(&self, event: AccessibilityEvent) {
        if let AccessibilityEvent::AnnouncementFinished { successful: false, text } = &event {
            debug!("Screen reader reported unsuccessful announcement: {}", text);
        }

        let actions = self.inner.core.lock().listeners.fire(event.notification());
        for action in actions {
            match action {
                ListenerAction::FinishAnnouncement(id) => self.complete(
                    |active| active.utterance.id == id && active.route == OutputRoute::ScreenReader,
                    Completion::Finished,
                ),
                ListenerAction::PauseForFocus(id) => self.pause_for_focus_change(id),
            }
        }
    }

    // Internals

    fn compose(&self, id: UtteranceId, texts: &[String]) -> Utterance {
        let preferences = self.inner.preferences.read();
        Utterance {
            id,
            text: compose_texts(texts),
            voice: preferences.voice().clone(),
            rate: preferences.utterance_rate(self.inner.engine.as_ref()),
        }
    }

    fn start(&self, id: UtteranceId, request: UtteranceRequest) {
        let sink = OutputSink::select(self.inner.engine.as_ref(), self.inner.accessibility.as_ref());
        let route = sink.route();
        let utterance = self.compose(id, &request.texts);
        let UtteranceRequest {
            wants_cancellation_signal,
            on_finished,
            ..
        } = request;

        {
            let mut core = self.inner.core.lock();
            match route {
                OutputRoute::Synthesizer => {
                    core.listeners
                        .arm(Notification::ElementFocused, ListenerAction::PauseForFocus(id));
                    core.state = CoordinatorState::Speaking;
                }
                OutputRoute::ScreenReader => {
                    core.listeners.arm(
                        Notification::AnnouncementDidFinish,
                        ListenerAction::FinishAnnouncement(id),
                    );
                    core.state = CoordinatorState::SpeakingViaScreenReader;
                }
            }
            core.active = Some(ActiveUtterance {
                utterance: utterance.clone(),
                route,
                awaiting: sink.completion_signal(id),
                handler: on_finished,
                wants_cancellation_signal,
            });
        }

        info!(id = %id, route = ?route, "Speaking: {}", utterance.text);
        let signal = sink.announce(&utterance);
        debug!(id = %id, signal = ?signal, "Awaiting completion");
    }

    /// End the active utterance if `matches` accepts it, then start the next queued one
    fn complete<F>(&self, matches: F, completion: Completion)
    where
        F: Fn(&ActiveUtterance) -> bool,
    {
        let active = {
            let mut core = self.inner.core.lock();
            if !core.active.as_ref().is_some_and(&matches) {
                debug!(completion = ?completion, "Ignoring signal for stale utterance");
                return;
            }
            let Some(active) = core.active.take() else {
                return;
            };
            core.listeners.clear();
            core.cancel_resume();
            core.state = CoordinatorState::Idle;
            active
        };

        info!(id = %active.utterance.id, completion = ?completion, "Utterance ended");

        let notify = completion == Completion::Finished || active.wants_cancellation_signal;
        if notify {
            if let Some(handler) = active.handler {
                handler(self, &active.utterance, completion);
            }
        }

        self.drain_pending();
    }

    fn drain_pending(&self) {
        let next = {
            let mut core = self.inner.core.lock();
            if core.state != CoordinatorState::Idle || core.active.is_some() {
                return;
            }
            core.pending.pop_front()
        };

        if let Some(PendingRequest { id, request }) = next {
            debug!(id = %id, "Starting queued request");
            self.start(id, request);
        }
    }

    fn halt(&self, notify: bool) {
        let (active, pending) = {
            let mut core = self.inner.core.lock();
            if !core.is_busy() {
                return;
            }
            let detached = core.listeners.clear();
            core.cancel_resume();
            core.state = CoordinatorState::Idle;
            debug!(listeners = detached, "Detached listeners");
            (core.active.take(), core.pending.drain(..).collect::<Vec<_>>())
        };

        if let Some(active) = &active {
            if active.route == OutputRoute::Synthesizer && self.inner.engine.is_speaking() {
                self.inner.engine.stop(SpeechBoundary::Immediate);
            }
        }

        info!(
            active = ?active.as_ref().map(|a| a.utterance.id),
            dropped = pending.len(),
            "Speech stopped"
        );

        if !notify {
            return;
        }

        if let Some(active) = active {
            if active.wants_cancellation_signal {
                if let Some(handler) = active.handler {
                    handler(self, &active.utterance, Completion::Cancelled);
                }
            }
        }

        for PendingRequest { id, request } in pending {
            if !request.wants_cancellation_signal {
                continue;
            }
            let utterance = self.compose(id, &request.texts);
            if let Some(handler) = request.on_finished {
                handler(self, &utterance, Completion::Cancelled);
            }
        }
    }

    fn pause_for_focus_change(&self, id: UtteranceId) {
        let state = {
            let core = self.inner.core.lock();
            if core.active_id() != Some(id) {
                return;
            }
            core.state
        };

        match state {
            CoordinatorState::Speaking => {
                if self.inner.runtime.is_none() {
                    warn!(id = %id, "Cannot schedule resume without a runtime, not pausing");
                    self.rearm_focus_listener(id);
                    return;
                }

                let paused = self.inner.engine.pause(SpeechBoundary::Word);

                let mut core = self.inner.core.lock();
                if core.active_id() != Some(id) {
                    return;
                }
                if paused {
                    core.state = CoordinatorState::PausedForFocusChange;
                    self.schedule_resume(&mut core);
                    info!(id = %id, delay_ms = self.inner.config.resume_delay_ms, "Paused for focus change");
                } else {
                    debug!(id = %id, "{}", SpeechError::EngineBusyIgnored);
                }
                core.listeners
                    .arm(Notification::ElementFocused, ListenerAction::PauseForFocus(id));
            }
            CoordinatorState::PausedForFocusChange => {
                let mut core = self.inner.core.lock();
                if core.active_id() != Some(id) {
                    return;
                }
                self.schedule_resume(&mut core);
                core.listeners
                    .arm(Notification::ElementFocused, ListenerAction::PauseForFocus(id));
                debug!(id = %id, "Focus changed again, resume rescheduled");
            }
            CoordinatorState::Idle | CoordinatorState::SpeakingViaScreenReader => {}
        }
    }

    fn rearm_focus_listener(&self, id: UtteranceId) {
        let mut core = self.inner.core.lock();
        if core.active_id() == Some(id) {
            core.listeners
                .arm(Notification::ElementFocused, ListenerAction::PauseForFocus(id));
        }
    }

    fn schedule_resume(&self, core: &mut CoordinatorCore) {
        core.cancel_resume();
        let Some(runtime) = &self.inner.runtime else {
            return;
        };

        let generation = core.pause_generation;
        let delay = self.inner.config.resume_delay();
        let weak = Arc::downgrade(&self.inner);
        core.resume_task = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                SpeechCoordinator { inner }.resume_after_pause(generation);
            }
        }));
    }

    fn resume_after_pause(&self, generation: u64) {
        {
            let mut core = self.inner.core.lock();
            if core.state != CoordinatorState::PausedForFocusChange
                || core.pause_generation != generation
            {
                debug!(generation, "Ignoring stale resume");
                return;
            }
            core.state = CoordinatorState::Speaking;
            core.resume_task = None;
        }

        if self.inner.engine.resume() {
            info!("Resumed after focus change");
        } else {
            warn!("Engine did not resume after focus-change pause");
        }
    }
}

impl fmt::Debug for SpeechCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.core.lock();
        f.debug_struct("SpeechCoordinator")
            .field("engine", &self.inner.engine.name())
            .field("state", &core.state)
            .field("active", &core.active_id())
            .field("pending", &core.pending.len())
            .field("listeners", &core.listeners.len())
            .finish()
    }
}
