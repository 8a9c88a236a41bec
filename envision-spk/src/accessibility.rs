//! Screen reader seam

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Platform accessibility subsystem
pub trait AccessibilityService: Send + Sync {
    /// Whether a screen reader is currently running
    fn is_screen_reader_running(&self) -> bool;

    /// Ask the screen reader to announce `text`
    fn post_announcement(&self, text: &str);
}

/// Kinds of accessibility notifications a listener can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    AnnouncementDidFinish,
    ElementFocused,
}

/// Accessibility signals delivered to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessibilityEvent {
    AnnouncementFinished { text: String, successful: bool },
    ElementFocused,
}

impl AccessibilityEvent {
    pub fn notification(&self) -> Notification {
        match self {
            AccessibilityEvent::AnnouncementFinished { .. } => Notification::AnnouncementDidFinish,
            AccessibilityEvent::ElementFocused => Notification::ElementFocused,
        }
    }
}

/// Accessibility service with a switchable screen reader and no platform behind it
#[derive(Default)]
pub struct HeadlessAccessibility {
    screen_reader: AtomicBool,
    announcements: Mutex<Vec<String>>,
}

impl HeadlessAccessibility {
    pub fn new(screen_reader_running: bool) -> Self {
        Self {
            screen_reader: AtomicBool::new(screen_reader_running),
            announcements: Mutex::new(Vec::new()),
        }
    }

    pub fn set_screen_reader_running(&self, running: bool) {
        self.screen_reader.store(running, Ordering::SeqCst);
    }

    /// Announcements posted so far
    pub fn announcements(&self) -> Vec<String> {
        self.announcements.lock().clone()
    }

    /// The finish signal for the last posted announcement
    pub fn finish_last(&self) -> Option<AccessibilityEvent> {
        self.announcements
            .lock()
            .last()
            .map(|text| AccessibilityEvent::AnnouncementFinished {
                text: text.clone(),
                successful: true,
            })
    }
}

impl AccessibilityService for HeadlessAccessibility {
    fn is_screen_reader_running(&self) -> bool {
        self.screen_reader.load(Ordering::SeqCst)
    }

    fn post_announcement(&self, text: &str) {
        info!("announce: {}", text);
        self.announcements.lock().push(text.to_string());
    }
}
