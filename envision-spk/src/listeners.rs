//! One-shot notification listeners
//!
//! A listener is armed for one [`Notification`] kind and is removed the first
//! time that notification is delivered, or when the registry is cleared.
//! Every `arm` is balanced by exactly one removal.

use crate::accessibility::Notification;

#[derive(Debug)]
struct Armed<A> {
    kind: Notification,
    action: A,
}

/// Registry of one-shot listeners carrying an action of type `A`
#[derive(Debug)]
pub(crate) struct OneShotListeners<A> {
    armed: Vec<Armed<A>>,
}

impl<A> OneShotListeners<A> {
    pub(crate) fn new() -> Self {
        Self { armed: Vec::new() }
    }

    pub(crate) fn arm(&mut self, kind: Notification, action: A) {
        self.armed.push(Armed { kind, action });
    }

    /// Detach and return every listener waiting for `kind`, in arming order
    pub(crate) fn fire(&mut self, kind: Notification) -> Vec<A> {
        let (fired, kept): (Vec<_>, Vec<_>) =
            self.armed.drain(..).partition(|armed| armed.kind == kind);
        self.armed = kept;
        fired.into_iter().map(|armed| armed.action).collect()
    }

    /// Drop every listener. Returns how many were armed.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.armed.len();
        self.armed.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.armed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_detaches_only_matching_kind() {
        let mut listeners = OneShotListeners::new();
        listeners.arm(Notification::ElementFocused, 1);
        listeners.arm(Notification::AnnouncementDidFinish, 2);
        listeners.arm(Notification::ElementFocused, 3);

        assert_eq!(listeners.fire(Notification::ElementFocused), vec![1, 3]);
        assert_eq!(listeners.len(), 1);
        assert!(listeners.fire(Notification::ElementFocused).is_empty());
        assert_eq!(listeners.fire(Notification::AnnouncementDidFinish), vec![2]);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_clear_reports_count() {
        let mut listeners = OneShotListeners::new();
        listeners.arm(Notification::ElementFocused, ());
        listeners.arm(Notification::AnnouncementDidFinish, ());
        assert_eq!(listeners.clear(), 2);
        assert_eq!(listeners.clear(), 0);
        assert_eq!(listeners.len(), 0);
    }
}
