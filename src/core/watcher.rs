//! # Lifecycle watcher.
//!
//! Turns application lifecycle signals into a delayed restart of every resource. Only
//! two transitions matter: the application becoming visible again, and the page being
//! shown from the history cache. Everything else is ignored.
//!
//! The watcher only decides; the reactor arms the settle timer under the global key,
//! so a burst of signals inside the settle window collapses into one restart.

use std::time::Duration;

use crate::events::EventKind;

/// Application lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleSignal {
    /// Visibility flipped; `hidden = false` means back in the foreground.
    VisibilityChanged { hidden: bool },
    /// Page shown; `persisted = true` means restored from the history cache.
    PageShown { persisted: bool },
}

/// Decides which lifecycle signals trigger a restart-all.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleWatcher {
    settle: Duration,
}

impl LifecycleWatcher {
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    /// Delay between a triggering signal and the restart.
    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Returns the event to publish when `signal` should trigger a restart.
    pub fn react(&self, signal: LifecycleSignal) -> Option<EventKind> {
        match signal {
            LifecycleSignal::VisibilityChanged { hidden: false } => {
                Some(EventKind::VisibilityRestored)
            }
            LifecycleSignal::PageShown { persisted: true } => Some(EventKind::HistoryRestored),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_foreground_and_restore_trigger() {
        let w = LifecycleWatcher::new(Duration::from_millis(300));
        assert_eq!(
            w.react(LifecycleSignal::VisibilityChanged { hidden: false }),
            Some(EventKind::VisibilityRestored)
        );
        assert_eq!(
            w.react(LifecycleSignal::PageShown { persisted: true }),
            Some(EventKind::HistoryRestored)
        );
        assert_eq!(w.react(LifecycleSignal::VisibilityChanged { hidden: true }), None);
        assert_eq!(w.react(LifecycleSignal::PageShown { persisted: false }), None);
        assert_eq!(w.settle(), Duration::from_millis(300));
    }
}
