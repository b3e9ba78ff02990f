//! # Scheduler: cancellable delayed actions.
//!
//! Every deferred action the reactor arms (stall recheck, reload, retry, settle restart)
//! goes through the [`Scheduler`]. Each [`TimerKey`] owns at most one pending entry.
//!
//! ```text
//! arm(job, delay)
//!   ├─► disarm(job.key())        cancel previous entry (token.cancel())
//!   ├─► ticket += 1              record {ticket, token}
//!   └─► spawn: select! {
//!           token.cancelled()   → exit silently
//!           sleep(delay)        → send Command::Timer { job, ticket }
//!       }
//!
//! reactor receives Command::Timer
//!   └─► complete(key, ticket)?  current → apply
//!                               stale   → drop (StaleOutcomeDropped)
//! ```
//!
//! ## Rules
//! - Arming a key cancels and replaces its previous entry.
//! - A timer that already sent its command before being cancelled is caught by the
//!   ticket check; only the current ticket is applied.
//! - Tickets increase monotonically across all keys.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::reactor::Command;
use crate::core::registry::ResourceId;
use crate::machine::Deferred;

/// Slot a pending timer occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// One slot per managed resource.
    Resource(ResourceId),
    /// The lifecycle watcher's settle timer.
    Global,
}

/// What to do when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    /// Feed `Input::Fired` for the resource.
    Deferred(ResourceId, Deferred),
    /// Restart every resource after the settle delay.
    SettleRestart,
}

impl Job {
    pub fn key(&self) -> TimerKey {
        match self {
            Job::Deferred(id, _) => TimerKey::Resource(*id),
            Job::SettleRestart => TimerKey::Global,
        }
    }
}

struct Entry {
    ticket: u64,
    token: CancellationToken,
}

/// Keyed timers that report back to the reactor.
pub struct Scheduler {
    entries: HashMap<TimerKey, Entry>,
    next_ticket: u64,
    root: CancellationToken,
    tx: mpsc::WeakSender<Command>,
}

impl Scheduler {
    /// Creates a scheduler reporting into the reactor's queue.
    ///
    /// Holds only a weak sender so pending timers never keep the reactor alive.
    pub fn new(tx: mpsc::WeakSender<Command>) -> Self {
        Self {
            entries: HashMap::new(),
            next_ticket: 0,
            root: CancellationToken::new(),
            tx,
        }
    }

    /// Arms `job` after `delay`, replacing any entry under the same key.
    ///
    /// Returns the ticket of the new entry. Must be called inside a tokio runtime.
    pub fn arm(&mut self, job: Job, delay: Duration) -> u64 {
        let key = job.key();
        self.disarm(key);

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let token = self.root.child_token();
        self.entries.insert(
            key,
            Entry {
                ticket,
                token: token.clone(),
            },
        );

        let Some(tx) = self.tx.upgrade() else {
            return ticket;
        };
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(Command::Timer { job, ticket }).await;
                }
            }
        });
        ticket
    }

    /// Cancels the entry under `key`. Returns whether one was pending.
    pub fn disarm(&mut self, key: TimerKey) -> bool {
        match self.entries.remove(&key) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Consumes the entry if `ticket` is the current one for `key`.
    ///
    /// Returns `false` for superseded or cancelled timers.
    pub fn complete(&mut self, key: TimerKey, ticket: u64) -> bool {
        match self.entries.get(&key) {
            Some(entry) if entry.ticket == ticket => {
                self.entries.remove(&key);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Cancels every pending timer.
    pub fn cancel_all(&mut self) {
        self.root.cancel();
        self.entries.clear();
    }
}
