//! Scripted media handle for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::MediaError;
use crate::media::handle::{MediaHandle, NetworkState, ReadyState};

#[derive(Default)]
struct Inner {
    loads: u32,
    plays: u32,
    rewinds: u32,
    sources: Vec<String>,
    outcomes: VecDeque<Result<(), MediaError>>,
    ready: ReadyState,
    paused_deliberately: bool,
    play_delay: Duration,
    abort_on_load: bool,
}

/// Records every request and answers `play()` from a script (default: success).
pub struct FakeMedia {
    label: String,
    autoplay: bool,
    inner: Mutex<Inner>,
    /// Load generation; pending plays watch it when `abort_on_load` is set.
    reloads: watch::Sender<u64>,
}

impl FakeMedia {
    pub fn new(label: &str, autoplay: bool) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            autoplay,
            inner: Mutex::new(Inner {
                sources: vec![format!("{label}.mp4")],
                ..Inner::default()
            }),
            reloads: watch::Sender::new(0),
        })
    }

    /// Queues outcomes for the next `play()` calls.
    pub fn script(&self, outcomes: impl IntoIterator<Item = Result<(), MediaError>>) {
        self.inner.lock().unwrap().outcomes.extend(outcomes);
    }

    pub fn reject_times(&self, n: usize) {
        self.script((0..n).map(|_| {
            Err(MediaError::NotAllowed {
                reason: "autoplay blocked".into(),
            })
        }));
    }

    /// Makes every `play()` resolve only after `delay`.
    pub fn set_play_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().play_delay = delay;
    }

    /// Makes `load()` abort a pending `play()` with [`MediaError::Aborted`], as
    /// browsers do.
    pub fn abort_pending_play_on_load(&self, yes: bool) {
        self.inner.lock().unwrap().abort_on_load = yes;
    }

    pub fn set_ready(&self, ready: ReadyState) {
        self.inner.lock().unwrap().ready = ready;
    }

    pub fn set_paused_deliberately(&self, yes: bool) {
        self.inner.lock().unwrap().paused_deliberately = yes;
    }

    pub fn loads(&self) -> u32 {
        self.inner.lock().unwrap().loads
    }

    pub fn plays(&self) -> u32 {
        self.inner.lock().unwrap().plays
    }

    pub fn rewinds(&self) -> u32 {
        self.inner.lock().unwrap().rewinds
    }

    pub fn sources(&self) -> Vec<String> {
        self.inner.lock().unwrap().sources.clone()
    }
}

#[async_trait]
impl MediaHandle for FakeMedia {
    fn label(&self) -> &str {
        &self.label
    }

    fn autoplay(&self) -> bool {
        self.autoplay
    }

    fn load(&self) {
        self.inner.lock().unwrap().loads += 1;
        self.reloads.send_modify(|generation| *generation += 1);
    }

    async fn play(&self) -> Result<(), MediaError> {
        let mut reloads = self.reloads.subscribe();
        let (delay, outcome, abortable) = {
            let mut g = self.inner.lock().unwrap();
            g.plays += 1;
            (
                g.play_delay,
                g.outcomes.pop_front().unwrap_or(Ok(())),
                g.abort_on_load,
            )
        };
        if abortable {
            return tokio::select! {
                _ = tokio::time::sleep(delay) => outcome,
                _ = reloads.changed() => Err(MediaError::Aborted),
            };
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    fn rewind(&self) {
        self.inner.lock().unwrap().rewinds += 1;
    }

    fn paused_deliberately(&self) -> bool {
        self.inner.lock().unwrap().paused_deliberately
    }

    fn is_paused(&self) -> bool {
        true
    }

    fn ready_state(&self) -> ReadyState {
        self.inner.lock().unwrap().ready
    }

    fn network_state(&self) -> NetworkState {
        NetworkState::Idle
    }

    fn last_error(&self) -> Option<String> {
        None
    }

    fn source(&self) -> Option<String> {
        self.inner.lock().unwrap().sources.last().cloned()
    }

    fn set_source(&self, src: String) {
        self.inner.lock().unwrap().sources.push(src);
    }
}
