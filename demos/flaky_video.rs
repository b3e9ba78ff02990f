//! # Example: flaky_video
//!
//! Demonstrates how [`Supervisor`] keeps an autoplay video alive when its play requests
//! are rejected, cache-busts the source after a decode error, gives up after
//! `max_attempts`, and recovers on an explicit `restart_all()`.
//!
//! ## Flow
//! ```text
//! attach(document)
//!   ├─► load() + play()            → rejected (autoplay blocked) → retry in 200ms
//!   ├─► load() + play()            → ok → Playing, attempts = 0
//!   ├─► notify(Errored)            → retry in 200ms, source rewritten with t=<token>
//!   ├─► load() + play()            → ok → Playing
//!   ├─► play() rejected × 3        → Failed (RetryExhausted)
//!   └─► restart_all()              → rewind + load() + play() → Playing
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=mediavisor=debug cargo run --example flaky_video
//! ```

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use mediavisor::{
    Config, EventKind, LogWriter, MediaError, MediaHandle, MediaRef, MediaSignal, NetworkState,
    ReadyState, ResourceId, StaticDocument, Subscribe, Supervisor,
};
use tracing_subscriber::EnvFilter;

/// A video whose play requests fail while `rejections` is non-zero.
struct FlakyVideo {
    src: Mutex<String>,
    rejections: AtomicU32,
    loads: AtomicU32,
}

impl FlakyVideo {
    fn new(src: &str, rejections: u32) -> Arc<Self> {
        Arc::new(Self {
            src: Mutex::new(src.to_string()),
            rejections: AtomicU32::new(rejections),
            loads: AtomicU32::new(0),
        })
    }

    fn reject_next(&self, n: u32) {
        self.rejections.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaHandle for FlakyVideo {
    fn label(&self) -> &str {
        "hero-video"
    }

    fn autoplay(&self) -> bool {
        true
    }

    fn load(&self) {
        let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[video] load #{n} from {}", self.source().unwrap_or_default());
    }

    async fn play(&self) -> Result<(), MediaError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let left = self.rejections.load(Ordering::SeqCst);
        if left > 0 {
            self.rejections.store(left - 1, Ordering::SeqCst);
            return Err(MediaError::NotAllowed {
                reason: "autoplay blocked".into(),
            });
        }
        Ok(())
    }

    fn rewind(&self) {
        println!("[video] rewind");
    }

    fn paused_deliberately(&self) -> bool {
        false
    }

    fn is_paused(&self) -> bool {
        false
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveEnoughData
    }

    fn network_state(&self) -> NetworkState {
        NetworkState::Idle
    }

    fn last_error(&self) -> Option<String> {
        None
    }

    fn source(&self) -> Option<String> {
        self.src.lock().ok().map(|s| s.clone())
    }

    fn set_source(&self, src: String) {
        if let Ok(mut cur) = self.src.lock() {
            *cur = src;
        }
    }
}

async fn wait_for(rx: &mut tokio::sync::broadcast::Receiver<mediavisor::Event>, kind: EventKind) {
    while let Ok(ev) = rx.recv().await {
        if ev.kind == kind {
            return;
        }
    }
}

async fn print_health(sup: &Supervisor) {
    for h in sup.health_snapshot().await {
        println!(
            "[health] {} state={} loaded={} playing={} attempts={} ready={}",
            h.label,
            h.state,
            h.loaded,
            h.playing,
            h.attempts,
            h.raw_ready_state()
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mediavisor=info")),
        )
        .init();

    // 1. Short delays so the demo finishes quickly.
    let cfg = Config {
        retry_delay_base: Duration::from_millis(200),
        ..Config::default()
    };

    // 2. Log every event through tracing.
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let sup = Supervisor::builder(cfg).with_subscribers(subs).build();
    let mut rx = sup.subscribe();

    // 3. One autoplay video that is rejected once.
    let video = FlakyVideo::new("https://cdn.example.com/hero.mp4", 1);
    let media: Vec<MediaRef> = vec![video.clone()];
    let doc = StaticDocument::new(media);
    sup.attach(&doc).await?;
    wait_for(&mut rx, EventKind::PlayConfirmed).await;
    print_health(&sup).await;

    // 4. The element reports a decode error: the retry cache-busts the source.
    let id = ResourceId::new(0);
    sup.notify(id, MediaSignal::Errored).await?;
    wait_for(&mut rx, EventKind::PlayConfirmed).await;
    println!("[video] source now {}", video.source().unwrap_or_default());

    // 5. Every further play is rejected until the ceiling is reached.
    video.reject_next(u32::MAX);
    sup.notify(id, MediaSignal::Paused).await?;
    wait_for(&mut rx, EventKind::RetryExhausted).await;
    print_health(&sup).await;

    // 6. Manual recovery.
    video.reject_next(0);
    sup.restart_all().await;
    wait_for(&mut rx, EventKind::PlayConfirmed).await;
    print_health(&sup).await;

    sup.shutdown().await;
    Ok(())
}
