//! Deferred, cancellable responses for tileprobe.
//!
//! A probe does not answer the server instantly: each outgoing action is
//! held for a configurable reaction delay (plus optional random jitter)
//! before it is pushed to the outbound channel. While it waits, a newer
//! server event may make it obsolete, so every deferred response sits
//! under a [`GuardKey`] and can be cancelled.
//!
//! # Guarantees
//!
//! - Each guard holds at most one scheduled response. Scheduling on a
//!   guard that already has one cancels the old one first.
//! - A response is sent at most once. A task whose timer has elapsed
//!   checks its generation under the same lock that [`cancel`] takes, so
//!   a response cancelled "just after" its timer fired is suppressed
//!   rather than sent.
//! - Waiting never blocks the caller: the delay is a spawned tokio task.
//!
//! # Integration
//!
//! The scheduler sits next to the session's `tokio::select!` loop; the
//! loop owns the receiving end of the outbound channel:
//!
//! ```ignore
//! let (tx, mut outbound) = mpsc::unbounded_channel();
//! let mut scheduler = ResponseScheduler::new(config, tx);
//! loop {
//!     tokio::select! {
//!         frame = conn.recv() => {
//!             let out = dispatcher.handle(&frame?);
//!             for key in out.supersedes { scheduler.cancel(key); }
//!             if let Some(r) = out.response { scheduler.schedule(r.guard, r.bytes); }
//!         }
//!         Some(bytes) = outbound.recv() => conn.send(&bytes).await?,
//!     }
//! }
//! ```
//!
//! [`cancel`]: ResponseScheduler::cancel

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The slot a deferred response occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardKey {
    /// A `play_card` answering our turn.
    Discard,
    /// A `choose_action` answering an action window.
    Claim,
}

impl fmt::Display for GuardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discard => f.write_str("discard"),
            Self::Claim => f.write_str("claim"),
        }
    }
}

/// How long responses wait before they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayConfig {
    /// Base delay before every response. Default: 1 s. Zero sends
    /// immediately.
    pub reaction_delay: Duration,
    /// Upper bound of the uniform random extra added to each delay.
    /// Default: zero.
    pub jitter: Duration,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            reaction_delay: Duration::from_secs(1),
            jitter: Duration::ZERO,
        }
    }
}

impl DelayConfig {
    /// Longest base delay or jitter accepted.
    pub const MAX_DELAY: Duration = Duration::from_secs(60);

    /// A config with no delay at all.
    pub fn immediate() -> Self {
        Self {
            reaction_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_reaction_delay(mut self, delay: Duration) -> Self {
        self.reaction_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Clamp out-of-range values. Called by [`ResponseScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.reaction_delay > Self::MAX_DELAY {
            warn!(
                delay_ms = self.reaction_delay.as_millis() as u64,
                max_ms = Self::MAX_DELAY.as_millis() as u64,
                "reaction_delay exceeds maximum, clamping"
            );
            self.reaction_delay = Self::MAX_DELAY;
        }
        if self.jitter > Self::MAX_DELAY {
            warn!(
                jitter_ms = self.jitter.as_millis() as u64,
                max_ms = Self::MAX_DELAY.as_millis() as u64,
                "jitter exceeds maximum, clamping"
            );
            self.jitter = Self::MAX_DELAY;
        }
        self
    }

    /// Draws one delay: the base plus a uniform sample from
    /// `0..=jitter`.
    pub fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.reaction_delay;
        }
        let max_us = u64::try_from(self.jitter.as_micros()).unwrap_or(u64::MAX);
        let extra = rand::rng().random_range(0..=max_us);
        self.reaction_delay + Duration::from_micros(extra)
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Counters describing what the scheduler has done so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelayStats {
    /// Responses handed to [`ResponseScheduler::schedule`].
    pub scheduled: u64,
    /// Responses cancelled because a newer one took their guard.
    pub replaced: u64,
    /// Responses cancelled through [`ResponseScheduler::cancel`].
    pub cancelled: u64,
    /// Responses pushed to the outbound channel.
    pub fired: u64,
    /// Timers that elapsed after their response was cancelled.
    pub suppressed: u64,
}

// ---------------------------------------------------------------------------
// Shared state (scheduler ↔ timer tasks)
// ---------------------------------------------------------------------------

/// The live generation of each guard plus the counters timer tasks bump.
struct Shared<T> {
    live: Mutex<HashMap<GuardKey, u64>>,
    outbound: mpsc::UnboundedSender<T>,
    fired: AtomicU64,
    suppressed: AtomicU64,
}

impl<T> Shared<T> {
    fn live(&self) -> std::sync::MutexGuard<'_, HashMap<GuardKey, u64>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends `payload` if `generation` is still live for `key`. The check
    /// and the send happen under one lock, so a concurrent cancel either
    /// sees the response gone or prevents it.
    fn fire(&self, key: GuardKey, generation: u64, payload: T) -> bool {
        let mut live = self.live();
        if live.get(&key) != Some(&generation) {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            debug!(guard = %key, generation, "stale response suppressed");
            return false;
        }
        live.remove(&key);
        if self.outbound.send(payload).is_err() {
            debug!(guard = %key, "outbound channel closed, response dropped");
            return false;
        }
        self.fired.fetch_add(1, Ordering::Relaxed);
        trace!(guard = %key, generation, "response fired");
        true
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Holds at most one deferred response per [`GuardKey`].
///
/// One scheduler per session. Dropping it aborts every pending timer.
pub struct ResponseScheduler<T = Vec<u8>> {
    config: DelayConfig,
    shared: Arc<Shared<T>>,
    timers: HashMap<GuardKey, JoinHandle<()>>,
    next_generation: u64,
    scheduled: u64,
    replaced: u64,
    cancelled: u64,
}

impl<T: Send + 'static> ResponseScheduler<T> {
    /// Create a scheduler that sends into `outbound`.
    pub fn new(config: DelayConfig, outbound: mpsc::UnboundedSender<T>) -> Self {
        let config = config.validated();
        debug!(
            delay_ms = config.reaction_delay.as_millis() as u64,
            jitter_ms = config.jitter.as_millis() as u64,
            "response scheduler created"
        );
        Self {
            config,
            shared: Arc::new(Shared {
                live: Mutex::new(HashMap::new()),
                outbound,
                fired: AtomicU64::new(0),
                suppressed: AtomicU64::new(0),
            }),
            timers: HashMap::new(),
            next_generation: 0,
            scheduled: 0,
            replaced: 0,
            cancelled: 0,
        }
    }

    /// Create a scheduler together with the receiving end of its channel.
    pub fn channel(config: DelayConfig) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(config, tx), rx)
    }

    /// Defer `payload` under `key`, replacing whatever `key` held.
    ///
    /// With a zero delay the payload is sent before this returns; no task
    /// is spawned. Otherwise this must be called inside a tokio runtime.
    pub fn schedule(&mut self, key: GuardKey, payload: T) {
        if self.cancel_inner(key) {
            self.replaced += 1;
            debug!(guard = %key, "pending response replaced");
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        self.scheduled += 1;
        self.shared.live().insert(key, generation);

        let delay = self.config.sample();
        if delay.is_zero() {
            self.shared.fire(key, generation, payload);
            return;
        }

        trace!(
            guard = %key,
            generation,
            delay_ms = delay.as_millis() as u64,
            "response scheduled"
        );
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.fire(key, generation, payload);
        });
        self.timers.insert(key, handle);
    }

    /// Cancel the response under `key`. Returns `true` if one was still
    /// waiting; `false` if there was none or it already left.
    pub fn cancel(&mut self, key: GuardKey) -> bool {
        let was_live = self.cancel_inner(key);
        if was_live {
            self.cancelled += 1;
            debug!(guard = %key, "pending response cancelled");
        }
        was_live
    }

    /// Cancel every pending response.
    pub fn cancel_all(&mut self) {
        for key in [GuardKey::Discard, GuardKey::Claim] {
            self.cancel(key);
        }
    }

    /// Whether a response is waiting under `key`.
    pub fn is_pending(&self, key: GuardKey) -> bool {
        self.shared.live().contains_key(&key)
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> DelayStats {
        DelayStats {
            scheduled: self.scheduled,
            replaced: self.replaced,
            cancelled: self.cancelled,
            fired: self.shared.fired.load(Ordering::Relaxed),
            suppressed: self.shared.suppressed.load(Ordering::Relaxed),
        }
    }

    /// The active (validated) configuration.
    pub fn config(&self) -> &DelayConfig {
        &self.config
    }

    fn cancel_inner(&mut self, key: GuardKey) -> bool {
        if let Some(handle) = self.timers.remove(&key) {
            handle.abort();
        }
        self.shared.live().remove(&key).is_some()
    }
}

impl<T> Drop for ResponseScheduler<T> {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

impl<T> fmt::Debug for ResponseScheduler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseScheduler")
            .field("config", &self.config)
            .field("timers", &self.timers.len())
            .field("next_generation", &self.next_generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> (Shared<&'static str>, mpsc::UnboundedReceiver<&'static str>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Shared {
            live: Mutex::new(HashMap::new()),
            outbound: tx,
            fired: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        };
        (shared, rx)
    }

    #[test]
    fn test_fire_with_stale_generation_is_suppressed() {
        let (shared, mut rx) = shared();
        shared.live().insert(GuardKey::Claim, 3);

        assert!(!shared.fire(GuardKey::Claim, 2, "old"));
        assert!(rx.try_recv().is_err());
        assert_eq!(shared.suppressed.load(Ordering::Relaxed), 1);

        assert!(shared.fire(GuardKey::Claim, 3, "new"));
        assert_eq!(rx.try_recv().unwrap(), "new");
        assert!(shared.live().is_empty());
    }

    #[test]
    fn test_fire_twice_sends_once() {
        let (shared, mut rx) = shared();
        shared.live().insert(GuardKey::Discard, 1);
        assert!(shared.fire(GuardKey::Discard, 1, "a"));
        assert!(!shared.fire(GuardKey::Discard, 1, "a"));
        assert_eq!(rx.try_recv().unwrap(), "a");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_fire_for_cancelled_guard_is_suppressed() {
        let (shared, mut rx) = shared();
        assert!(!shared.fire(GuardKey::Discard, 1, "x"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sample_stays_within_jitter() {
        let cfg = DelayConfig::default()
            .with_reaction_delay(Duration::from_millis(100))
            .with_jitter(Duration::from_millis(50));
        for _ in 0..500 {
            let d = cfg.sample();
            assert!(d >= Duration::from_millis(100));
            assert!(d <= Duration::from_millis(150));
        }
    }
}
