//! Cancellation tracking for an in-flight generation.
//!
//! A [`CancelWatcher`] owns a cancellation token and a small state machine:
//!
//! ```text
//! Idle -> Armed -> Cancelling -> Terminated
//! ```
//!
//! `Idle -> Armed` happens when the interrupt listener is registered,
//! `Armed -> Cancelling` on the first interrupt, and
//! `Cancelling -> Terminated` once the stop-requested usage event has
//! settled. Signal delivery is abstracted behind [`SignalSource`] so the
//! whole machine runs in tests without touching process-wide handlers.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Cancellation-handling states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CancelState {
    /// No interrupt listener installed yet
    Idle = 0,
    /// Interrupt listener active
    Armed = 1,
    /// Interrupt received, stop-requested tracking in flight
    Cancelling = 2,
    /// Tracking settled, invocation is winding down
    Terminated = 3,
}

impl CancelState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Armed,
            2 => Self::Cancelling,
            _ => Self::Terminated,
        }
    }
}

/// Source of interrupt signals
#[async_trait]
pub trait SignalSource: Send + Sync + 'static {
    /// Resolves when the user requests an interrupt
    async fn interrupted(&self);
}

/// Production signal source backed by the OS.
///
/// Listens for ctrl-c everywhere. Windows consoles deliver a separate
/// break signal, so that one is bridged into the same interrupt path.
pub struct OsSignals;

#[async_trait]
impl SignalSource for OsSignals {
    async fn interrupted(&self) {
        #[cfg(windows)]
        {
            match tokio::signal::windows::ctrl_break() {
                Ok(mut ctrl_break) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = ctrl_break.recv() => {}
                    }
                }
                Err(error) => {
                    tracing::debug!("could not register ctrl-break handler: {error}");
                    tokio::signal::ctrl_c().await.ok();
                }
            }
        }

        #[cfg(not(windows))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Cancellation token plus the state machine that drives it
#[derive(Debug, Clone)]
pub struct CancelWatcher {
    token: CancellationToken,
    state: Arc<AtomicU8>,
}

impl CancelWatcher {
    /// Create a watcher in the `Idle` state
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            state: Arc::new(AtomicU8::new(CancelState::Idle as u8)),
        }
    }

    /// Register the interrupt listener.
    ///
    /// Installs exactly once: a second call is a no-op. The first signal
    /// from `source` moves the machine to `Cancelling` and fires the token.
    pub fn arm<S: SignalSource>(&self, source: S) {
        let armed = self.state.compare_exchange(
            CancelState::Idle as u8,
            CancelState::Armed as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        if armed.is_err() {
            return;
        }

        let token = self.token.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            source.interrupted().await;
            // A second interrupt during Cancelling is not specially handled.
            let _ = state.compare_exchange(
                CancelState::Armed as u8,
                CancelState::Cancelling as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
            token.cancel();
        });
    }

    /// Resolves once an interrupt has been received
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// True once an interrupt has been received
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Current state of the machine
    pub fn state(&self) -> CancelState {
        CancelState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Mark the invocation as winding down after tracking settled
    pub fn terminated(&self) {
        self.state
            .store(CancelState::Terminated as u8, Ordering::SeqCst);
    }
}

impl Default for CancelWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Notify;

    struct ManualSignal(Arc<Notify>);

    #[async_trait]
    impl SignalSource for ManualSignal {
        async fn interrupted(&self) {
            self.0.notified().await;
        }
    }

    #[tokio::test]
    async fn test_starts_idle_and_arms_once() {
        let watcher = CancelWatcher::new();
        assert_eq!(watcher.state(), CancelState::Idle);

        watcher.arm(ManualSignal(Arc::new(Notify::new())));
        assert_eq!(watcher.state(), CancelState::Armed);

        // Second arm is a no-op
        watcher.arm(ManualSignal(Arc::new(Notify::new())));
        assert_eq!(watcher.state(), CancelState::Armed);
        assert!(!watcher.is_cancelled());
    }

    #[tokio::test]
    async fn test_interrupt_moves_to_cancelling_and_fires_token() {
        let notify = Arc::new(Notify::new());
        let watcher = CancelWatcher::new();
        watcher.arm(ManualSignal(Arc::clone(&notify)));

        notify.notify_one();
        watcher.cancelled().await;

        assert!(watcher.is_cancelled());
        assert_eq!(watcher.state(), CancelState::Cancelling);

        watcher.terminated();
        assert_eq!(watcher.state(), CancelState::Terminated);
    }

    #[tokio::test]
    async fn test_unarmed_watcher_never_cancels() {
        let watcher = CancelWatcher::new();
        assert!(!watcher.is_cancelled());
        assert_eq!(watcher.state(), CancelState::Idle);
    }
}
