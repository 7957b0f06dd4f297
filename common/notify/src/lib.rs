//! The `TxsAvailable` edge-triggered signal described in spec §4.5: a
//! capacity-1, non-blocking wakeup shared by `core-mempool` and
//! `core-sidecar` so the consensus loop can block on "something changed"
//! instead of polling either engine.
//!
//! Before [`TxsAvailable::enable`] is called the signal never fires --
//! equivalent to the nil channel the source description returns pre-enable.
//! After enabling, at most one notification is delivered per height; the
//! first admission at a height wins the race, and [`TxsAvailable::reset`]
//! (called from `Update`) re-arms the latch for the next height.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, Mutex};

pub struct TxsAvailable {
    enabled: AtomicBool,
    notified: AtomicBool,
    tx: mpsc::Sender<()>,
    rx: Mutex<mpsc::Receiver<()>>,
}

impl Default for TxsAvailable {
    fn default() -> Self {
        Self::new()
    }
}

impl TxsAvailable {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        TxsAvailable {
            enabled: AtomicBool::new(false),
            notified: AtomicBool::new(false),
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Arms the signal. Idempotent.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Fire the signal if this is the first call since the last [`reset`]
    /// and the signal has been enabled. A non-blocking send: if the
    /// capacity-1 channel is already full (an unconsumed signal from an
    /// earlier height, or a racing duplicate) this is a silent no-op.
    ///
    /// [`reset`]: TxsAvailable::reset
    pub fn notify(&self) {
        if !self.is_enabled() {
            return;
        }
        if self.notified.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.tx.try_send(());
    }

    /// Reset the per-height latch. Called from `Update(height)`.
    pub fn reset(&self) {
        self.notified.store(false, Ordering::SeqCst);
    }

    /// Await the next edge. Never resolves if the signal was never
    /// enabled, mirroring a nil channel that blocks forever.
    pub async fn wait(&self) {
        self.rx.lock().await.recv().await;
    }
}
