//! One-shot cancellation from a signal handler to the write loop
//!
//! The handler side only ever sends; the loop side polls without blocking and
//! latches the first notification. Further notifications are dropped.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

/// Create a connected handle/listener pair
pub fn cancellation() -> (CancelHandle, CancelListener) {
    let (tx, rx) = mpsc::sync_channel(1);
    (
        CancelHandle { tx },
        CancelListener {
            rx,
            cancelled: false,
        },
    )
}

/// Sending half, safe to move into a signal handler
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: SyncSender<()>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        match self.tx.try_send(()) {
            Ok(()) => tracing::debug!("cancellation requested"),
            // Already pending, or the listener is gone
            Err(TrySendError::Full(())) | Err(TrySendError::Disconnected(())) => {}
        }
    }
}

/// Receiving half, owned by the write loop
#[derive(Debug)]
pub struct CancelListener {
    rx: Receiver<()>,
    cancelled: bool,
}

impl CancelListener {
    /// Check for a cancellation request without blocking
    ///
    /// Once this returns `true` it keeps returning `true`.
    pub fn poll(&mut self) -> bool {
        if !self.cancelled {
            match self.rx.try_recv() {
                Ok(()) => {
                    tracing::debug!("cancellation observed");
                    self.cancelled = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }
        }
        self.cancelled
    }
}
