//! Toast notification queue: FIFO, one visible at a time.
//!
//! The dispatcher task shows the queue head only when nothing is on screen,
//! auto-dismisses after the display timeout, and leaves a short gap before
//! the next toast so back-to-back alerts do not flicker into each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Gap after an auto-dismiss before the next toast appears.
pub const QUEUE_GAP: Duration = Duration::from_millis(500);
/// Shorter settle after a manual dismissal.
pub const DISMISS_SETTLE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub icon: String,
    pub timestamp: DateTime<Utc>,
    pub status: NotificationStatus,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl Notification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        icon: impl Into<String>,
        status: NotificationStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            title: title.into(),
            message: message.into(),
            icon: icon.into(),
            timestamp,
            status,
        }
    }
}

pub struct NotificationQueue {
    tx: mpsc::UnboundedSender<Notification>,
    dismiss_tx: mpsc::UnboundedSender<()>,
    visible: watch::Receiver<Option<Notification>>,
    worker: JoinHandle<()>,
}

impl NotificationQueue {
    /// Spawn the dispatcher task. Must be called from within a tokio runtime.
    pub fn new(display_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (dismiss_tx, dismiss_rx) = mpsc::unbounded_channel();
        let (vis_tx, vis_rx) = watch::channel(None);
        let worker = tokio::spawn(run_queue(rx, dismiss_rx, vis_tx, display_timeout));
        Self {
            tx,
            dismiss_tx,
            visible: vis_rx,
            worker,
        }
    }

    pub fn push(&self, n: Notification) {
        let _ = self.tx.send(n);
    }

    /// Watch channel carrying the currently visible toast (at most one).
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.visible.clone()
    }

    pub fn current(&self) -> Option<Notification> {
        self.visible.borrow().clone()
    }

    /// Short-circuit the display timeout for the toast on screen.
    pub fn dismiss(&self) {
        if self.visible.borrow().is_some() {
            let _ = self.dismiss_tx.send(());
        }
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_queue(
    mut rx: mpsc::UnboundedReceiver<Notification>,
    mut dismiss_rx: mpsc::UnboundedReceiver<()>,
    visible: watch::Sender<Option<Notification>>,
    display_timeout: Duration,
) {
    while let Some(n) = rx.recv().await {
        // Dismissals aimed at an earlier toast must not cut this one short.
        while dismiss_rx.try_recv().is_ok() {}

        let _ = visible.send(Some(n));
        let gap = tokio::select! {
            _ = tokio::time::sleep(display_timeout) => QUEUE_GAP,
            _ = dismiss_rx.recv() => DISMISS_SETTLE,
        };
        let _ = visible.send(None);
        tokio::time::sleep(gap).await;
    }
}
