//! Cooperative stop signal

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking a running crawl to stop at the next safe point
///
/// Clones share the same flag. The crawl checks it before each page and
/// between items, never in the middle of a save.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            tracing::warn!("Stop requested, finishing the current item");
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Turns interrupts into stop requests
///
/// The first interrupt requests a cooperative stop. Returns `true` once a
/// second interrupt arrives, meaning the caller should exit immediately, and
/// `false` if listening for interrupts fails.
pub async fn watch_interrupts<F, Fut>(stop: &StopSignal, mut next_interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_interrupt().await {
        tracing::error!("Failed to listen for interrupts: {}", e);
        return false;
    }
    stop.request();

    match next_interrupt().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to listen for interrupts: {}", e);
            false
        }
    }
}
