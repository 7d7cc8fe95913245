//! Debounced search input
//!
//! Raw keystrokes are staged; the text is committed only after a quiet
//! period with no further input. A newer stage discards the pending one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Quiet period before a staged search is committed
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

struct Pending {
    text: String,
    handle: JoinHandle<()>,
}

pub struct SearchDebouncer {
    quiet: Duration,
    committed: Arc<watch::Sender<String>>,
    pending: Mutex<Option<Pending>>,
}

fn commit(sender: &watch::Sender<String>, text: String) {
    sender.send_if_modified(|current| {
        if *current == text {
            return false;
        }
        *current = text;
        true
    });
}

impl SearchDebouncer {
    /// Create a debouncer and a receiver for the committed text
    pub fn new(quiet: Duration) -> (Self, watch::Receiver<String>) {
        let (tx, rx) = watch::channel(String::new());
        let debouncer = Self {
            quiet,
            committed: Arc::new(tx),
            pending: Mutex::new(None),
        };
        (debouncer, rx)
    }

    fn pending(&self) -> MutexGuard<'_, Option<Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stage raw input, replacing any commit still waiting
    ///
    /// Must be called from within a tokio runtime.
    pub fn stage(&self, raw: impl Into<String>) {
        let text = raw.into();
        let mut pending = self.pending();
        if let Some(previous) = pending.take() {
            previous.handle.abort();
        }

        let sender = Arc::clone(&self.committed);
        let quiet = self.quiet;
        let staged = text.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            commit(&sender, staged);
        });
        *pending = Some(Pending { text, handle });
    }

    /// Commit the pending text now, skipping the rest of the quiet period
    pub fn flush(&self) {
        if let Some(pending) = self.pending().take() {
            pending.handle.abort();
            commit(&self.committed, pending.text);
        }
    }

    /// Drop the pending text without committing it
    pub fn cancel(&self) {
        if let Some(pending) = self.pending().take() {
            pending.handle.abort();
        }
    }

    /// Text currently committed to the pipeline
    pub fn committed(&self) -> String {
        self.committed.borrow().clone()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
