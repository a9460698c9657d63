//! One-shot session expiry timer.
//!
//! A successful login arms this with the backend's `expire_in`; when it
//! fires, the callback tears the session down. Exactly one timer can be
//! pending: re-arming replaces the previous one (a stacked timer would
//! clear the session twice and double-redirect), and explicit logout
//! disarms so a stale timer can never fire against a *newer* session.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Cancelable deferred expiry task.
#[derive(Debug, Default)]
pub struct ExpirationScheduler {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ExpirationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `on_expire` to run after `delay_secs`, replacing any
    /// pending timer.
    pub fn arm<F>(&self, delay_secs: u64, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        tracing::debug!("session expiry armed for {delay_secs}s");
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            on_expire();
        }));
    }

    /// Cancel the pending timer, if any. Called on explicit logout.
    pub fn disarm(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
            tracing::debug!("session expiry disarmed");
        }
    }

    /// Whether a timer is pending (armed and not yet fired or canceled).
    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
