//! Session lifecycle orchestration: login, logout, expiry.
//!
//! The manager wires the parts together around one state machine:
//!
//! ```text
//!   Anonymous ──(login call)──→ Authenticating ──(ok)──→ Authenticated
//!       ↑                            │(fail)                  │
//!       └────────────────────────────┴──(logout / expiry)─────┘
//! ```
//!
//! A successful login persists token + user, mirrors them into the
//! observable state, sets the guard cookie (administrators only) and
//! arms the expiry timer with the backend's `expire_in`. Logout and
//! expiry both converge on the same teardown: disarm/fire, clear store,
//! clear state, drop the cookie. Expiry additionally raises a
//! user-visible signal via [`SessionManager::expired`].
//!
//! No transactional guarantee spans the (store, state, cookie) triple —
//! overlapping login/logout resolve by last-write-wins, which the
//! single-threaded console event loop makes a non-issue in practice.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use tokio::sync::watch;

use crate::api::{users, ApiClient};
use crate::config::ConsoleConfig;
use crate::guard::GuardCookie;
use crate::session::{
    ExpirationScheduler, SessionState, SessionStore, UserSummary,
};

/// `data` payload of a successful `user/login` envelope.
#[derive(Debug, Deserialize)]
struct LoginPayload {
    token: String,
    #[serde(rename = "currentUser")]
    current_user: UserSummary,
    /// Token lifetime in seconds.
    expire_in: u64,
}

/// Owns the session lifecycle for one console process.
pub struct SessionManager {
    state: Arc<SessionState>,
    store: Arc<dyn SessionStore>,
    cookie: Arc<GuardCookie>,
    scheduler: Arc<ExpirationScheduler>,
    expired_tx: watch::Sender<bool>,
    guard_cookie_ttl_secs: u64,
    login_path: String,
}

impl SessionManager {
    /// Build a manager over the given store, restoring any persisted
    /// session into the in-memory state.
    pub fn new(config: &ConsoleConfig, store: Arc<dyn SessionStore>) -> Self {
        let state = Arc::new(SessionState::load(store.as_ref()));
        let (expired_tx, _) = watch::channel(false);
        Self {
            state,
            store,
            cookie: Arc::new(GuardCookie::new()),
            scheduler: Arc::new(ExpirationScheduler::new()),
            expired_tx,
            guard_cookie_ttl_secs: config.guard_cookie_ttl_secs,
            login_path: config.login_path.clone(),
        }
    }

    /// The observable session state (share this with the [`ApiClient`]).
    pub fn state(&self) -> Arc<SessionState> {
        self.state.clone()
    }

    /// The guard cookie this manager maintains.
    pub fn guard_cookie(&self) -> Arc<GuardCookie> {
        self.cookie.clone()
    }

    /// Watch for scheduler-driven expiry. Flips to `true` when the
    /// session lapses; reset to `false` by the next successful login.
    pub fn expired(&self) -> watch::Receiver<bool> {
        self.expired_tx.subscribe()
    }

    /// Exchange credentials for a session.
    ///
    /// On success: persists token + user, updates state, sets the guard
    /// cookie for administrators (1-day window, decoupled from the token
    /// lifetime), and arms the expiry timer. On any failure the session
    /// stays anonymous — nothing is partially established.
    pub async fn login(
        &self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> anyhow::Result<UserSummary> {
        tracing::debug!("authenticating {email}");
        let response = users::login(client, email, password).await?;

        let Some(data) = response.data else {
            anyhow::bail!("login rejected: {}", response.message);
        };
        let payload: LoginPayload = serde_json::from_value(data)
            .map_err(|e| anyhow::anyhow!("malformed login payload: {e}"))?;

        self.store.save(&payload.token, &payload.current_user)?;
        self.state.set_token(Some(payload.token.clone()));
        self.state.set_user(Some(payload.current_user.clone()));
        self.state
            .set_expires_at(Some(epoch_secs() + payload.expire_in));

        // Route-level access is an administrator concern; regular users
        // authenticate API calls with the bearer token alone.
        if payload.current_user.is_admin {
            self.cookie.set(&payload.token, self.guard_cookie_ttl_secs);
        }

        // send_replace: the flag must update even while nobody holds a
        // receiver, so a later subscriber still sees the current value.
        self.expired_tx.send_replace(false);
        self.arm_expiry(payload.expire_in);

        tracing::info!(
            "session established for {} (admin: {})",
            payload.current_user.email,
            payload.current_user.is_admin
        );
        Ok(payload.current_user)
    }

    /// Explicit logout. Disarms any pending expiry timer first so it can
    /// never fire against a session established afterward, then tears
    /// everything down. Returns the login path as the destination to
    /// navigate to.
    pub fn logout(&self) -> String {
        self.scheduler.disarm();
        teardown(self.store.as_ref(), &self.state, &self.cookie);
        tracing::info!("session logged out");
        self.login_path.clone()
    }

    fn arm_expiry(&self, delay_secs: u64) {
        let store = self.store.clone();
        let state = self.state.clone();
        let cookie = self.cookie.clone();
        let expired_tx = self.expired_tx.clone();
        self.scheduler.arm(delay_secs, move || {
            tracing::info!("session expired");
            teardown(store.as_ref(), &state, &cookie);
            expired_tx.send_replace(true);
        });
    }

    #[cfg(test)]
    fn scheduler(&self) -> &ExpirationScheduler {
        &self.scheduler
    }
}

/// Shared teardown for logout and expiry: clear store, state, cookie.
fn teardown(store: &dyn SessionStore, state: &SessionState, cookie: &GuardCookie) {
    if let Err(e) = store.clear() {
        tracing::warn!("failed to clear session store: {e}");
    }
    state.set_token(None);
    state.set_user(None);
    cookie.clear();
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
