//! Route guard: navigation gating ahead of page rendering.
//!
//! Two pieces, deliberately decoupled from the API token:
//!
//! - [`RouteGuard`] — a pure decision function over (path, cookie
//!   presence) and the configured protected prefixes. No request object,
//!   no side effects; whatever drives navigation applies the decision.
//! - [`GuardCookie`] — the lightweight presence signal the guard checks.
//!   Set only for administrator sessions, with its own fixed 1-day max
//!   age. The cookie gates *routes*; the bearer token gates *API calls*;
//!   the two can legitimately fall out of sync at the cookie's boundary.

use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ConsoleConfig;

/// Cookie name, as the deployed backend expects it.
pub const GUARD_COOKIE_NAME: &str = "token";

/// Outcome of evaluating one navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested page unmodified.
    Allow,
    /// Do not render; send the user to the login entry point.
    RedirectTo(String),
}

/// Request-time interceptor for protected route prefixes.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    protected_paths: Vec<String>,
    login_path: String,
}

impl RouteGuard {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            protected_paths: config.protected_paths.clone(),
            login_path: config.login_path.clone(),
        }
    }

    /// Decide one navigation: deny protected prefixes without the cookie,
    /// pass everything else through.
    pub fn evaluate(&self, path: &str, cookie_present: bool) -> RouteDecision {
        let protected = self
            .protected_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()));
        if protected && !cookie_present {
            tracing::debug!("blocked navigation to {path}, redirecting to login");
            return RouteDecision::RedirectTo(self.login_path.clone());
        }
        RouteDecision::Allow
    }
}

// ── Guard cookie ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CookieEntry {
    value: String,
    /// Epoch seconds after which the cookie reads as absent.
    expires_at: u64,
}

/// In-process holder of the guard cookie.
///
/// Presence checks honor the cookie's own max age, independent of the
/// token's expiry — a lapsed cookie is simply absent.
#[derive(Debug, Default)]
pub struct GuardCookie {
    entry: Mutex<Option<CookieEntry>>,
}

impl GuardCookie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cookie with the given max age.
    pub fn set(&self, value: &str, max_age_secs: u64) {
        *self.entry.lock() = Some(CookieEntry {
            value: value.to_string(),
            expires_at: epoch_secs() + max_age_secs,
        });
    }

    /// Remove the cookie (logout / expiry teardown).
    pub fn clear(&self) {
        *self.entry.lock() = None;
    }

    /// Current value, `None` once the max age has passed.
    pub fn value(&self) -> Option<String> {
        let entry = self.entry.lock();
        match entry.as_ref() {
            Some(e) if e.expires_at > epoch_secs() => Some(e.value.clone()),
            _ => None,
        }
    }

    /// Whether the cookie is present and unexpired.
    pub fn is_present(&self) -> bool {
        self.value().is_some()
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
