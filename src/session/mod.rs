//! In-memory session state and its lifecycle plumbing.
//!
//! [`SessionState`] is the observable, per-process mirror of the durable
//! store: loaded once at startup, mutated by login/logout/expiry, watched
//! by whatever renders the "logged in as …" corner of the console.
//!
//! The lifecycle itself (login → persist + arm expiry timer, logout /
//! expiry → teardown) lives in [`SessionManager`]; the one-shot timer in
//! [`expiry`]; persistence in [`store`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub mod expiry;
pub mod manager;
pub mod store;

pub use expiry::ExpirationScheduler;
pub use manager::SessionManager;
pub use store::{MemorySessionStore, SessionStore, SqliteSessionStore, StoredSession};

/// The signed-in user, as the backend reports it at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// The current session.
///
/// `token` and `user` are both set or both null; `expires_at` (epoch
/// seconds) only means anything while a token is held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserSummary>,
    pub expires_at: Option<u64>,
}

impl Session {
    /// Whether a login is currently established.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

/// Observable holder of the current [`Session`].
///
/// Mutations notify subscribers synchronously, after the in-memory value
/// has changed. Persisting to the store is the *mutator's* job — nothing
/// here writes through. Listeners must not subscribe or unsubscribe from
/// inside a callback.
pub struct SessionState {
    session: Mutex<Session>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

impl SessionState {
    /// Empty (anonymous) state.
    pub fn empty() -> Self {
        Self {
            session: Mutex::new(Session::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Initialize from the durable store. Called once per process; the
    /// store is the single source of truth only at this moment.
    pub fn load(store: &dyn SessionStore) -> Self {
        let stored = store.read();
        if stored.token.is_some() {
            tracing::debug!("restored persisted session from store");
        }
        Self {
            session: Mutex::new(Session {
                token: stored.token,
                user: stored.user,
                expires_at: None,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of the current session.
    pub fn get(&self) -> Session {
        self.session.lock().clone()
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<String> {
        self.session.lock().token.clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        let snapshot = {
            let mut session = self.session.lock();
            session.token = token;
            if session.token.is_none() {
                session.expires_at = None;
            }
            session.clone()
        };
        self.notify(&snapshot);
    }

    pub fn set_user(&self, user: Option<UserSummary>) {
        let snapshot = {
            let mut session = self.session.lock();
            session.user = user;
            session.clone()
        };
        self.notify(&snapshot);
    }

    /// Record when the current token lapses (epoch seconds).
    pub fn set_expires_at(&self, expires_at: Option<u64>) {
        let snapshot = {
            let mut session = self.session.lock();
            session.expires_at = expires_at;
            session.clone()
        };
        self.notify(&snapshot);
    }

    /// Register a listener called after every mutation. The returned id
    /// feeds [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, listener: impl Fn(&Session) + Send + Sync + 'static) -> u64 {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.listeners.lock().retain(|(lid, _)| *lid != id);
    }

    fn notify(&self, session: &Session) {
        // Session lock is already released; only the listener list is held.
        for (_, listener) in self.listeners.lock().iter() {
            listener(session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn sample_user(is_admin: bool) -> UserSummary {
        UserSummary {
            id: 1,
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            is_admin,
        }
    }

    #[test]
    fn empty_state_is_anonymous() {
        let state = SessionState::empty();
        let session = state.get();
        assert!(!session.is_authenticated());
        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn load_restores_persisted_session() {
        let store = MemorySessionStore::new();
        store.save("tok", &sample_user(false)).unwrap();

        let state = SessionState::load(&store);
        let session = state.get();
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert_eq!(session.user, Some(sample_user(false)));
    }

    #[test]
    fn mutations_notify_subscribers_synchronously() {
        let state = SessionState::empty();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        state.subscribe(move |session: &Session| {
            sink.lock().push(session.token.clone());
        });

        state.set_token(Some("a".to_string()));
        state.set_token(None);

        let seen = seen.lock();
        assert_eq!(*seen, vec![Some("a".to_string()), None]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let state = SessionState::empty();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let id = state.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        state.set_token(Some("a".to_string()));
        state.unsubscribe(id);
        state.set_token(None);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clearing_token_drops_expiry() {
        let state = SessionState::empty();
        state.set_token(Some("a".to_string()));
        state.set_expires_at(Some(9_999_999_999));
        state.set_token(None);
        assert!(state.get().expires_at.is_none());
    }

    #[test]
    fn listener_observes_value_after_change() {
        let state = SessionState::empty();
        let observed = Arc::new(Mutex::new(None));
        let sink = observed.clone();
        state.subscribe(move |session: &Session| {
            *sink.lock() = session.user.clone();
        });

        state.set_user(Some(sample_user(true)));
        assert_eq!(*observed.lock(), Some(sample_user(true)));
    }
}
