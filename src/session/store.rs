//! Durable session persistence: the token and the serialized user.
//!
//! The store outlives the process — a restarted console picks the session
//! back up from here. Exactly two entries exist: the opaque token (raw
//! string) and the current user (JSON). The trait exists so tests and
//! embedders can swap in the in-memory variant without touching disk.

use parking_lot::Mutex;
use std::path::Path;

use super::UserSummary;

/// Store key for the opaque backend token.
const KEY_TOKEN: &str = "token";

/// Store key for the JSON-serialized current user.
const KEY_CURRENT_USER: &str = "current_user";

/// What `read()` hands back. Both fields are `None` until a login has
/// been persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user: Option<UserSummary>,
}

/// Durable key/value persistence for the session.
///
/// `read()` must be safe before any session exists — it returns nulls,
/// it does not fail. Writes are last-writer-wins; no transactional
/// guarantee is offered across store, in-memory state and cookie.
pub trait SessionStore: Send + Sync {
    /// Persist both entries. Overwrites whatever was there.
    fn save(&self, token: &str, user: &UserSummary) -> anyhow::Result<()>;

    /// Remove both entries; a subsequent `read()` returns nulls.
    fn clear(&self) -> anyhow::Result<()>;

    /// Current persisted session, nulls if none.
    fn read(&self) -> StoredSession;
}

// ── SQLite implementation ────────────────────────────────────────

/// SQLite-backed session store (the production path).
pub struct SqliteSessionStore {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteSessionStore {
    /// In-memory store, for tests.
    pub fn new() -> Self {
        let conn = rusqlite::Connection::open_in_memory()
            .expect("Failed to open in-memory SQLite for session store");
        Self::init_tables(&conn);
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open a file-backed store for production use.
    pub fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = rusqlite::Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
        Self::init_tables(&conn);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_tables(conn: &rusqlite::Connection) {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .expect("Failed to initialize session table");
    }

    fn get(conn: &rusqlite::Connection, key: &str) -> Option<String> {
        conn.query_row(
            "SELECT value FROM session WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        )
        .ok()
    }
}

impl Default for SqliteSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for SqliteSessionStore {
    fn save(&self, token: &str, user: &UserSummary) -> anyhow::Result<()> {
        let user_json = serde_json::to_string(user)?;
        let mut conn = self.conn.lock();
        // Single transaction so a crash never leaves one entry without
        // the other.
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            rusqlite::params![KEY_TOKEN, token],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            rusqlite::params![KEY_CURRENT_USER, user_json],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM session WHERE key IN (?1, ?2)",
            rusqlite::params![KEY_TOKEN, KEY_CURRENT_USER],
        )?;
        Ok(())
    }

    fn read(&self) -> StoredSession {
        let conn = self.conn.lock();
        let token = Self::get(&conn, KEY_TOKEN).filter(|t| !t.is_empty());
        let user = Self::get(&conn, KEY_CURRENT_USER).and_then(|raw| {
            serde_json::from_str(&raw)
                .map_err(|e| {
                    tracing::warn!("discarding unreadable stored user record: {e}");
                })
                .ok()
        });
        StoredSession { token, user }
    }
}

// ── In-memory implementation ─────────────────────────────────────

/// In-memory session store for tests and embedders that manage their own
/// persistence.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str, user: &UserSummary) -> anyhow::Result<()> {
        *self.inner.lock() = StoredSession {
            token: Some(token.to_string()),
            user: Some(user.clone()),
        };
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.inner.lock() = StoredSession::default();
        Ok(())
    }

    fn read(&self) -> StoredSession {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_user() -> UserSummary {
        UserSummary {
            id: 7,
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            is_admin: true,
        }
    }

    #[test]
    fn read_before_any_session_returns_nulls() {
        let store = SqliteSessionStore::new();
        assert_eq!(store.read(), StoredSession::default());

        // clear() on an empty store is a no-op, not an error
        store.clear().unwrap();
        assert_eq!(store.read(), StoredSession::default());
    }

    #[test]
    fn save_then_read_round_trips() {
        let store = SqliteSessionStore::new();
        store.save("tok-123", &sample_user()).unwrap();

        let stored = store.read();
        assert_eq!(stored.token.as_deref(), Some("tok-123"));
        assert_eq!(stored.user, Some(sample_user()));
    }

    #[test]
    fn clear_removes_both_entries() {
        let store = SqliteSessionStore::new();
        store.save("tok-123", &sample_user()).unwrap();
        store.clear().unwrap();

        let stored = store.read();
        assert!(stored.token.is_none());
        assert!(stored.user.is_none());
    }

    #[test]
    fn save_overwrites_previous_session() {
        let store = SqliteSessionStore::new();
        store.save("first", &sample_user()).unwrap();

        let mut other = sample_user();
        other.id = 8;
        other.is_admin = false;
        store.save("second", &other).unwrap();

        let stored = store.read();
        assert_eq!(stored.token.as_deref(), Some("second"));
        assert_eq!(stored.user.unwrap().id, 8);
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("session.db");

        let store = SqliteSessionStore::open(&db_path).unwrap();
        store.save("tok-persist", &sample_user()).unwrap();
        drop(store);

        let store = SqliteSessionStore::open(&db_path).unwrap();
        let stored = store.read();
        assert_eq!(stored.token.as_deref(), Some("tok-persist"));
        assert_eq!(stored.user, Some(sample_user()));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemorySessionStore::new();
        assert_eq!(store.read(), StoredSession::default());

        store.save("tok", &sample_user()).unwrap();
        assert_eq!(store.read().token.as_deref(), Some("tok"));

        store.clear().unwrap();
        assert_eq!(store.read(), StoredSession::default());
    }
}
