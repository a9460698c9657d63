//! Client core for the catalog admin console.
//!
//! The console itself is pages over a REST backend; everything with
//! actual behavior lives here:
//!
//! - [`api`] — the request dispatcher (auth headers, body encoding,
//!   envelope normalization) plus thin per-resource call functions.
//! - [`session`] — durable store, observable in-memory state, expiry
//!   timer, and the login/logout/expiry orchestration.
//! - [`guard`] — route gating ahead of rendering, driven by a presence
//!   cookie distinct from the API token.
//! - [`config`] — the fixed backend host, protected prefixes and cookie
//!   lifetime.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use catalog_console::{ApiClient, ConsoleConfig, SessionManager, SqliteSessionStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConsoleConfig::from_env();
//! let db = ConsoleConfig::default_session_db_path().expect("no data dir");
//! let store = Arc::new(SqliteSessionStore::open(&db)?);
//! let manager = SessionManager::new(&config, store);
//! let client = ApiClient::new(&config, manager.state())?;
//!
//! let user = manager.login(&client, "admin@example.com", "secret").await?;
//! println!("logged in as {}", user.name);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod guard;
pub mod session;

pub use api::{ApiClient, ApiError, Body, DataResponse, Method};
pub use config::ConsoleConfig;
pub use guard::{GuardCookie, RouteDecision, RouteGuard, GUARD_COOKIE_NAME};
pub use session::{
    ExpirationScheduler, MemorySessionStore, Session, SessionManager, SessionState,
    SessionStore, SqliteSessionStore, StoredSession, UserSummary,
};
