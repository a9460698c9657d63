//! Console configuration: backend host, route protection, cookie lifetime.
//!
//! Everything here is read-only at runtime. The defaults reproduce the
//! deployed console; `from_env()` lets an operator point the client at a
//! staging backend without recompiling.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend the console talks to. All request paths are relative to this.
const DEFAULT_API_HOST: &str = "https://rexlee.space:445";

/// Route prefixes that require an active session to navigate into.
const DEFAULT_PROTECTED_PATHS: [&str; 4] = [
    "/dashboard/user",
    "/dashboard/category",
    "/dashboard/subCategory",
    "/dashboard/product",
];

/// Where the route guard sends unauthenticated navigation.
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Guard-cookie lifetime: 1 day, independent of the token's own expiry.
const DEFAULT_GUARD_COOKIE_TTL_SECS: u64 = 24 * 3600;

/// Static configuration for the console client core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Backend base address (no trailing slash).
    pub api_host: String,
    /// Ordered set of path prefixes gated by the route guard.
    pub protected_paths: Vec<String>,
    /// Login entry point the guard redirects to.
    pub login_path: String,
    /// Max age of the guard cookie, in seconds.
    pub guard_cookie_ttl_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            protected_paths: DEFAULT_PROTECTED_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            guard_cookie_ttl_secs: DEFAULT_GUARD_COOKIE_TTL_SECS,
        }
    }
}

impl ConsoleConfig {
    /// Defaults with environment overrides applied.
    ///
    /// `CATALOG_API_HOST` replaces the backend address;
    /// `CATALOG_LOGIN_PATH` replaces the login entry point.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("CATALOG_API_HOST") {
            if !host.is_empty() {
                config.api_host = host.trim_end_matches('/').to_string();
            }
        }
        if let Ok(path) = std::env::var("CATALOG_LOGIN_PATH") {
            if !path.is_empty() {
                config.login_path = path;
            }
        }
        config
    }

    /// Default location for the session database
    /// (`<platform data dir>/catalog-console/session.db`).
    pub fn default_session_db_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "catalog-console")?;
        Some(dirs.data_dir().join("session.db"))
    }
}
