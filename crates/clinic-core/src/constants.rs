//! Defaults shared by the stores and the binaries.

use std::time::Duration;

/// Base URL used when `CLINIC_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Directory holding the persisted session when `CLINIC_SESSION_DIR` is not set.
pub const DEFAULT_SESSION_DIR: &str = ".clinic";

/// Freshness window for "load all" intents.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(120);

/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Storage slot the auth session is persisted under.
pub const AUTH_SESSION_KEY: &str = "auth";
