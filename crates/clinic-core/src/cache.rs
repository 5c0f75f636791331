//! Freshness policy for "load all" intents.

use crate::constants::DEFAULT_CACHE_TTL;
use std::time::Duration;

/// Decides whether a "load all" can be served from the table already held.
///
/// The window is measured from the table's `last_fetched` stamp. This is a best-effort client
/// cache: changes made by other clients inside the window are not noticed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    window: Duration,
}

impl CachePolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True when the request may be skipped.
    ///
    /// `force` always bypasses the cache, and a table that has never been fetched is never fresh.
    /// A stamp in the future (clock moved backwards) counts as fresh.
    pub fn serves_from_cache(&self, last_fetched: Option<i64>, now_millis: i64, force: bool) -> bool {
        if force {
            return false;
        }
        let Some(last_fetched) = last_fetched else {
            return false;
        };
        let age = now_millis.saturating_sub(last_fetched);
        let window = i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX);
        age < window
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
