//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the composition root.
//! Nothing in the stores reads environment variables; the binaries read them and hand the raw
//! values to the parsing helpers below, which keeps tests free of process-wide state.

use crate::constants::{DEFAULT_API_URL, DEFAULT_CACHE_TTL, DEFAULT_HTTP_TIMEOUT, DEFAULT_SESSION_DIR};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClinicConfig {
    api_base_url: String,
    session_dir: PathBuf,
    cache_ttl: Duration,
    http_timeout: Duration,
}

impl ClinicConfig {
    /// Create a new `ClinicConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::InvalidInput`] if the base URL is not an `http(s)` URL or if either
    /// duration is zero.
    pub fn new(
        api_base_url: impl Into<String>,
        session_dir: PathBuf,
        cache_ttl: Duration,
        http_timeout: Duration,
    ) -> ClinicResult<Self> {
        let api_base_url = api_base_url.into().trim().to_string();
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ClinicError::InvalidInput(format!(
                "api base url must start with http:// or https:// (got {api_base_url:?})"
            )));
        }
        if cache_ttl.is_zero() {
            return Err(ClinicError::InvalidInput(
                "cache ttl must be greater than zero".into(),
            ));
        }
        if http_timeout.is_zero() {
            return Err(ClinicError::InvalidInput(
                "http timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            session_dir,
            cache_ttl,
            http_timeout,
        })
    }

    /// Build a configuration from raw environment values.
    ///
    /// Each argument is the optional value of the matching variable (`CLINIC_API_URL`,
    /// `CLINIC_SESSION_DIR`, `CLINIC_CACHE_TTL_SECS`, `CLINIC_HTTP_TIMEOUT_SECS`). Missing or
    /// blank values fall back to the defaults in [`crate::constants`].
    pub fn from_env_values(
        api_base_url: Option<String>,
        session_dir: Option<String>,
        cache_ttl_secs: Option<String>,
        http_timeout_secs: Option<String>,
    ) -> ClinicResult<Self> {
        let api_base_url = non_blank(api_base_url).unwrap_or_else(|| DEFAULT_API_URL.into());
        let session_dir = non_blank(session_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR));
        let cache_ttl = duration_from_env_value("CLINIC_CACHE_TTL_SECS", cache_ttl_secs)?
            .unwrap_or(DEFAULT_CACHE_TTL);
        let http_timeout = duration_from_env_value("CLINIC_HTTP_TIMEOUT_SECS", http_timeout_secs)?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        Self::new(api_base_url, session_dir, cache_ttl, http_timeout)
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            cache_ttl: DEFAULT_CACHE_TTL,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a whole number of seconds from an optional string value.
///
/// `None` or blank input yields `Ok(None)` so the caller can apply its default.
pub fn duration_from_env_value(name: &str, value: Option<String>) -> ClinicResult<Option<Duration>> {
    non_blank(value)
        .map(|v| {
            v.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                ClinicError::InvalidInput(format!("{name} must be a whole number of seconds (got {v:?})"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_values_applies_defaults() {
        let cfg = ClinicConfig::from_env_values(None, None, None, Some("  ".into()))
            .expect("defaults should be valid");

        assert_eq!(cfg.api_base_url(), DEFAULT_API_URL);
        assert_eq!(cfg.session_dir(), Path::new(DEFAULT_SESSION_DIR));
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(120));
        assert_eq!(cfg.http_timeout(), DEFAULT_HTTP_TIMEOUT);
    }

    #[test]
    fn test_from_env_values_parses_overrides() {
        let cfg = ClinicConfig::from_env_values(
            Some("https://clinic.example/api".into()),
            Some("/tmp/clinic".into()),
            Some("30".into()),
            Some("5".into()),
        )
        .expect("overrides should be valid");

        assert_eq!(cfg.api_base_url(), "https://clinic.example/api");
        assert_eq!(cfg.session_dir(), Path::new("/tmp/clinic"));
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(30));
        assert_eq!(cfg.http_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = ClinicConfig::from_env_values(Some("ftp://clinic".into()), None, None, None)
            .expect_err("ftp url should be rejected");
        assert!(matches!(err, ClinicError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_bad_and_zero_durations() {
        assert!(ClinicConfig::from_env_values(None, None, Some("two".into()), None).is_err());
        assert!(ClinicConfig::from_env_values(None, None, Some("0".into()), None).is_err());
        assert!(ClinicConfig::from_env_values(None, None, None, Some("-1".into())).is_err());
    }
}
