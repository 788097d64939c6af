//! Panel connection settings and search defaults.
//!
//! [`PanelConfig`] controls how the panel is reached (URL, token, timeout,
//! TLS verification, User-Agent). It can be read from the environment
//! (optionally seeded from a `.env` file) or from a TOML file.
//!
//! [`SearchOptions`] carries the scan budget and thresholds for fuzzy
//! search; values outside their allowed ranges are clamped, not rejected.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 30.0;

/// Default User-Agent sent to the panel.
pub const DEFAULT_USER_AGENT: &str = "PterodactylMCP/0.1";

/// Largest page size the panel accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Largest number of matches a search may return.
pub const MAX_LIMIT: usize = 50;

/// Connection settings for a Pterodactyl panel.
#[derive(Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Base URL of the panel, without a trailing slash.
    pub panel_url: String,
    /// Application API key, sent as a bearer token.
    pub panel_token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Whether to verify the panel's TLS certificate.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_verify_ssl() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

impl fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelConfig")
            .field("panel_url", &self.panel_url)
            .field("panel_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("verify_ssl", &self.verify_ssl)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl PanelConfig {
    /// Create a config with the given URL and token and default settings.
    pub fn new(panel_url: impl Into<String>, panel_token: impl Into<String>) -> Self {
        Self {
            panel_url: trim_url(&panel_url.into()),
            panel_token: panel_token.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            verify_ssl: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Read the config from process environment variables.
    ///
    /// A `.env` file in the working directory (or any parent) is loaded
    /// first; variables already set in the environment win.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `PANEL_URL` or `PANEL_TOKEN` is
    /// missing, or if `PANEL_TIMEOUT` is not a number.
    pub fn from_env() -> Result<Self, SearchError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to load .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    ///
    /// Recognised keys: `PANEL_URL`, `PANEL_TOKEN`, `PANEL_TIMEOUT`,
    /// `PANEL_VERIFY_SSL`, `PANEL_USER_AGENT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).unwrap_or_default();

        let panel_url = read("PANEL_URL");
        if panel_url.is_empty() {
            return Err(SearchError::Config(
                "missing required env var: PANEL_URL".into(),
            ));
        }
        let panel_token = read("PANEL_TOKEN");
        if panel_token.is_empty() {
            return Err(SearchError::Config(
                "missing required env var: PANEL_TOKEN".into(),
            ));
        }

        let timeout_raw = read("PANEL_TIMEOUT");
        let timeout_seconds = if timeout_raw.is_empty() {
            DEFAULT_TIMEOUT_SECONDS
        } else {
            timeout_raw.parse::<f64>().map_err(|_| {
                SearchError::Config(format!("PANEL_TIMEOUT is not a number: {timeout_raw}"))
            })?
        };

        let verify_ssl = parse_bool(lookup("PANEL_VERIFY_SSL").as_deref(), true);

        let user_agent = match read("PANEL_USER_AGENT") {
            ua if ua.is_empty() => DEFAULT_USER_AGENT.to_owned(),
            ua => ua,
        };

        Ok(Self {
            panel_url: trim_url(&panel_url),
            panel_token,
            timeout_seconds,
            verify_ssl,
            user_agent,
        })
    }

    /// Load the config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| SearchError::Config(e.to_string()))?;
        config.panel_url = trim_url(&config.panel_url);
        Ok(config)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `panel_url` must be an absolute `http` or `https` URL
    /// - `panel_token` must not be empty
    /// - `timeout_seconds` must be a positive, finite number
    pub fn validate(&self) -> Result<(), SearchError> {
        let parsed = url::Url::parse(&self.panel_url)
            .map_err(|e| SearchError::Config(format!("panel_url is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::Config(
                "panel_url must use http or https".into(),
            ));
        }
        if self.panel_token.trim().is_empty() {
            return Err(SearchError::Config("panel_token must not be empty".into()));
        }
        if !(self.timeout_seconds.is_finite() && self.timeout_seconds > 0.0) {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

/// Interpret an environment flag. Unset means `default`.
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
    }
}

/// Scan budget and thresholds for a fuzzy search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of matches to return (clamped to `1..=50`).
    pub limit: usize,
    /// Maximum number of pages to request (at least 1).
    pub max_pages: u32,
    /// Page size requested from the panel (clamped to `1..=100`).
    pub per_page: u32,
    /// Minimum score (0–100) for a record to count as a match.
    pub min_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            max_pages: 5,
            per_page: 100,
            min_score: 55.0,
        }
    }
}

impl SearchOptions {
    /// Returns a copy with every field forced into its allowed range.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_LIMIT),
            max_pages: self.max_pages.max(1),
            per_page: clamp_per_page(self.per_page),
            min_score: self.min_score,
        }
    }
}

/// Clamp a requested page size into `1..=100`.
pub fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn lookup_with_required_vars_uses_defaults() {
        let config = PanelConfig::from_lookup(lookup(&[
            ("PANEL_URL", "https://panel.example.com/"),
            ("PANEL_TOKEN", "ptla_secret"),
        ]))
        .expect("config");
        assert_eq!(config.panel_url, "https://panel.example.com");
        assert_eq!(config.panel_token, "ptla_secret");
        assert!((config.timeout_seconds - 30.0).abs() < f64::EPSILON);
        assert!(config.verify_ssl);
        assert_eq!(config.user_agent, "PterodactylMCP/0.1");
    }

    #[test]
    fn missing_url_rejected() {
        let err = PanelConfig::from_lookup(lookup(&[("PANEL_TOKEN", "t")])).unwrap_err();
        assert!(err.to_string().contains("PANEL_URL"));
    }

    #[test]
    fn blank_token_rejected() {
        let err = PanelConfig::from_lookup(lookup(&[
            ("PANEL_URL", "https://panel.example.com"),
            ("PANEL_TOKEN", "   "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PANEL_TOKEN"));
    }

    #[test]
    fn optional_vars_override_defaults() {
        let config = PanelConfig::from_lookup(lookup(&[
            ("PANEL_URL", "http://127.0.0.1:8080"),
            ("PANEL_TOKEN", "t"),
            ("PANEL_TIMEOUT", "5.5"),
            ("PANEL_VERIFY_SSL", "off"),
            ("PANEL_USER_AGENT", "Bot/2"),
        ]))
        .expect("config");
        assert!((config.timeout_seconds - 5.5).abs() < f64::EPSILON);
        assert!(!config.verify_ssl);
        assert_eq!(config.user_agent, "Bot/2");
    }

    #[test]
    fn bad_timeout_rejected() {
        let err = PanelConfig::from_lookup(lookup(&[
            ("PANEL_URL", "https://panel.example.com"),
            ("PANEL_TOKEN", "t"),
            ("PANEL_TIMEOUT", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PANEL_TIMEOUT"));
    }

    #[test]
    fn parse_bool_accepts_common_truthy_spellings() {
        for v in ["1", "true", "YES", "y", " on "] {
            assert!(parse_bool(Some(v), false), "{v} should be true");
        }
        for v in ["0", "false", "no", ""] {
            assert!(!parse_bool(Some(v), true), "{v} should be false");
        }
        assert!(parse_bool(None, true));
        assert!(!parse_bool(None, false));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("panel.toml");
        std::fs::write(
            &path,
            "panel_url = \"https://panel.example.com//\"\npanel_token = \"abc\"\nverify_ssl = false\n",
        )
        .expect("write");
        let config = PanelConfig::from_file(&path).expect("load");
        assert_eq!(config.panel_url, "https://panel.example.com");
        assert!(!config.verify_ssl);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = PanelConfig::from_file(Path::new("/nonexistent/panel.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let config = PanelConfig::new("ftp://panel.example.com", "t");
        assert!(config.validate().unwrap_err().to_string().contains("http"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = PanelConfig {
            timeout_seconds: 0.0,
            ..PanelConfig::new("https://panel.example.com", "t")
        };
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("timeout_seconds"));
    }

    #[test]
    fn debug_redacts_token() {
        let config = PanelConfig::new("https://panel.example.com", "ptla_super_secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("ptla_super_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn default_search_options() {
        let opts = SearchOptions::default();
        assert_eq!(opts.limit, 10);
        assert_eq!(opts.max_pages, 5);
        assert_eq!(opts.per_page, 100);
        assert!((opts.min_score - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn search_options_clamp_into_range() {
        let opts = SearchOptions {
            limit: 0,
            max_pages: 0,
            per_page: 0,
            min_score: 10.0,
        }
        .clamped();
        assert_eq!(opts.limit, 1);
        assert_eq!(opts.max_pages, 1);
        assert_eq!(opts.per_page, 1);

        let opts = SearchOptions {
            limit: 500,
            max_pages: 9,
            per_page: 1000,
            min_score: 10.0,
        }
        .clamped();
        assert_eq!(opts.limit, 50);
        assert_eq!(opts.max_pages, 9);
        assert_eq!(opts.per_page, 100);
    }
}
