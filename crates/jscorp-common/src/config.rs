//! Client configuration loaded from defaults, an optional config file, `.env`,
//! and environment variables.
//!
//! Precedence: env vars > .env file > jscorp-hr.toml > defaults.
//!
//! The "build-time" API sources are the values of `JSCORP_HR_API_BASE_URL` and
//! `JSCORP_HR_API_HOST` captured when the crate is compiled. They seed the
//! defaults and can still be overridden at runtime through
//! `JSCORP_HR_API__BASE_URL` / `JSCORP_HR_API__HOST`.

use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;

/// Fixed local development backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Base URL baked in at compile time, if any.
pub const BUILD_API_BASE_URL: Option<&str> = option_env!("JSCORP_HR_API_BASE_URL");

/// API host baked in at compile time, if any.
pub const BUILD_API_HOST: Option<&str> = option_env!("JSCORP_HR_API_HOST");

/// Load the configuration from every source.
///
/// Should be called once at startup; the result is handed to whatever builds
/// the resolver and gateway.
pub fn load() -> Result<ClientConfig, ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    defaults()?
        // Optional config file
        .add_source(config::File::with_name("jscorp-hr").required(false))
        // Environment variables (JSCORP_HR_API__BASE_URL, JSCORP_HR_TIMEOUTS__LOGIN_SECS, etc.)
        .add_source(environment())
        .build()?
        .try_deserialize()
}

/// `JSCORP_HR_<SECTION>__<KEY>`: one `_` after the prefix, `__` between
/// nesting levels.
fn environment() -> config::Environment {
    config::Environment::with_prefix("JSCORP_HR")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Builder pre-populated with every default, without file or env sources.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("api.default_url", DEFAULT_API_URL)?
        .set_default("hosting.domain_suffix", "onrender.com")?
        .set_default("hosting.frontend_segment", "-frontend")?
        .set_default("hosting.backend_segment", "-backend")?
        .set_default("hosting.rewrite_bare_hosts", true)?
        .set_default("timeouts.login_secs", 70)?
        .set_default("timeouts.probe_secs", 25)?
        .set_default("timeouts.warmup_secs", 15)?
        .set_default("timeouts.request_secs", 30)?;

    if let Some(url) = BUILD_API_BASE_URL {
        builder = builder.set_default("api.base_url", url)?;
    }
    if let Some(host) = BUILD_API_HOST {
        builder = builder.set_default("api.host", host)?;
    }
    Ok(builder)
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub hosting: HostingConfig,
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Full backend URL, e.g. `https://hr-backend.example.com`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Bare backend host; `https://` is prepended.
    #[serde(default)]
    pub host: Option<String>,
    /// Origin the client itself is served from (`https://hr-frontend.onrender.com`).
    #[serde(default)]
    pub page_origin: Option<String>,
    /// Last-resort backend URL.
    pub default_url: String,
}

/// Hosting-platform naming convention used to derive the backend origin from
/// the page origin.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HostingConfig {
    pub domain_suffix: String,
    pub frontend_segment: String,
    pub backend_segment: String,
    /// Rewrite `<name>.<suffix>` to `<name><backend_segment>.<suffix>` when the
    /// host has no frontend segment at all.
    pub rewrite_bare_hosts: bool,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TimeoutConfig {
    pub login_secs: u64,
    /// Manual "test connection" probe.
    pub probe_secs: u64,
    /// Fire-and-forget health ping sent when the login view opens.
    pub warmup_secs: u64,
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn login(&self) -> Duration {
        Duration::from_secs(self.login_secs)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { login_secs: 70, probe_secs: 25, warmup_secs: 15, request_secs: 30 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// JSON file backing client-local storage.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured path, else `<config dir>/jscorp-hr/storage.json`, else a
    /// file in the working directory.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::config_dir()
            .map(|dir| dir.join("jscorp-hr").join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("jscorp-hr-storage.json"))
    }
}
