//! Endpoint resolution: picks the backend base URL the gateway talks to.
//!
//! Resolution order (first non-blank source wins):
//!
//! 1. **Stored override**: set by the user, persisted under [`API_BASE_KEY`]
//! 2. **Build URL**: full base URL configured at build time
//! 3. **Build host**: bare host configured at build time, served over `https`
//! 4. **Hosting convention**: the page's own host with its frontend segment
//!    swapped for the backend one (`hr-frontend.onrender.com` →
//!    `hr-backend.onrender.com`)
//! 5. **Local default**: `http://localhost:8000`
//!
//! Whatever wins is returned without trailing `/`.

use jscorp_common::config::{ApiConfig, ClientConfig, HostingConfig};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, Result};
use crate::store::{API_BASE_KEY, KeyValueStore};

/// Which source produced the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    StoredOverride,
    BuildUrl,
    BuildHost,
    HostingConvention,
    LocalDefault,
}

impl EndpointSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StoredOverride => "stored override",
            Self::BuildUrl => "configured base URL",
            Self::BuildHost => "configured host",
            Self::HostingConvention => "hosting convention",
            Self::LocalDefault => "local default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub base_url: String,
    pub source: EndpointSource,
}

/// Raw candidates, exactly as read from storage and configuration.
#[derive(Debug, Clone, Default)]
pub struct EndpointSources {
    pub stored_override: Option<String>,
    pub build_url: Option<String>,
    pub build_host: Option<String>,
    pub page_origin: Option<String>,
}

impl EndpointSources {
    /// Collect candidates from storage and configuration. An unreadable store
    /// counts as "no override".
    pub fn gather(store: &dyn KeyValueStore, api: &ApiConfig) -> Self {
        let stored_override = store.get(API_BASE_KEY).unwrap_or_else(|e| {
            warn!("Ignoring stored API base override: {e}");
            None
        });
        Self {
            stored_override,
            build_url: api.base_url.clone(),
            build_host: api.host.clone(),
            page_origin: api.page_origin.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndpointResolver {
    hosting: HostingConfig,
    default_url: String,
}

impl EndpointResolver {
    pub fn new(hosting: HostingConfig, default_url: impl Into<String>) -> Self {
        Self { hosting, default_url: default_url.into() }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.hosting.clone(), cfg.api.default_url.clone())
    }

    /// Gather candidates from `store` and `api`, then [`resolve`](Self::resolve).
    pub fn resolve_with_store(&self, store: &dyn KeyValueStore, api: &ApiConfig) -> ResolvedEndpoint {
        self.resolve(&EndpointSources::gather(store, api))
    }

    /// Pure precedence walk over `sources`.
    pub fn resolve(&self, sources: &EndpointSources) -> ResolvedEndpoint {
        let resolved = self.pick(sources);
        debug!("API base ({}): {}", resolved.source.label(), resolved.base_url);
        resolved
    }

    fn pick(&self, sources: &EndpointSources) -> ResolvedEndpoint {
        let found = |base_url, source| ResolvedEndpoint { base_url, source };

        if let Some(url) = sources.stored_override.as_deref().and_then(normalize_base_url) {
            return found(url, EndpointSource::StoredOverride);
        }
        if let Some(url) = sources.build_url.as_deref().and_then(normalize_base_url) {
            return found(url, EndpointSource::BuildUrl);
        }
        if let Some(host) = sources.build_host.as_deref().and_then(normalize_base_url) {
            let url = if has_scheme(&host) { host } else { format!("https://{host}") };
            return found(url, EndpointSource::BuildHost);
        }
        if let Some(url) = sources.page_origin.as_deref().and_then(|o| self.from_page_origin(o)) {
            return found(url, EndpointSource::HostingConvention);
        }
        let url = normalize_base_url(&self.default_url)
            .unwrap_or_else(|| jscorp_common::config::DEFAULT_API_URL.to_owned());
        found(url, EndpointSource::LocalDefault)
    }

    /// Derive the backend origin from the page origin, or `None` when the
    /// page is not served under the configured hosting naming convention.
    fn from_page_origin(&self, origin: &str) -> Option<String> {
        let page = Url::parse(origin.trim()).ok()?;
        let host = page.host_str()?;

        let domain = self.hosting.domain_suffix.trim_start_matches('.');
        if domain.is_empty() {
            return None;
        }
        let name = host.strip_suffix(domain)?.strip_suffix('.')?;
        if name.is_empty() {
            return None;
        }

        let frontend = self.hosting.frontend_segment.as_str();
        let backend = self.hosting.backend_segment.as_str();

        if !frontend.is_empty() {
            if let Some(stem) = name.strip_suffix(frontend).filter(|s| !s.is_empty()) {
                let mut api = page.clone();
                api.set_host(Some(&format!("{stem}{backend}.{domain}"))).ok()?;
                return Some(api.origin().ascii_serialization());
            }
        }

        // Bare service name: `hr.onrender.com` → `https://hr-backend.onrender.com`.
        let bare = frontend.is_empty() || !name.contains(frontend);
        if self.hosting.rewrite_bare_hosts && bare && !name.ends_with(backend) {
            return Some(format!("https://{name}{backend}.{domain}"));
        }
        None
    }
}

/// Trim whitespace and trailing `/`; blank input yields `None`.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/').trim_end();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn has_scheme(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Persist a user override after normalizing it. Returns the stored value.
pub fn save_override(store: &dyn KeyValueStore, raw: &str) -> Result<String> {
    let url = normalize_base_url(raw).ok_or(ApiError::MissingBaseUrl)?;
    store.set(API_BASE_KEY, &url)?;
    debug!("Stored API base override: {url}");
    Ok(url)
}

/// Forget the user override; resolution falls back to configuration.
pub fn clear_override(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(API_BASE_KEY)?;
    Ok(())
}
