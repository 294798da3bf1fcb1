//! Session & request gateway for the HR REST API.
//!
//! Every call goes through [`exchange`], which enforces a per-call deadline
//! and separates three failure families that must never be confused:
//! no response in time ([`ApiError::Timeout`]), no response at all
//! ([`ApiError::Network`]), and an HTTP error response (everything else).
//! Nothing is retried automatically.

use std::time::Duration;

use jscorp_common::config::TimeoutConfig;
use jscorp_common::error::ErrorEnvelope;
use jscorp_common::models::{LoginRequest, LoginResponse, PasswordResetRequest, PasswordResetResponse};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ApiError, Result};
use crate::resolver::normalize_base_url;
use crate::session::Session;

pub const HEALTH_PATH: &str = "/health";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const PASSWORD_RESET_PATH: &str = "/api/auth/request-password-reset";

const LOGIN_FAILED: &str = "Login failed";
const LOGIN_FORBIDDEN: &str = "This account cannot sign in yet; verify its email address first";

/// Async HR API gateway. Owns the [`Session`]; all requests share one
/// connection pool.
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use jscorp_client::{Gateway, MemoryStore, Session};
/// use jscorp_common::config::TimeoutConfig;
///
/// #[tokio::main]
/// async fn main() -> jscorp_client::Result<()> {
///     let session = Session::load(Arc::new(MemoryStore::default()));
///     let gateway = Gateway::new("http://localhost:8000", session, TimeoutConfig::default())?;
///     gateway.login("admin", "admin123").await?;
///     let stats = gateway.dashboard_stats().await?;
///     println!("{} active employees", stats.active_employees);
///     gateway.logout();
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Gateway {
    http: Client,
    base_url: String,
    session: Session,
    timeouts: TimeoutConfig,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>, session: Session, timeouts: TimeoutConfig) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into()).ok_or(ApiError::MissingBaseUrl)?;
        let http = Client::builder()
            .user_agent(concat!("jscorp-hr-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { http, base_url, session, timeouts })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── Session ───────────────────────────────────────────────────────────────

    /// Exchange credentials for a token, persist it, and return it.
    ///
    /// The username is trimmed; a blank one is rejected before any request.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::MissingUsername);
        }

        let url = self.url(LOGIN_PATH);
        let body = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        let reply = exchange(self.http.post(&url).json(&body), &url, self.timeouts.login()).await?;

        if !reply.status.is_success() {
            let err = login_failure(&url, reply.status, &reply.body);
            info!(%username, status = reply.status.as_u16(), "Login rejected");
            return Err(err);
        }

        let parsed: LoginResponse = serde_json::from_slice(&reply.body).unwrap_or_default();
        let token = parsed
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApiError::MissingToken)?;

        self.session.save(token.clone())?;
        info!(%username, "Logged in");
        Ok(token)
    }

    /// `Err(NotLoggedIn)` unless the session holds a token.
    pub fn require_session(&self) -> Result<()> {
        if self.session.is_logged_in() { Ok(()) } else { Err(ApiError::NotLoggedIn) }
    }

    /// Forget the token. Never fails.
    pub fn logout(&self) {
        self.session.clear();
    }

    // ── Requests ──────────────────────────────────────────────────────────────

    /// Issue a request against `path`, attaching the bearer token when the
    /// session has one. A 401 answer ends the session.
    pub async fn authorized_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.call(method, path, body).await
    }

    pub(crate) async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("{method} {url}");
        let mut req = self.http.request(method, &url);
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let reply = exchange(req, &url, self.timeouts.request()).await?;
        if !reply.status.is_success() {
            if reply.status == StatusCode::UNAUTHORIZED && self.session.is_logged_in() {
                warn!("Token rejected by {url}; ending session");
                self.session.clear();
            }
            return Err(request_failure(reply.status, &reply.body));
        }
        decode(&url, &reply.body)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call::<Value, T>(Method::GET, path, None).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.call(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.call(Method::PATCH, path, Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.call::<Value, Value>(Method::DELETE, path, None).await?;
        Ok(())
    }

    // ── Connectivity ──────────────────────────────────────────────────────────

    /// Ping `/health` in the background to wake a sleeping backend. The
    /// outcome is only logged.
    pub fn warm_up(&self) -> JoinHandle<()> {
        let http = self.http.clone();
        let url = self.url(HEALTH_PATH);
        let limit = self.timeouts.warmup();
        tokio::spawn(async move {
            match exchange(http.get(&url), &url, limit).await {
                Ok(reply) => debug!("Warm-up {url}: {}", reply.status),
                Err(e) => debug!("Warm-up ping failed: {e}"),
            }
        })
    }

    /// Probe `<candidate>/health` without touching the session. Returns the
    /// normalized candidate when it answered 2xx.
    pub async fn test_connection(&self, candidate: &str) -> Result<String> {
        let base = normalize_base_url(candidate).ok_or(ApiError::MissingBaseUrl)?;
        let url = format!("{base}{HEALTH_PATH}");
        let reply = exchange(self.http.get(&url), &url, self.timeouts.probe()).await?;
        if !reply.status.is_success() {
            return Err(ApiError::Rejected {
                status: reply.status.as_u16(),
                message: format!("Health check failed ({})", reply.status.as_u16()),
            });
        }
        Ok(base)
    }

    // ── Password reset ────────────────────────────────────────────────────────

    /// Ask the backend to start a password reset. The backend hands back the
    /// reset token only when it cannot deliver it out of band.
    pub async fn request_password_reset(&self, username: &str) -> Result<Option<String>> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::MissingUsername);
        }
        let url = self.url(PASSWORD_RESET_PATH);
        let body = PasswordResetRequest { username: username.to_owned() };
        let reply = exchange(self.http.post(&url).json(&body), &url, self.timeouts.request()).await?;
        if !reply.status.is_success() {
            return Err(request_failure(reply.status, &reply.body));
        }
        // The token is optional; an empty or non-JSON body just means none.
        let parsed: PasswordResetResponse = serde_json::from_slice(&reply.body).unwrap_or_default();
        Ok(parsed.token.filter(|t| !t.is_empty()))
    }
}

/// Link that opens the reset form: `page_url` with its query replaced by
/// `reset=<token>`.
pub fn reset_link(page_url: &str, token: &str) -> Option<String> {
    let mut link = Url::parse(page_url.trim()).ok()?;
    link.set_fragment(None);
    link.set_query(None);
    link.query_pairs_mut().append_pair("reset", token);
    Some(link.into())
}

// ── Transport ────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

/// Send `req` and read the whole body, all within `limit`.
async fn exchange(req: RequestBuilder, url: &str, limit: Duration) -> Result<Reply> {
    let attempt = async {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        Ok::<_, reqwest::Error>(Reply { status, body: body.to_vec() })
    };

    match tokio::time::timeout(limit, attempt).await {
        Ok(Ok(reply)) => Ok(reply),
        Ok(Err(e)) if e.is_timeout() => Err(timed_out(url, limit)),
        Ok(Err(e)) => {
            let reason = root_cause(&e);
            warn!("{url} unreachable: {reason}");
            Err(ApiError::Network { url: url.to_owned(), reason })
        }
        Err(_) => Err(timed_out(url, limit)),
    }
}

fn timed_out(url: &str, limit: Duration) -> ApiError {
    warn!("{url} timed out after {limit:?}");
    ApiError::Timeout { url: url.to_owned(), after: limit }
}

fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T> {
    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(body)
    };
    parsed.map_err(|e| ApiError::Decode { url: url.to_owned(), reason: e.to_string() })
}

// ── Classification ───────────────────────────────────────────────────────────

/// Non-2xx answer to the login exchange.
fn login_failure(url: &str, status: StatusCode, body: &[u8]) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::EndpointNotFound { url: url.to_owned() },
        StatusCode::FORBIDDEN => ApiError::Forbidden { message: LOGIN_FORBIDDEN.to_owned() },
        _ => {
            let message =
                ErrorEnvelope::detail_from_bytes(body).unwrap_or_else(|| LOGIN_FAILED.to_owned());
            if status == StatusCode::UNAUTHORIZED {
                ApiError::Unauthorized { message }
            } else {
                ApiError::Rejected { status: status.as_u16(), message }
            }
        }
    }
}

/// Non-2xx answer to any other call: server `detail`, else a status-coded
/// generic message.
fn request_failure(status: StatusCode, body: &[u8]) -> ApiError {
    let message = ErrorEnvelope::detail_from_bytes(body)
        .unwrap_or_else(|| format!("Request failed: {}", status.as_u16()));
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message },
        StatusCode::FORBIDDEN => ApiError::Forbidden { message },
        _ => ApiError::Rejected { status: status.as_u16(), message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:8000/api/auth/login";

    #[test]
    fn login_404_and_403_are_distinct() {
        let not_found = login_failure(URL, StatusCode::NOT_FOUND, b"");
        let forbidden = login_failure(URL, StatusCode::FORBIDDEN, br#"{"detail":"Email not verified"}"#);
        assert!(matches!(not_found, ApiError::EndpointNotFound { .. }));
        assert!(matches!(forbidden, ApiError::Forbidden { .. }));
        assert_ne!(not_found.to_string(), forbidden.to_string());
    }

    #[test]
    fn login_failure_prefers_server_detail() {
        let err = login_failure(
            URL,
            StatusCode::UNAUTHORIZED,
            br#"{"detail":"Incorrect username or password"}"#,
        );
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.to_string(), "Incorrect username or password");

        let err = login_failure(URL, StatusCode::INTERNAL_SERVER_ERROR, b"oops");
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn malformed_error_body_falls_back_to_status() {
        let err = request_failure(StatusCode::BAD_GATEWAY, b"<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "Request failed: 502");

        let err = request_failure(StatusCode::BAD_REQUEST, br#"{"detail":"Employee already exists"}"#);
        assert_eq!(err.to_string(), "Employee already exists");
        assert_eq!(err.status(), Some(400));

        assert!(matches!(request_failure(StatusCode::UNAUTHORIZED, b""), ApiError::Unauthorized { .. }));
        assert!(matches!(request_failure(StatusCode::FORBIDDEN, b""), ApiError::Forbidden { .. }));
    }

    #[test]
    fn empty_success_body_decodes_as_null() {
        decode::<()>(URL, b"").unwrap();
        let value: Value = decode(URL, b"  ").unwrap();
        assert!(value.is_null());
        assert!(matches!(decode::<Vec<i64>>(URL, b"nope"), Err(ApiError::Decode { .. })));
    }

    #[test]
    fn require_session_follows_the_token() {
        use std::sync::Arc;

        use crate::store::MemoryStore;

        let session = Session::load(Arc::new(MemoryStore::default()));
        let gateway = Gateway::new("http://localhost:8000", session, TimeoutConfig::default()).unwrap();
        assert!(matches!(gateway.require_session(), Err(ApiError::NotLoggedIn)));

        gateway.session().save("tok").unwrap();
        gateway.require_session().unwrap();
    }

    #[test]
    fn reset_link_replaces_query() {
        assert_eq!(
            reset_link("https://hr-frontend.onrender.com/app?tab=users#top", "abc123").as_deref(),
            Some("https://hr-frontend.onrender.com/app?reset=abc123")
        );
        assert_eq!(reset_link("not a url", "abc"), None);
    }
}
