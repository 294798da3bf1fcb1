//! User-facing error notices.
//!
//! One persistent, dismissible notice shows the latest failure. Only login
//! failures offer a retry; background loads just leave their lists empty.

use jscorp_common::error::ErrorKind;

use crate::error::ApiError;

/// Where the failing call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Login,
    Background,
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Extra guidance shown under the message.
    pub hint: Option<String>,
    pub kind: ErrorKind,
    pub retry: bool,
}

impl Notice {
    pub fn from_error(err: &ApiError, origin: Origin, base_url: &str) -> Self {
        let hint = match (origin, err) {
            (Origin::Login, ApiError::Network { .. }) => Some(format!(
                "The server at {base_url} could not be reached. Check the API base URL, \
                 or open it in a browser to wake the backend, then retry."
            )),
            (Origin::Login, ApiError::Timeout { .. }) => Some(
                "The server is taking too long to answer; it may still be starting up.".to_owned(),
            ),
            (_, ApiError::NotLoggedIn) => Some("Log in first.".to_owned()),
            (_, ApiError::EndpointNotFound { .. }) => {
                Some("Update the API base URL and try again.".to_owned())
            }
            _ => None,
        };
        Self {
            message: err.to_string(),
            hint,
            kind: err.kind(),
            retry: origin == Origin::Login,
        }
    }
}

/// Holds the latest notice until it is dismissed or replaced.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    latest: Option<Notice>,
}

impl NoticeBoard {
    pub fn show(&mut self, notice: Notice) {
        self.latest = Some(notice);
    }

    pub fn report(&mut self, err: &ApiError, origin: Origin, base_url: &str) {
        self.show(Notice::from_error(err, origin, base_url));
    }

    pub fn dismiss(&mut self) -> Option<Notice> {
        self.latest.take()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.latest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const BASE: &str = "https://hr-backend.onrender.com";

    #[test]
    fn only_login_failures_offer_retry() {
        let err = ApiError::Rejected { status: 500, message: "Request failed: 500".into() };
        assert!(Notice::from_error(&err, Origin::Login, BASE).retry);
        assert!(!Notice::from_error(&err, Origin::Background, BASE).retry);
        assert!(!Notice::from_error(&err, Origin::Action, BASE).retry);
    }

    #[test]
    fn login_network_and_timeout_hints_differ() {
        let network = ApiError::Network { url: BASE.into(), reason: "Connection refused".into() };
        let timeout = ApiError::Timeout { url: BASE.into(), after: Duration::from_secs(70) };

        let n = Notice::from_error(&network, Origin::Login, BASE);
        let t = Notice::from_error(&timeout, Origin::Login, BASE);
        assert_eq!(n.kind, ErrorKind::Network);
        assert_eq!(t.kind, ErrorKind::Timeout);
        assert!(n.hint.as_deref().is_some_and(|h| h.contains(BASE)));
        assert_ne!(n.hint, t.hint);
        assert_ne!(n.message, t.message);
    }

    #[test]
    fn board_keeps_latest_until_dismissed() {
        let mut board = NoticeBoard::default();
        board.report(&ApiError::MissingToken, Origin::Login, BASE);
        board.report(&ApiError::MissingUsername, Origin::Login, BASE);
        assert_eq!(board.latest().map(|n| n.message.as_str()), Some("Username is required"));
        assert!(board.dismiss().is_some());
        assert!(board.latest().is_none());
    }
}
