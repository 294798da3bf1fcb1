//! Session: the single owner of the bearer token.
//!
//! The token lives in memory and is mirrored to the [`KeyValueStore`] under
//! [`TOKEN_KEY`]. It is read once in [`Session::load`], written by
//! [`Session::save`] after a successful login, and removed by
//! [`Session::clear`] on logout or when the backend rejects it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::store::{KeyValueStore, StoreError, TOKEN_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    token: Mutex<Option<String>>,
}

impl Session {
    /// Restore the persisted token, if any. A blank or unreadable stored
    /// value counts as logged out.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let token = store
            .get(TOKEN_KEY)
            .unwrap_or_else(|e| {
                warn!("Ignoring persisted session token: {e}");
                None
            })
            .filter(|t| !t.trim().is_empty());
        Self { store, token: Mutex::new(token) }
    }

    pub fn state(&self) -> SessionState {
        if self.lock().is_some() { SessionState::LoggedIn } else { SessionState::LoggedOut }
    }

    pub fn is_logged_in(&self) -> bool {
        self.state() == SessionState::LoggedIn
    }

    /// Current token. Opaque: never inspected, only forwarded.
    pub fn token(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Replace any previous token and persist the new one. The in-memory
    /// token only changes once the write succeeded.
    pub fn save(&self, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        self.store.set(TOKEN_KEY, &token)?;
        *self.lock() = Some(token);
        info!("Session started");
        Ok(())
    }

    /// Drop the token from memory and storage. Never fails; a storage error
    /// is logged and the in-memory session is still cleared.
    pub fn clear(&self) {
        let had_token = self.lock().take().is_some();
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            warn!("Could not remove persisted session token: {e}");
        }
        if had_token {
            info!("Session ended");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("state", &self.state()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Ok(Some("stale".into()))
        }
        fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "storage.json".into(),
                source: std::io::Error::other("read-only"),
            })
        }
        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.set(key, "")
        }
    }

    #[test]
    fn starts_logged_out_without_a_token() {
        let session = Session::load(Arc::new(MemoryStore::default()));
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn blank_persisted_token_is_ignored() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "  ")]));
        assert!(!Session::load(store).is_logged_in());
    }

    #[test]
    fn save_and_clear_drive_the_state_machine() {
        let store = Arc::new(MemoryStore::default());
        let session = Session::load(store.clone());

        session.save("first").unwrap();
        session.save("second").unwrap();
        assert_eq!(session.token().as_deref(), Some("second"));
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("second"));

        // a fresh load sees the persisted token
        assert!(Session::load(store.clone()).is_logged_in());

        session.clear();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        session.clear();
    }

    #[test]
    fn failed_save_keeps_previous_state_and_clear_never_fails() {
        let session = Session::load(Arc::new(BrokenStore));
        assert_eq!(session.token().as_deref(), Some("stale"));

        assert!(session.save("new").is_err());
        assert_eq!(session.token().as_deref(), Some("stale"));

        session.clear();
        assert!(!session.is_logged_in());
    }

    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io {
                path: "storage.json".into(),
                source: std::io::Error::other("permission denied"),
            })
        }
        fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Ok(())
        }
        fn remove(&self, _: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn unreadable_token_counts_as_logged_out() {
        let session = Session::load(Arc::new(UnreadableStore));
        assert_eq!(session.state(), SessionState::LoggedOut);
        session.save("fresh").unwrap();
        assert!(session.is_logged_in());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let session = Session::load(Arc::new(MemoryStore::default()));
        session.save("super-secret").unwrap();
        assert!(!format!("{session:?}").contains("super-secret"));
    }
}
