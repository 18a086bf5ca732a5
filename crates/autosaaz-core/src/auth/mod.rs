//! Session token state and sign-in/sign-out events
//!
//! The backend expects a per-session bearer token next to the static API
//! key. `TokenStore` owns that token and broadcasts transitions so other
//! subsystems (the request cache in particular) can react to sign-out
//! without being wired into every call site.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Session lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session token was stored
    SignedIn,
    /// The session token was cleared
    SignedOut,
}

/// Source of the current per-session bearer token
pub trait SessionTokenProvider: Send + Sync {
    /// The current session token, if a session is active
    fn session_token(&self) -> Option<String>;
}

/// Holds the session token and broadcasts lifecycle events
#[derive(Debug, Clone)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl TokenStore {
    /// Create an empty token store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            token: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Store a session token and announce the sign-in
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
        let _ = self.events.send(SessionEvent::SignedIn);
    }

    /// Clear the session token and announce the sign-out.
    ///
    /// Emitted unconditionally: a rejected token may already be absent
    /// locally, and listeners still need the teardown signal.
    pub fn clear(&self) {
        self.token.write().take();
        let _ = self.events.send(SessionEvent::SignedOut);
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTokenProvider for TokenStore {
    fn session_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let store = TokenStore::new();
        assert!(store.session_token().is_none());

        store.set_token("jwt-abc");
        assert_eq!(store.session_token().as_deref(), Some("jwt-abc"));

        store.clear();
        assert!(store.session_token().is_none());
    }

    #[tokio::test]
    async fn test_clear_emits_signed_out() {
        let store = TokenStore::new();
        let mut rx = store.subscribe();

        store.set_token("jwt-abc");
        store.clear();

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::SignedIn);
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::SignedOut);
    }

    #[tokio::test]
    async fn test_clear_without_token_still_signals() {
        let store = TokenStore::new();
        let mut rx = store.subscribe();

        store.clear();
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::SignedOut);
    }
}
