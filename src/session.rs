//! Session provider: bearer credential and authenticated signal.

use std::sync::RwLock;

/// Read-only view of the current session, consumed by gateways and the
/// dashboard activation check.
pub trait SessionProvider: Send + Sync {
    fn is_authenticated(&self) -> bool {
        self.current_credential().is_some()
    }

    fn current_credential(&self) -> Option<String>;
}

/// Process-wide in-memory token session with explicit login/logout.
#[derive(Debug, Default)]
pub struct TokenSession {
    token: RwLock<Option<String>>,
}

impl TokenSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.login(token);
        session
    }

    /// Store a credential. Blank tokens leave the session logged out.
    pub fn login(&self, token: impl Into<String>) {
        let token = token.into();
        let mut guard = self.token.write().unwrap_or_else(|p| p.into_inner());
        *guard = if token.trim().is_empty() { None } else { Some(token) };
    }

    pub fn logout(&self) {
        let mut guard = self.token.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }
}

impl SessionProvider for TokenSession {
    fn current_credential(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_logout_toggle_authentication() {
        let session = TokenSession::new();
        assert!(!session.is_authenticated());

        session.login("mock-jwt-token");
        assert!(session.is_authenticated());
        assert_eq!(session.current_credential().as_deref(), Some("mock-jwt-token"));

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_credential(), None);
    }

    #[test]
    fn blank_token_is_not_a_credential() {
        let session = TokenSession::with_token("   ");
        assert!(!session.is_authenticated());
    }
}
