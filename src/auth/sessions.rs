//! Session management
//!
//! In-memory bearer-token sessions with expiry. Tokens are opaque UUIDs
//! handed out at login and resolved on every gated request.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session expiry time: 12 hours
pub const SESSION_TTL_HOURS: i64 = 12;

/// One authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn new(account_id: &str) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4(),
            account_id: account_id.to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Manages active sessions
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Issue a fresh session for an account
    pub async fn issue(&self, account_id: &str) -> Session {
        let session = Session::new(account_id);

        let mut sessions = self.inner.write().await;
        sessions.insert(session.token, session.clone());

        tracing::debug!(account_id = %account_id, "Issued session token");
        session
    }

    /// Resolve a token to its session, if present and unexpired
    ///
    /// Expired sessions are removed on the way out.
    pub async fn resolve(&self, token: Uuid) -> Option<Session> {
        {
            let sessions = self.inner.read().await;
            match sessions.get(&token) {
                Some(session) if !session.is_expired() => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut sessions = self.inner.write().await;
        sessions.remove(&token);
        None
    }

    /// Revoke a token; returns whether a session existed
    pub async fn revoke(&self, token: Uuid) -> bool {
        let mut sessions = self.inner.write().await;
        sessions.remove(&token).is_some()
    }

    /// Remove all expired sessions, returning how many were dropped
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::info!(count = removed, "Cleaned up expired sessions");
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
