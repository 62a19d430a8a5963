//! Authentication
//!
//! The authenticator gates access to the conversion pipeline. It owns the
//! persistent account store and the in-memory session table; routes only see
//! the facade: register, login, logout, and `current_account`.

pub mod accounts;
pub mod password;
pub mod sessions;

pub use accounts::{Account, AccountStore};
pub use sessions::{Session, SessionManager};

use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::UsernameTaken(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidRegistration(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRegistration(_) => "INVALID_REGISTRATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Identity and session facade
#[derive(Clone)]
pub struct Authenticator {
    accounts: AccountStore,
    sessions: SessionManager,
}

impl Authenticator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            accounts: AccountStore::new(pool),
            sessions: SessionManager::new(),
        }
    }

    /// Register a new account
    pub async fn register(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidRegistration("username is empty".into()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidRegistration("password is empty".into()));
        }

        self.accounts.create(username, password).await
    }

    /// Verify credentials and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let account = self.accounts.verify(username, password).await?;
        Ok(self.sessions.issue(&account.id).await)
    }

    /// Revoke a session token; returns whether one existed
    pub async fn logout(&self, token: Uuid) -> bool {
        self.sessions.revoke(token).await
    }

    /// Resolve the account behind a bearer token, if any
    ///
    /// `None` means the request is unauthenticated and must not reach the
    /// conversion pipeline.
    pub async fn current_account(&self, token: Option<Uuid>) -> Option<Account> {
        let session = self.sessions.resolve(token?).await?;
        match self.accounts.get(&session.account_id).await {
            Ok(account) => account,
            Err(e) => {
                tracing::error!(error = %e, "Account lookup failed during session resolution");
                None
            }
        }
    }
}
