//! Account persistence
//!
//! SQLite-backed account records. Uniqueness of the username is enforced by
//! the schema constraint, not by a lookup beforehand: creation is a single
//! atomic INSERT and a constraint violation surfaces as `UsernameTaken`.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::{password, AuthError};

/// One registered account
#[derive(Debug, Clone, serde::Serialize)]
pub struct Account {
    pub id: String,
    pub username: String,
}

/// Persistent account store
#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account atomically
    ///
    /// A unique-constraint violation on the username maps to
    /// `UsernameTaken`; there is no query-then-insert window.
    pub async fn create(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let id = Uuid::new_v4().to_string();
        let password_hash = password::hash_password(password);

        let result =
            sqlx::query("INSERT INTO accounts (id, username, password_hash) VALUES (?, ?, ?)")
                .bind(&id)
                .bind(username)
                .bind(&password_hash)
                .execute(&self.pool)
                .await;

        match result {
            Ok(_) => {
                tracing::info!(username = %username, "Account created");
                Ok(Account {
                    id,
                    username: username.to_string(),
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(AuthError::Database(e.to_string())),
        }
    }

    /// Verify credentials, returning the account on success
    pub async fn verify(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let row: Option<(String, String, String)> =
            sqlx::query_as("SELECT id, username, password_hash FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;

        match row {
            Some((id, username, hash)) if password::verify_password(password, &hash) => {
                Ok(Account { id, username })
            }
            // Unknown user and wrong password are indistinguishable to the caller
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Look up an account by id
    pub async fn get(&self, id: &str) -> Result<Option<Account>, AuthError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT id, username FROM accounts WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(row.map(|(id, username)| Account { id, username }))
    }
}
