//! Authentication Module
//!
//! Handles account registration, login, and session management.
//! Accounts and sessions live in the server's SQLite database, so any
//! number of server instances sharing the database share sessions.

pub mod middleware;

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Account, AccountInfo, Session};

/// Fixed bcrypt work factor.
const BCRYPT_COST: u32 = 10;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Auth manager handles registration and the session lifecycle.
pub struct AuthManager {
    pool: SqlitePool,
    session_ttl: Duration,
}

impl AuthManager {
    pub fn new(pool: SqlitePool, session_ttl_days: i64) -> Self {
        Self {
            pool,
            session_ttl: Duration::days(session_ttl_days),
        }
    }

    /// Register a new account. The plaintext password is hashed here and
    /// never stored or returned.
    pub async fn register(&self, username: &str, password: &str, confirm: &str) -> Result<Account> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::Validation(
                "username and password are required".to_string(),
            ));
        }
        if password != confirm {
            return Err(Error::Validation("passwords don't match".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        // Check if username already exists
        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(Error::Conflict("username already exists".to_string()));
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: bcrypt::hash(password, BCRYPT_COST)?,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO accounts (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("[Auth] Account registered: {}", account.username);

        Ok(account)
    }

    /// Verify credentials and open a session. Unknown usernames and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<(AccountInfo, Session)> {
        let row: Option<(String, String, String, String)> = sqlx::query_as(
            "SELECT id, username, password_hash, created_at FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, username, password_hash, created_at)) = row else {
            warn!("[Auth] Login attempt for unknown account");
            return Err(Error::Auth);
        };

        if !bcrypt::verify(password, &password_hash)? {
            warn!("[Auth] Failed login attempt for {}", username);
            return Err(Error::Auth);
        }

        let session = self.create_session(&id).await?;

        let account = AccountInfo {
            id,
            username,
            created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
        };

        info!("[Auth] Logged in: {}", account.username);

        Ok((account, session))
    }

    /// Open a new session row. Existing sessions for the account stay
    /// valid; there is no single-session invariant.
    async fn create_session(&self, account_id: &str) -> Result<Session> {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + self.session_ttl,
        };

        sqlx::query(
            "INSERT INTO sessions (token, account_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.account_id)
        .bind(session.created_at.to_rfc3339())
        .bind(session.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    /// Look up the account behind a session token. Missing and expired
    /// tokens both come back as `Unauthorized`.
    pub async fn validate_session(&self, token: &str) -> Result<AccountInfo> {
        let row: Option<(String, String, String, String)> = sqlx::query_as(
            "SELECT a.id, a.username, a.created_at, s.expires_at
             FROM accounts a
             JOIN sessions s ON a.id = s.account_id
             WHERE s.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, username, created_at, expires_at)) = row else {
            return Err(Error::Unauthorized);
        };

        let expires: DateTime<Utc> = expires_at.parse().map_err(|_| Error::Unauthorized)?;
        if expires <= Utc::now() {
            return Err(Error::Unauthorized);
        }

        Ok(AccountInfo {
            id,
            username,
            created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
        })
    }

    /// Destroy a session. Destroying an absent session is not an error.
    pub async fn logout(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        info!("[Auth] Session invalidated");

        Ok(())
    }
}
