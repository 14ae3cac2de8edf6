// src/auth/sessions.rs
use crate::auth::token::{generate_token_default, hash_token};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

pub const SESSION_COOKIE: &str = "session";

/// A logged-in session, read from (or written to) the sessions table.
///
/// `init` is called at request entry with the cookie token; `teardown`
/// revokes the row on logout. There is no global "logged in" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    token_hash: [u8; 32],
    pub created_at: i64,
    pub expires_at: i64,
}

impl SessionContext {
    /// Creates a session row. Returns the context and the raw cookie token,
    /// which is never stored.
    pub fn start(conn: &Connection, now: i64, ttl_secs: i64) -> Result<(Self, String), ServerError> {
        let raw_token = generate_token_default();
        let token_hash = hash_token(&raw_token);
        let expires_at = now + ttl_secs;

        conn.execute(
            r#"
            insert into sessions (token_hash, created_at, expires_at)
            values (?, ?, ?)
            "#,
            params![token_hash.as_slice(), now, expires_at],
        )
        .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

        let ctx = Self {
            token_hash,
            created_at: now,
            expires_at,
        };
        Ok((ctx, raw_token))
    }

    /// Loads the live session for a cookie token, if any.
    pub fn init(conn: &Connection, raw_token: &str, now: i64) -> Result<Option<Self>, ServerError> {
        let raw_token = raw_token.trim();
        if raw_token.is_empty() {
            return Ok(None);
        }
        let token_hash = hash_token(raw_token);

        conn.query_row(
            r#"
            select created_at, expires_at
            from sessions
            where token_hash = ?
              and expires_at > ?
              and revoked_at is null
            "#,
            params![token_hash.as_slice(), now],
            |row| {
                Ok(Self {
                    token_hash,
                    created_at: row.get(0)?,
                    expires_at: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
    }

    pub fn teardown(self, conn: &Connection, now: i64) -> Result<(), ServerError> {
        conn.execute(
            "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
            params![now, self.token_hash.as_slice()],
        )
        .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
        Ok(())
    }
}

/// Drops expired and revoked rows. Returns how many were removed.
pub fn purge_stale_sessions(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "delete from sessions where expires_at <= ? or revoked_at is not null",
        params![now],
    )
    .map_err(|e| ServerError::DbError(format!("purge sessions failed: {e}")))
}
