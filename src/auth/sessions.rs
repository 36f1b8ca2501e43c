// src/auth/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{generate_token, hash_token};
use crate::errors::ServerError;

const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

/// Create a session for the user and return the raw cookie token.
pub fn create_session(conn: &Connection, user_id: i64, now: i64) -> Result<String, ServerError> {
    let raw_token = generate_token();
    let hash = hash_token(&raw_token);

    conn.execute(
        "insert into sessions (user_id, token_hash, created_at, expires_at) values (?, ?, ?, ?)",
        params![user_id, hash.as_slice(), now, now + SESSION_TTL_SECS],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// Resolve a session cookie to (user_id, email), ignoring expired and
/// revoked sessions.
pub fn load_user_from_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<(i64, String)>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        "select u.id, u.email
         from sessions s
         join users u on u.id = s.user_id
         where s.token_hash = ?
           and s.expires_at > ?
           and s.revoked_at is null",
        params![hash.as_slice(), now],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

/// Revoke a session on logout. Unknown tokens are a no-op.
pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}
