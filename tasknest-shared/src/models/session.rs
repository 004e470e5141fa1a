/// Session model and database operations
///
/// Server-side login sessions backing the session cookie. The browser holds
/// an opaque token; only its SHA-256 hash is stored, so a leaked database
/// dump cannot be replayed as a cookie.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::session::Session;
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let user_id = Uuid::new_v4();
///
/// // Start a session; `token` goes into the cookie, only its hash is stored
/// let (session, token) = Session::create(&pool, user_id, 336).await?;
///
/// // Later, resolve the cookie back to a session
/// let authenticated = Session::authenticate(&pool, &token).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::auth::session_token::{generate_session_token, hash_session_token};

/// Session model representing one logged-in browser
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Unique session ID
    pub id: Uuid,

    /// User this session belongs to
    pub user_id: Uuid,

    /// SHA-256 hex of the opaque cookie token
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry time
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Creates a new session for a user
    ///
    /// Returns the session row and the plaintext token. The token is shown
    /// exactly once; it cannot be recovered from the stored hash.
    pub async fn create(
        db: impl PgExecutor<'_>,
        user_id: Uuid,
        ttl_hours: i64,
    ) -> Result<(Self, String), sqlx::Error> {
        let token = generate_session_token();
        let token_hash = hash_session_token(&token);
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(db)
        .await?;

        Ok((session, token))
    }

    /// Resolves a cookie token to a live session
    ///
    /// Returns `None` for unknown tokens and for sessions past their expiry.
    pub async fn authenticate(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let token_hash = hash_session_token(token);

        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token_hash, created_at, expires_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Revokes one session (logout)
    pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revokes every session of a user
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes expired sessions
    ///
    /// Expired rows are already rejected by `authenticate`; this keeps the
    /// table from growing without bound.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expired() {
        let mut session = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "x".repeat(64),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        assert!(!session.is_expired());

        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());
    }
}
