/// Profile model and database operations
///
/// One row per user, created automatically alongside the user account.
/// Holds the optional presentation fields that do not belong on the
/// authentication record itself.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE profiles (
///     user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     bio VARCHAR(500) NOT NULL DEFAULT '',
///     phone VARCHAR(20) NOT NULL DEFAULT '',
///     avatar_path VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Profile model extending a user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// Owning user ID (also the primary key)
    pub user_id: Uuid,

    /// Short biography (max 500 chars)
    pub bio: String,

    /// Phone number (max 20 chars)
    pub phone: String,

    /// Relative path of the stored avatar under the upload root, if any
    pub avatar_path: Option<String>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for updating a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New biography
    pub bio: Option<String>,

    /// New phone number
    pub phone: Option<String>,
}

impl Profile {
    /// Fetches the profile for a user, creating an empty one if missing
    ///
    /// Every user gets a profile when the account is created; the upsert
    /// keeps this idempotent for accounts that predate the profiles table.
    pub async fn get_or_create(db: impl PgExecutor<'_>, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, bio, phone, avatar_path, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(profile)
    }

    /// Finds the profile for a user
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, bio, phone, avatar_path, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Updates bio and/or phone
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET bio = COALESCE($2, bio),
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, bio, phone, avatar_path, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.bio)
        .bind(data.phone)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Records the stored avatar path after an upload
    pub async fn set_avatar(
        pool: &PgPool,
        user_id: Uuid,
        avatar_path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET avatar_path = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, bio, phone, avatar_path, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(avatar_path)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }
}
