/// SharedList model and database operations
///
/// A share grant gives one user read or write access to another user's
/// task list. Grants are unique per (list, user) pair; only list owners
/// create and revoke them.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE share_permission AS ENUM ('read', 'write');
///
/// CREATE TABLE shared_lists (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     list_id UUID NOT NULL REFERENCES task_lists(id) ON DELETE CASCADE,
///     shared_with_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     permission share_permission NOT NULL DEFAULT 'read',
///     shared_by_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     shared_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (list_id, shared_with_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Permission level of a share grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    /// View the list, its tasks, attachments, and activity
    Read,

    /// Read plus create/edit/delete tasks and attachments
    Write,
}

impl SharePermission {
    /// Converts permission to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            SharePermission::Read => "read",
            SharePermission::Write => "write",
        }
    }

    /// Whether this grant allows mutating tasks
    pub fn can_write(&self) -> bool {
        matches!(self, SharePermission::Write)
    }
}

/// SharedList model representing one grant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SharedList {
    /// Unique grant ID
    pub id: Uuid,

    /// List being shared
    pub list_id: Uuid,

    /// User receiving access
    pub shared_with_id: Uuid,

    /// Read or write
    pub permission: SharePermission,

    /// User who created the grant (the list owner)
    pub shared_by_id: Uuid,

    /// When the grant was created
    pub shared_at: DateTime<Utc>,
}

/// A grant joined with the receiving user, for share listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SharedListEntry {
    pub id: Uuid,
    pub list_id: Uuid,
    pub shared_with_id: Uuid,
    pub permission: SharePermission,
    pub shared_at: DateTime<Utc>,

    /// Username of the receiving user
    pub username: String,

    /// First name of the receiving user
    pub first_name: String,

    /// Last name of the receiving user
    pub last_name: String,
}

/// Input for creating a share grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSharedList {
    pub list_id: Uuid,
    pub shared_with_id: Uuid,
    pub permission: SharePermission,
    pub shared_by_id: Uuid,
}

impl SharedList {
    /// Creates a share grant
    ///
    /// # Errors
    ///
    /// Returns a unique-constraint error if the list is already shared with
    /// that user.
    pub async fn create(pool: &PgPool, data: CreateSharedList) -> Result<Self, sqlx::Error> {
        let share = sqlx::query_as::<_, SharedList>(
            r#"
            INSERT INTO shared_lists (list_id, shared_with_id, permission, shared_by_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, list_id, shared_with_id, permission, shared_by_id, shared_at
            "#,
        )
        .bind(data.list_id)
        .bind(data.shared_with_id)
        .bind(data.permission)
        .bind(data.shared_by_id)
        .fetch_one(pool)
        .await?;

        Ok(share)
    }

    /// Finds a specific grant
    pub async fn find(
        pool: &PgPool,
        list_id: Uuid,
        shared_with_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let share = sqlx::query_as::<_, SharedList>(
            r#"
            SELECT id, list_id, shared_with_id, permission, shared_by_id, shared_at
            FROM shared_lists
            WHERE list_id = $1 AND shared_with_id = $2
            "#,
        )
        .bind(list_id)
        .bind(shared_with_id)
        .fetch_optional(pool)
        .await?;

        Ok(share)
    }

    /// Revokes a grant (unshare)
    pub async fn delete(
        pool: &PgPool,
        list_id: Uuid,
        shared_with_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM shared_lists WHERE list_id = $1 AND shared_with_id = $2",
        )
        .bind(list_id)
        .bind(shared_with_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the grants on a list, joined with the receiving users
    pub async fn list_for_list(
        pool: &PgPool,
        list_id: Uuid,
    ) -> Result<Vec<SharedListEntry>, sqlx::Error> {
        let shares = sqlx::query_as::<_, SharedListEntry>(
            r#"
            SELECT s.id, s.list_id, s.shared_with_id, s.permission, s.shared_at,
                   u.username, u.first_name, u.last_name
            FROM shared_lists s
            JOIN users u ON u.id = s.shared_with_id
            WHERE s.list_id = $1
            ORDER BY s.shared_at DESC
            "#,
        )
        .bind(list_id)
        .fetch_all(pool)
        .await?;

        Ok(shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_as_str() {
        assert_eq!(SharePermission::Read.as_str(), "read");
        assert_eq!(SharePermission::Write.as_str(), "write");
    }

    #[test]
    fn test_permission_can_write() {
        assert!(!SharePermission::Read.can_write());
        assert!(SharePermission::Write.can_write());
    }
}
