/// TaskActivity model and database operations
///
/// Append-only audit log of task mutations. A row is written for every
/// create, edit, status transition, and attachment change, in the same
/// transaction as the mutation it records.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE activity_action AS ENUM (
///     'created', 'updated', 'in_progress', 'completed',
///     'reopened', 'file_added', 'file_removed'
/// );
///
/// CREATE TABLE task_activities (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     action activity_action NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// What happened to the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// Task was created
    Created,

    /// Task fields were edited
    Updated,

    /// Task was moved to in_progress
    InProgress,

    /// Task was completed
    Completed,

    /// Completed task was reopened
    Reopened,

    /// An attachment was added
    FileAdded,

    /// An attachment was removed
    FileRemoved,
}

impl ActivityAction {
    /// Converts action to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::InProgress => "in_progress",
            ActivityAction::Completed => "completed",
            ActivityAction::Reopened => "reopened",
            ActivityAction::FileAdded => "file_added",
            ActivityAction::FileRemoved => "file_removed",
        }
    }
}

/// TaskActivity model representing one audit log row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskActivity {
    /// Unique activity ID
    pub id: Uuid,

    /// Task the activity belongs to
    pub task_id: Uuid,

    /// User who performed the action
    pub user_id: Uuid,

    /// What happened
    pub action: ActivityAction,

    /// Human-readable description
    pub description: String,

    /// When it happened
    pub created_at: DateTime<Utc>,
}

/// An activity joined with task and actor display fields, for feeds
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityFeedItem {
    pub id: Uuid,
    pub task_id: Uuid,
    pub action: ActivityAction,
    pub created_at: DateTime<Utc>,

    /// Title of the task
    pub task_title: String,

    /// List containing the task
    pub list_id: Uuid,

    /// Username of the actor
    pub username: String,

    /// First name of the actor
    pub first_name: String,

    /// Last name of the actor
    pub last_name: String,
}

impl TaskActivity {
    /// Appends an activity row
    ///
    /// Callers pass the transaction of the mutation being recorded so the
    /// log row and the mutation commit or roll back together.
    pub async fn log(
        db: impl PgExecutor<'_>,
        task_id: Uuid,
        user_id: Uuid,
        action: ActivityAction,
        description: &str,
    ) -> Result<Self, sqlx::Error> {
        let activity = sqlx::query_as::<_, TaskActivity>(
            r#"
            INSERT INTO task_activities (task_id, user_id, action, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, task_id, user_id, action, description, created_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(action)
        .bind(description)
        .fetch_one(db)
        .await?;

        Ok(activity)
    }

    /// Lists the activity of one task, newest first
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let activities = sqlx::query_as::<_, TaskActivity>(
            r#"
            SELECT id, task_id, user_id, action, description, created_at
            FROM task_activities
            WHERE task_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(task_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(activities)
    }

    /// Recent activity across every list visible to a user, newest first
    pub async fn recent_for_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityFeedItem>, sqlx::Error> {
        let activities = sqlx::query_as::<_, ActivityFeedItem>(
            r#"
            SELECT a.id, a.task_id, a.action, a.created_at,
                   t.title AS task_title, t.list_id,
                   u.username, u.first_name, u.last_name
            FROM task_activities a
            JOIN tasks t ON t.id = a.task_id
            JOIN users u ON u.id = a.user_id
            WHERE t.list_id IN (
                SELECT l.id FROM task_lists l
                WHERE l.owner_id = $1
                   OR EXISTS (SELECT 1 FROM shared_lists s
                              WHERE s.list_id = l.id AND s.shared_with_id = $1)
            )
            ORDER BY a.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_as_str() {
        assert_eq!(ActivityAction::Created.as_str(), "created");
        assert_eq!(ActivityAction::Updated.as_str(), "updated");
        assert_eq!(ActivityAction::InProgress.as_str(), "in_progress");
        assert_eq!(ActivityAction::Completed.as_str(), "completed");
        assert_eq!(ActivityAction::Reopened.as_str(), "reopened");
        assert_eq!(ActivityAction::FileAdded.as_str(), "file_added");
        assert_eq!(ActivityAction::FileRemoved.as_str(), "file_removed");
    }
}
