/// TaskList model and database operations
///
/// A task list is the unit of ownership and sharing: it belongs to exactly
/// one user and holds the tasks. Visibility for other users is granted per
/// list through `shared_lists`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_lists (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     color VARCHAR(7) NOT NULL DEFAULT '#007bff',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Which lists to include when listing for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    /// Owned and shared lists
    All,

    /// Only lists the user owns
    Own,

    /// Only lists shared with the user
    Shared,
}

impl ListScope {
    /// Parses the `filter` query parameter; anything unknown means `All`
    pub fn parse(s: &str) -> Self {
        match s {
            "own" => ListScope::Own,
            "shared" => ListScope::Shared,
            _ => ListScope::All,
        }
    }
}

/// Sort order for list listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListOrder {
    NameAsc,
    NameDesc,
    CreatedAsc,
    CreatedDesc,
}

impl ListOrder {
    /// Parses the `order` query parameter; anything unknown means newest first
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => ListOrder::NameAsc,
            "-name" => ListOrder::NameDesc,
            "created_at" => ListOrder::CreatedAsc,
            _ => ListOrder::CreatedDesc,
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            ListOrder::NameAsc => "l.name ASC",
            ListOrder::NameDesc => "l.name DESC",
            ListOrder::CreatedAsc => "l.created_at ASC",
            ListOrder::CreatedDesc => "l.created_at DESC",
        }
    }
}

/// Filters for listing the lists visible to a user
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Owned / shared / both
    pub scope: ListScope,

    /// Substring match over name and description
    pub search: Option<String>,

    /// Sort order
    pub order: ListOrder,

    /// Page size
    pub limit: i64,

    /// Page offset
    pub offset: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            scope: ListScope::All,
            search: None,
            order: ListOrder::CreatedDesc,
            limit: 12,
            offset: 0,
        }
    }
}

/// TaskList model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskList {
    /// Unique list ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Display name
    pub name: String,

    /// Free-form description (may be empty)
    pub description: String,

    /// Display color as `#rrggbb`
    pub color: String,

    /// When the list was created
    pub created_at: DateTime<Utc>,

    /// When the list was last updated
    pub updated_at: DateTime<Utc>,
}

/// A list row together with its task counters, as shown on list overviews
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskListSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Total tasks in the list
    pub total_tasks: i64,

    /// Tasks in `completed` status
    pub completed_tasks: i64,

    /// Tasks in `pending` status
    pub pending_tasks: i64,

    /// Tasks in `in_progress` status
    pub in_progress_tasks: i64,
}

/// Per-list task counters
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ListTaskCounts {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub in_progress_tasks: i64,
}

/// Input for creating a task list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskList {
    /// Owning user
    pub owner_id: Uuid,

    /// Display name (validated by the API layer)
    pub name: String,

    /// Description, empty when not provided
    pub description: String,

    /// Display color as `#rrggbb`
    pub color: String,
}

/// Input for updating a task list; only non-None fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskList {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

const LIST_COLUMNS: &str =
    "id, owner_id, name, description, color, created_at, updated_at";

fn scope_predicate(scope: ListScope) -> &'static str {
    match scope {
        ListScope::Own => "l.owner_id = $1",
        ListScope::Shared => {
            "EXISTS (SELECT 1 FROM shared_lists s WHERE s.list_id = l.id AND s.shared_with_id = $1)"
        }
        ListScope::All => {
            "(l.owner_id = $1 OR EXISTS \
             (SELECT 1 FROM shared_lists s WHERE s.list_id = l.id AND s.shared_with_id = $1))"
        }
    }
}

impl TaskList {
    /// Creates a new task list
    pub async fn create(db: impl PgExecutor<'_>, data: CreateTaskList) -> Result<Self, sqlx::Error> {
        let list = sqlx::query_as::<_, TaskList>(&format!(
            "INSERT INTO task_lists (owner_id, name, description, color)
             VALUES ($1, $2, $3, $4)
             RETURNING {LIST_COLUMNS}"
        ))
        .bind(data.owner_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.color)
        .fetch_one(db)
        .await?;

        Ok(list)
    }

    /// Finds a list by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let list = sqlx::query_as::<_, TaskList>(&format!(
            "SELECT {LIST_COLUMNS} FROM task_lists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(list)
    }

    /// Updates name/description/color; unset fields are left as-is
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTaskList,
    ) -> Result<Option<Self>, sqlx::Error> {
        let list = sqlx::query_as::<_, TaskList>(&format!(
            "UPDATE task_lists
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 color = COALESCE($4, color),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {LIST_COLUMNS}"
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.color)
        .fetch_optional(pool)
        .await?;

        Ok(list)
    }

    /// Deletes a list and, via CASCADE, its tasks, shares, and activity
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the lists visible to a user with their task counters
    ///
    /// Visibility is ownership or a share grant, narrowed by `query.scope`.
    /// `query.search` matches name and description case-insensitively.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        query: &ListQuery,
    ) -> Result<Vec<TaskListSummary>, sqlx::Error> {
        let sql = format!(
            "SELECT l.id, l.owner_id, l.name, l.description, l.color, l.created_at, l.updated_at,
                    (SELECT COUNT(*) FROM tasks t WHERE t.list_id = l.id) AS total_tasks,
                    (SELECT COUNT(*) FROM tasks t WHERE t.list_id = l.id AND t.status = 'completed') AS completed_tasks,
                    (SELECT COUNT(*) FROM tasks t WHERE t.list_id = l.id AND t.status = 'pending') AS pending_tasks,
                    (SELECT COUNT(*) FROM tasks t WHERE t.list_id = l.id AND t.status = 'in_progress') AS in_progress_tasks
             FROM task_lists l
             WHERE {} AND ($2::text IS NULL OR l.name ILIKE '%' || $2 || '%' OR l.description ILIKE '%' || $2 || '%')
             ORDER BY {}
             LIMIT $3 OFFSET $4",
            scope_predicate(query.scope),
            query.order.sql(),
        );

        let lists = sqlx::query_as::<_, TaskListSummary>(&sql)
            .bind(user_id)
            .bind(query.search.as_deref())
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(pool)
            .await?;

        Ok(lists)
    }

    /// Counts the lists a listing query would return across all pages
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: Uuid,
        query: &ListQuery,
    ) -> Result<i64, sqlx::Error> {
        let sql = format!(
            "SELECT COUNT(*) FROM task_lists l
             WHERE {} AND ($2::text IS NULL OR l.name ILIKE '%' || $2 || '%' OR l.description ILIKE '%' || $2 || '%')",
            scope_predicate(query.scope),
        );

        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(query.search.as_deref())
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Task counters for a single list
    pub async fn task_counts(pool: &PgPool, list_id: Uuid) -> Result<ListTaskCounts, sqlx::Error> {
        let counts = sqlx::query_as::<_, ListTaskCounts>(
            r#"
            SELECT COUNT(*) AS total_tasks,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed_tasks,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending_tasks,
                   COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress_tasks
            FROM tasks
            WHERE list_id = $1
            "#,
        )
        .bind(list_id)
        .fetch_one(pool)
        .await?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_scope_parse() {
        assert_eq!(ListScope::parse("own"), ListScope::Own);
        assert_eq!(ListScope::parse("shared"), ListScope::Shared);
        assert_eq!(ListScope::parse("all"), ListScope::All);
        assert_eq!(ListScope::parse("bogus"), ListScope::All);
    }

    #[test]
    fn test_list_order_parse() {
        assert_eq!(ListOrder::parse("name"), ListOrder::NameAsc);
        assert_eq!(ListOrder::parse("-name"), ListOrder::NameDesc);
        assert_eq!(ListOrder::parse("created_at"), ListOrder::CreatedAsc);
        assert_eq!(ListOrder::parse("-created_at"), ListOrder::CreatedDesc);
        assert_eq!(ListOrder::parse(""), ListOrder::CreatedDesc);
    }

    #[test]
    fn test_scope_predicate_binds_user_once() {
        // Every variant must reference only the $1 bind
        for scope in [ListScope::All, ListScope::Own, ListScope::Shared] {
            let sql = scope_predicate(scope);
            assert!(sql.contains("$1"));
            assert!(!sql.contains("$2"));
        }
    }

    #[test]
    fn test_default_query() {
        let query = ListQuery::default();
        assert_eq!(query.limit, 12);
        assert_eq!(query.offset, 0);
        assert_eq!(query.scope, ListScope::All);
        assert_eq!(query.order, ListOrder::CreatedDesc);
    }
}
