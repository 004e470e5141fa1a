/// Task model and database operations
///
/// Tasks live inside a task list and carry priority, a status machine,
/// optional due dates, and optional assignees.
///
/// # State Machine
///
/// ```text
/// pending --toggle--> in_progress --toggle--> completed --toggle--> pending
/// ```
///
/// `completed_at` is set when a task enters `completed` and cleared when it
/// leaves it. Every transition is recorded as a task activity by the caller,
/// in the same transaction as the status change.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('high', 'medium', 'low');
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     list_id UUID NOT NULL REFERENCES task_lists(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'pending',
///     due_date TIMESTAMPTZ,
///     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE task_assignees (
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     PRIMARY KEY (task_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use super::activity::ActivityAction;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }

    /// Sort rank; lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::High => 1,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 3,
        }
    }

    /// Display color associated with the priority
    pub fn color(&self) -> &'static str {
        match self {
            TaskPriority::High => "#dc3545",
            TaskPriority::Medium => "#ffc107",
            TaskPriority::Low => "#28a745",
        }
    }
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Done; `completed_at` records when
    Completed,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses status from its wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Whether the task counts as open (not completed)
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }

    /// Next status in the toggle cycle, with the activity it records
    ///
    /// pending → in_progress → completed → pending
    pub fn toggled(&self) -> (TaskStatus, ActivityAction) {
        match self {
            TaskStatus::Pending => (TaskStatus::InProgress, ActivityAction::InProgress),
            TaskStatus::InProgress => (TaskStatus::Completed, ActivityAction::Completed),
            TaskStatus::Completed => (TaskStatus::Pending, ActivityAction::Reopened),
        }
    }

    /// Activity recorded when a task is set directly to this status
    pub fn transition_action(&self) -> ActivityAction {
        match self {
            TaskStatus::Pending => ActivityAction::Reopened,
            TaskStatus::InProgress => ActivityAction::InProgress,
            TaskStatus::Completed => ActivityAction::Completed,
        }
    }
}

/// Status filter for task listings; `Overdue` is virtual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Pending,
    InProgress,
    Completed,
    /// Open tasks whose due date has passed
    Overdue,
}

impl StatusFilter {
    /// Parses the `status` query parameter
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(StatusFilter::Pending),
            "in_progress" => Some(StatusFilter::InProgress),
            "completed" => Some(StatusFilter::Completed),
            "overdue" => Some(StatusFilter::Overdue),
            _ => None,
        }
    }

    fn predicate(&self) -> &'static str {
        match self {
            StatusFilter::Pending => "t.status = 'pending'",
            StatusFilter::InProgress => "t.status = 'in_progress'",
            StatusFilter::Completed => "t.status = 'completed'",
            StatusFilter::Overdue => {
                "(t.status IN ('pending', 'in_progress') AND t.due_date < NOW())"
            }
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// List this task belongs to
    pub list_id: Uuid,

    /// Title (2-200 chars, trimmed by the API layer)
    pub title: String,

    /// Free-form description (may be empty)
    pub description: String,

    /// Priority, defaults to medium
    pub priority: TaskPriority,

    /// Current status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// User who created the task
    pub created_by: Uuid,

    /// When the task entered `completed` (None while open)
    pub completed_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// A task joined with its list name, for dashboard panels
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithList {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,

    /// Name of the containing list
    pub list_name: String,
}

/// An assignee joined with display fields
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskAssignee {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Aggregate task counts across every list visible to a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DashboardCounts {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub in_progress_tasks: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub list_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}

/// Input for updating a task; only set fields change
///
/// `due_date` uses a double Option: `Some(None)` clears the date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Filters for listing tasks inside a list
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Substring match over title and description
    pub search: Option<String>,

    pub priority: Option<TaskPriority>,

    pub status: Option<StatusFilter>,

    /// Only tasks assigned to this user
    pub assigned_to: Option<Uuid>,

    pub due_from: Option<DateTime<Utc>>,

    pub due_to: Option<DateTime<Utc>>,
}

const TASK_COLUMNS: &str = "id, list_id, title, description, priority, status, due_date, \
                            created_by, completed_at, created_at, updated_at";

/// Predicate selecting tasks in lists a user can see (owned or shared)
const VISIBLE_TASKS: &str = "t.list_id IN (
    SELECT l.id FROM task_lists l
    WHERE l.owner_id = $1
       OR EXISTS (SELECT 1 FROM shared_lists s WHERE s.list_id = l.id AND s.shared_with_id = $1)
)";

/// Default ordering: priority rank, then due date with NULLs last, then newest
const TASK_ORDERING: &str = "CASE t.priority WHEN 'high' THEN 1 WHEN 'medium' THEN 2 ELSE 3 END, \
                             t.due_date ASC NULLS LAST, t.created_at DESC";

impl Task {
    /// Whether the task is past its due date and still open
    pub fn is_overdue(&self) -> bool {
        match self.due_date {
            Some(due) => self.status.is_open() && due < Utc::now(),
            None => false,
        }
    }

    /// Creates a new task
    ///
    /// `completed_at` is populated when the task is created directly in
    /// `completed` status (the full create form allows picking the status).
    pub async fn create(db: impl PgExecutor<'_>, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (list_id, title, description, priority, status, due_date, created_by, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     CASE WHEN $5 = 'completed'::task_status THEN NOW() ELSE NULL END)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(data.list_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.due_date)
        .bind(data.created_by)
        .fetch_one(db)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates task fields
    ///
    /// Only set fields are written. When the status changes, `completed_at`
    /// is kept in sync: set on entering `completed`, cleared on leaving it.
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                ", status = ${n}, completed_at = CASE \
                   WHEN ${n} = 'completed'::task_status AND status != 'completed' THEN NOW() \
                   WHEN ${n} != 'completed'::task_status THEN NULL \
                   ELSE completed_at END",
                n = bind_count
            ));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(db).await?;

        Ok(task)
    }

    /// Sets the task status, maintaining `completed_at`
    pub async fn set_status(
        db: impl PgExecutor<'_>,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET status = $2,
                 completed_at = CASE
                     WHEN $2 = 'completed'::task_status AND status != 'completed' THEN NOW()
                     WHEN $2 != 'completed'::task_status THEN NULL
                     ELSE completed_at END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?;

        Ok(task)
    }

    /// Deletes a task; attachments and activity go with it via CASCADE
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks in a list with filters and pagination
    ///
    /// Ordering is priority rank first, then due date ascending with undated
    /// tasks last, then newest first.
    pub async fn list_in_list(
        pool: &PgPool,
        list_id: Uuid,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let status_predicate = filter
            .status
            .map(|s| s.predicate())
            .unwrap_or("TRUE");

        let sql = format!(
            "SELECT t.id, t.list_id, t.title, t.description, t.priority, t.status, t.due_date,
                    t.created_by, t.completed_at, t.created_at, t.updated_at
             FROM tasks t
             WHERE t.list_id = $1
               AND ($2::text IS NULL OR t.title ILIKE '%' || $2 || '%' OR t.description ILIKE '%' || $2 || '%')
               AND ($3::task_priority IS NULL OR t.priority = $3)
               AND {status_predicate}
               AND ($4::uuid IS NULL OR EXISTS
                    (SELECT 1 FROM task_assignees a WHERE a.task_id = t.id AND a.user_id = $4))
               AND ($5::timestamptz IS NULL OR t.due_date >= $5)
               AND ($6::timestamptz IS NULL OR t.due_date <= $6)
             ORDER BY {TASK_ORDERING}
             LIMIT $7 OFFSET $8"
        );

        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(list_id)
            .bind(filter.search.as_deref())
            .bind(filter.priority)
            .bind(filter.assigned_to)
            .bind(filter.due_from)
            .bind(filter.due_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Counts the tasks a filtered listing would return across all pages
    pub async fn count_in_list(
        pool: &PgPool,
        list_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<i64, sqlx::Error> {
        let status_predicate = filter
            .status
            .map(|s| s.predicate())
            .unwrap_or("TRUE");

        let sql = format!(
            "SELECT COUNT(*)
             FROM tasks t
             WHERE t.list_id = $1
               AND ($2::text IS NULL OR t.title ILIKE '%' || $2 || '%' OR t.description ILIKE '%' || $2 || '%')
               AND ($3::task_priority IS NULL OR t.priority = $3)
               AND {status_predicate}
               AND ($4::uuid IS NULL OR EXISTS
                    (SELECT 1 FROM task_assignees a WHERE a.task_id = t.id AND a.user_id = $4))
               AND ($5::timestamptz IS NULL OR t.due_date >= $5)
               AND ($6::timestamptz IS NULL OR t.due_date <= $6)"
        );

        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(list_id)
            .bind(filter.search.as_deref())
            .bind(filter.priority)
            .bind(filter.assigned_to)
            .bind(filter.due_from)
            .bind(filter.due_to)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Replaces the assignee set of a task
    pub async fn set_assignees(
        conn: &mut PgConnection,
        task_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM task_assignees WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *conn)
            .await?;

        if !user_ids.is_empty() {
            sqlx::query(
                "INSERT INTO task_assignees (task_id, user_id)
                 SELECT $1, unnest($2::uuid[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(task_id)
            .bind(user_ids)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Lists the assignees of a task with display fields
    pub async fn assignees(pool: &PgPool, task_id: Uuid) -> Result<Vec<TaskAssignee>, sqlx::Error> {
        let assignees = sqlx::query_as::<_, TaskAssignee>(
            r#"
            SELECT a.user_id, u.username, u.first_name, u.last_name
            FROM task_assignees a
            JOIN users u ON u.id = a.user_id
            WHERE a.task_id = $1
            ORDER BY u.username ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(assignees)
    }

    /// Aggregate status counts across every list visible to a user
    pub async fn status_counts_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<DashboardCounts, sqlx::Error> {
        let sql = format!(
            "SELECT COUNT(*) AS total_tasks,
                    COUNT(*) FILTER (WHERE t.status = 'completed') AS completed_tasks,
                    COUNT(*) FILTER (WHERE t.status = 'pending') AS pending_tasks,
                    COUNT(*) FILTER (WHERE t.status = 'in_progress') AS in_progress_tasks
             FROM tasks t
             WHERE {VISIBLE_TASKS}"
        );

        let counts = sqlx::query_as::<_, DashboardCounts>(&sql)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(counts)
    }

    /// Open tasks due within the next `days`, soonest first
    pub async fn upcoming_for_user(
        pool: &PgPool,
        user_id: Uuid,
        days: i64,
        limit: i64,
    ) -> Result<Vec<TaskWithList>, sqlx::Error> {
        let sql = format!(
            "SELECT t.id, t.list_id, t.title, t.priority, t.status, t.due_date, l.name AS list_name
             FROM tasks t
             JOIN task_lists l ON l.id = t.list_id
             WHERE {VISIBLE_TASKS}
               AND t.status IN ('pending', 'in_progress')
               AND t.due_date IS NOT NULL
               AND t.due_date >= NOW()
               AND t.due_date <= NOW() + make_interval(days => $2::int)
             ORDER BY t.due_date ASC
             LIMIT $3"
        );

        let tasks = sqlx::query_as::<_, TaskWithList>(&sql)
            .bind(user_id)
            .bind(days as i32)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Open tasks whose due date has passed, most overdue first
    pub async fn overdue_for_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TaskWithList>, sqlx::Error> {
        let sql = format!(
            "SELECT t.id, t.list_id, t.title, t.priority, t.status, t.due_date, l.name AS list_name
             FROM tasks t
             JOIN task_lists l ON l.id = t.list_id
             WHERE {VISIBLE_TASKS}
               AND t.status IN ('pending', 'in_progress')
               AND t.due_date IS NOT NULL
               AND t.due_date < NOW()
             ORDER BY t.due_date ASC
             LIMIT $2"
        );

        let tasks = sqlx::query_as::<_, TaskWithList>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Counts open tasks in a list whose due date has passed
    pub async fn count_overdue_in_list(pool: &PgPool, list_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks
             WHERE list_id = $1
               AND status IN ('pending', 'in_progress')
               AND due_date < NOW()",
        )
        .bind(list_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Counts open high-priority tasks in a list
    pub async fn count_high_priority_open_in_list(
        pool: &PgPool,
        list_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks
             WHERE list_id = $1
               AND priority = 'high'
               AND status IN ('pending', 'in_progress')",
        )
        .bind(list_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_task(status: TaskStatus, due_date: Option<DateTime<Utc>>) -> Task {
        Task {
            id: Uuid::new_v4(),
            list_id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status,
            due_date,
            created_by: Uuid::new_v4(),
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_toggle_cycle() {
        let (next, action) = TaskStatus::Pending.toggled();
        assert_eq!(next, TaskStatus::InProgress);
        assert_eq!(action, ActivityAction::InProgress);

        let (next, action) = TaskStatus::InProgress.toggled();
        assert_eq!(next, TaskStatus::Completed);
        assert_eq!(action, ActivityAction::Completed);

        let (next, action) = TaskStatus::Completed.toggled();
        assert_eq!(next, TaskStatus::Pending);
        assert_eq!(action, ActivityAction::Reopened);
    }

    #[test]
    fn test_toggle_cycle_returns_to_start() {
        let start = TaskStatus::Pending;
        let (a, _) = start.toggled();
        let (b, _) = a.toggled();
        let (c, _) = b.toggled();
        assert_eq!(c, start);
    }

    #[test]
    fn test_transition_action() {
        assert_eq!(TaskStatus::Pending.transition_action(), ActivityAction::Reopened);
        assert_eq!(TaskStatus::InProgress.transition_action(), ActivityAction::InProgress);
        assert_eq!(TaskStatus::Completed.transition_action(), ActivityAction::Completed);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("archived"), None);
    }

    #[test]
    fn test_priority_rank_ordering() {
        assert!(TaskPriority::High.rank() < TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() < TaskPriority::Low.rank());
    }

    #[test]
    fn test_is_overdue() {
        let past = Utc::now() - Duration::hours(1);
        let future = Utc::now() + Duration::hours(1);

        assert!(sample_task(TaskStatus::Pending, Some(past)).is_overdue());
        assert!(sample_task(TaskStatus::InProgress, Some(past)).is_overdue());
        assert!(!sample_task(TaskStatus::Completed, Some(past)).is_overdue());
        assert!(!sample_task(TaskStatus::Pending, Some(future)).is_overdue());
        assert!(!sample_task(TaskStatus::Pending, None).is_overdue());
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse("overdue"), Some(StatusFilter::Overdue));
        assert_eq!(StatusFilter::parse("pending"), Some(StatusFilter::Pending));
        assert_eq!(StatusFilter::parse("done"), None);
    }

    #[test]
    fn test_overdue_predicate_targets_open_tasks() {
        let sql = StatusFilter::Overdue.predicate();
        assert!(sql.contains("'pending'"));
        assert!(sql.contains("'in_progress'"));
        assert!(sql.contains("due_date < NOW()"));
    }
}
