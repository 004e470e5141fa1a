/// Task endpoints
///
/// Task CRUD, the status state machine, and the per-task activity log.
/// Every mutation writes its activity row in the same transaction, so the
/// audit trail can never disagree with the task table.
///
/// # Endpoints
///
/// - `POST   /v1/lists/:id/tasks` - Create a task (write access)
/// - `POST   /v1/lists/:id/tasks/quick` - Quick add with title + priority
/// - `GET    /v1/tasks/:id` - Task detail with assignees and attachments
/// - `PUT    /v1/tasks/:id` - Update fields and assignees (write access)
/// - `DELETE /v1/tasks/:id` - Delete (write access)
/// - `POST   /v1/tasks/:id/toggle` - Advance the status cycle
/// - `POST   /v1/tasks/:id/status` - Set an explicit status
/// - `GET    /v1/tasks/:id/activity` - Activity log, newest first

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::attachments::AttachmentResponse,
};
use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{
        access::{require_view, require_write},
        middleware::AuthContext,
    },
    models::{
        activity::{ActivityAction, TaskActivity},
        attachment::TaskAttachment,
        task::{CreateTask, Task, TaskAssignee, TaskPriority, TaskStatus, UpdateTask},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Default and maximum rows returned by the activity log endpoint
const ACTIVITY_DEFAULT_LIMIT: i64 = 50;
const ACTIVITY_MAX_LIMIT: i64 = 200;

/// Task as returned by the API
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Whether the task is open and past its due date
    pub is_overdue: bool,

    /// Display color of the priority badge
    pub priority_color: &'static str,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let is_overdue = task.is_overdue();
        let priority_color = task.priority.color();
        Self {
            id: task.id,
            list_id: task.list_id,
            title: task.title,
            description: task.description,
            priority: task.priority,
            status: task.status,
            due_date: task.due_date,
            created_by: task.created_by,
            completed_at: task.completed_at,
            created_at: task.created_at,
            updated_at: task.updated_at,
            is_overdue,
            priority_color,
        }
    }
}

/// Task with its assignees, returned by create/update
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    #[serde(flatten)]
    pub task: TaskResponse,
    pub assigned_users: Vec<TaskAssignee>,
}

/// Full task detail with assignees and attachments
#[derive(Debug, Serialize)]
pub struct TaskFullResponse {
    #[serde(flatten)]
    pub task: TaskResponse,
    pub assigned_users: Vec<TaskAssignee>,
    pub attachments: Vec<AttachmentResponse>,
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (trimmed; 2-200 characters)
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,

    pub description: Option<String>,

    /// Defaults to medium
    pub priority: Option<TaskPriority>,

    /// Defaults to pending
    pub status: Option<TaskStatus>,

    /// Optional due date; must not be in the past
    pub due_date: Option<DateTime<Utc>>,

    /// Users to assign
    pub assigned_user_ids: Option<Vec<Uuid>>,
}

/// Quick add request: just a title and an optional priority
#[derive(Debug, Deserialize, Validate)]
pub struct QuickAddRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,

    pub priority: Option<TaskPriority>,
}

/// Update task request; only set fields change
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub priority: Option<TaskPriority>,

    pub status: Option<TaskStatus>,

    /// New due date; must not be in the past
    pub due_date: Option<DateTime<Utc>>,

    /// Set to true to remove the due date
    #[serde(default)]
    pub clear_due_date: bool,

    /// Replaces the assignee set when present
    pub assigned_user_ids: Option<Vec<Uuid>>,
}

/// Explicit status change request
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// `pending`, `in_progress`, or `completed`
    pub status: String,
}

/// Response of the toggle and change-status endpoints
#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    pub status: TaskStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub message: String,
}

/// Query parameters for the activity log
#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    pub limit: Option<i64>,
}

fn validated_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim().to_string();
    if title.chars().count() < 2 {
        return Err(ApiError::field_error(
            "title",
            "Title must be at least 2 characters",
        ));
    }
    Ok(title)
}

fn reject_past_due_date(due_date: &DateTime<Utc>) -> Result<(), ApiError> {
    if *due_date < Utc::now() {
        return Err(ApiError::field_error(
            "due_date",
            "Due date cannot be in the past",
        ));
    }
    Ok(())
}

/// Human-readable message for a status transition
fn status_message(action: ActivityAction) -> &'static str {
    match action {
        ActivityAction::InProgress => "Task marked as in progress",
        ActivityAction::Completed => "Task completed",
        ActivityAction::Reopened => "Task reopened",
        _ => "Task updated",
    }
}

async fn load_task(state: &AppState, task_id: Uuid) -> ApiResult<Task> {
    Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Fetches a single task with its assignees and attachments
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskFullResponse>> {
    let task = load_task(&state, task_id).await?;
    require_view(&state.db, task.list_id, auth.user_id).await?;

    let assigned_users = Task::assignees(&state.db, task_id).await?;
    let attachments = TaskAttachment::list_for_task(&state.db, task_id).await?;

    Ok(Json(TaskFullResponse {
        task: TaskResponse::from(task),
        assigned_users,
        attachments: attachments.into_iter().map(AttachmentResponse::from).collect(),
    }))
}

/// Creates a task in a list
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<TaskDetailResponse>> {
    require_write(&state.db, list_id, auth.user_id).await?;
    req.validate()?;

    let title = validated_title(&req.title)?;
    if let Some(ref due_date) = req.due_date {
        reject_past_due_date(due_date)?;
    }

    let mut tx = state.db.begin().await?;

    let task = Task::create(
        &mut *tx,
        CreateTask {
            list_id,
            title,
            description: req.description.unwrap_or_default(),
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            status: req.status.unwrap_or(TaskStatus::Pending),
            due_date: req.due_date,
            created_by: auth.user_id,
        },
    )
    .await?;

    if let Some(ref user_ids) = req.assigned_user_ids {
        Task::set_assignees(&mut *tx, task.id, user_ids).await?;
    }

    TaskActivity::log(
        &mut *tx,
        task.id,
        auth.user_id,
        ActivityAction::Created,
        &format!("Task created: {}", task.title),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(task_id = %task.id, list_id = %list_id, "Task created");

    let assigned_users = Task::assignees(&state.db, task.id).await?;

    Ok(Json(TaskDetailResponse {
        task: TaskResponse::from(task),
        assigned_users,
    }))
}

/// Quick-adds a task with only a title and priority
pub async fn quick_add_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<Uuid>,
    Json(req): Json<QuickAddRequest>,
) -> ApiResult<Json<TaskDetailResponse>> {
    require_write(&state.db, list_id, auth.user_id).await?;
    req.validate()?;

    let title = validated_title(&req.title)?;

    let mut tx = state.db.begin().await?;

    let task = Task::create(
        &mut *tx,
        CreateTask {
            list_id,
            title,
            description: String::new(),
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            status: TaskStatus::Pending,
            due_date: None,
            created_by: auth.user_id,
        },
    )
    .await?;

    TaskActivity::log(
        &mut *tx,
        task.id,
        auth.user_id,
        ActivityAction::Created,
        &format!("Task created: {}", task.title),
    )
    .await?;

    tx.commit().await?;

    Ok(Json(TaskDetailResponse {
        task: TaskResponse::from(task),
        assigned_users: vec![],
    }))
}

/// Updates a task's fields and, when given, its assignee set
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let task = load_task(&state, task_id).await?;
    require_write(&state.db, task.list_id, auth.user_id).await?;
    req.validate()?;

    let title = match req.title {
        Some(ref title) => Some(validated_title(title)?),
        None => None,
    };

    let due_date = if req.clear_due_date {
        Some(None)
    } else {
        match req.due_date {
            Some(due_date) => {
                reject_past_due_date(&due_date)?;
                Some(Some(due_date))
            }
            None => None,
        }
    };

    let mut tx = state.db.begin().await?;

    let task = Task::update(
        &mut *tx,
        task_id,
        UpdateTask {
            title,
            description: req.description,
            priority: req.priority,
            status: req.status,
            due_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if let Some(ref user_ids) = req.assigned_user_ids {
        Task::set_assignees(&mut *tx, task_id, user_ids).await?;
    }

    TaskActivity::log(
        &mut *tx,
        task.id,
        auth.user_id,
        ActivityAction::Updated,
        &format!("Task updated: {}", task.title),
    )
    .await?;

    tx.commit().await?;

    let assigned_users = Task::assignees(&state.db, task_id).await?;

    Ok(Json(TaskDetailResponse {
        task: TaskResponse::from(task),
        assigned_users,
    }))
}

/// Deletes a task, its attachments, and its activity
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = load_task(&state, task_id).await?;
    require_write(&state.db, task.list_id, auth.user_id).await?;

    // Collect stored files before the rows disappear via CASCADE
    let attachments = TaskAttachment::list_for_task(&state.db, task_id).await?;

    let deleted = Task::delete(&state.db, task_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    for attachment in attachments {
        if let Err(e) = state.files.remove(&attachment.stored_path).await {
            tracing::warn!(
                path = %attachment.stored_path,
                "Failed to remove attachment file: {}", e
            );
        }
    }

    tracing::info!(task_id = %task_id, user_id = %auth.user_id, "Task deleted");

    Ok(Json(serde_json::json!({ "message": "Task deleted" })))
}

/// Advances the task through the status cycle
///
/// pending → in_progress → completed → pending, appending the matching
/// activity row in the same transaction.
pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<StatusChangeResponse>> {
    let task = load_task(&state, task_id).await?;
    require_write(&state.db, task.list_id, auth.user_id).await?;

    let (new_status, action) = task.status.toggled();

    let mut tx = state.db.begin().await?;

    let task = Task::set_status(&mut *tx, task_id, new_status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    TaskActivity::log(
        &mut *tx,
        task.id,
        auth.user_id,
        action,
        &format!("Task {}: {}", action.as_str(), task.title),
    )
    .await?;

    tx.commit().await?;

    Ok(Json(StatusChangeResponse {
        status: task.status,
        completed_at: task.completed_at,
        message: status_message(action).to_string(),
    }))
}

/// Sets a task to an explicit status
///
/// A request for the status the task already has records nothing and
/// reports the state unchanged.
pub async fn change_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> ApiResult<Json<StatusChangeResponse>> {
    let task = load_task(&state, task_id).await?;
    require_write(&state.db, task.list_id, auth.user_id).await?;

    let new_status = TaskStatus::parse(&req.status)
        .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?;

    if task.status == new_status {
        return Ok(Json(StatusChangeResponse {
            status: task.status,
            completed_at: task.completed_at,
            message: "Status unchanged".to_string(),
        }));
    }

    let old_status = task.status;
    let action = new_status.transition_action();

    let mut tx = state.db.begin().await?;

    let task = Task::set_status(&mut *tx, task_id, new_status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    TaskActivity::log(
        &mut *tx,
        task.id,
        auth.user_id,
        action,
        &format!(
            "Status changed from {} to {}: {}",
            old_status.as_str(),
            new_status.as_str(),
            task.title
        ),
    )
    .await?;

    tx.commit().await?;

    Ok(Json(StatusChangeResponse {
        status: task.status,
        completed_at: task.completed_at,
        message: status_message(action).to_string(),
    }))
}

/// Returns a task's activity log, newest first
pub async fn task_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<Json<Vec<TaskActivity>>> {
    let task = load_task(&state, task_id).await?;
    require_view(&state.db, task.list_id, auth.user_id).await?;

    let limit = params
        .limit
        .unwrap_or(ACTIVITY_DEFAULT_LIMIT)
        .clamp(1, ACTIVITY_MAX_LIMIT);

    let activities = TaskActivity::list_for_task(&state.db, task_id, limit).await?;

    Ok(Json(activities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_title_trims() {
        assert_eq!(validated_title("  Buy milk  ").unwrap(), "Buy milk");
    }

    #[test]
    fn test_validated_title_rejects_short() {
        assert!(validated_title("a").is_err());
        assert!(validated_title("  x ").is_err());
    }

    #[test]
    fn test_reject_past_due_date() {
        let past = Utc::now() - chrono::Duration::hours(1);
        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(reject_past_due_date(&past).is_err());
        assert!(reject_past_due_date(&future).is_ok());
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            status_message(ActivityAction::InProgress),
            "Task marked as in progress"
        );
        assert_eq!(status_message(ActivityAction::Completed), "Task completed");
        assert_eq!(status_message(ActivityAction::Reopened), "Task reopened");
    }
}
