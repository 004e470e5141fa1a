/// Task list endpoints
///
/// List CRUD, sharing, and per-list statistics. Everything here is gated by
/// the owner / writer / reader permission model in `auth::access`.
///
/// # Endpoints
///
/// - `GET    /v1/lists` - Visible lists with filters and paging
/// - `POST   /v1/lists` - Create a list
/// - `GET    /v1/lists/:id` - List detail with a filtered task page
/// - `PUT    /v1/lists/:id` - Update (owner only)
/// - `DELETE /v1/lists/:id` - Delete (owner only)
/// - `GET    /v1/lists/:id/stats` - Task counters for the list
/// - `POST   /v1/lists/:id/share` - Grant access to another user (owner only)
/// - `DELETE /v1/lists/:id/share/:user_id` - Revoke a grant (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::tasks::TaskResponse,
};
use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{
        access::{require_owner, require_view},
        middleware::AuthContext,
    },
    models::{
        shared_list::{CreateSharedList, SharedList, SharedListEntry, SharePermission},
        task::{StatusFilter, Task, TaskFilter, TaskPriority},
        task_list::{
            CreateTaskList, ListOrder, ListQuery, ListScope, TaskList, TaskListSummary,
            UpdateTaskList,
        },
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Default page size for list overviews
const LIST_PAGE_SIZE: i64 = 12;

/// Default page size for tasks inside a list detail
const TASK_PAGE_SIZE: i64 = 20;

/// Hard cap on client-requested page sizes
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for the list overview
#[derive(Debug, Deserialize)]
pub struct ListListsParams {
    /// Substring match over name and description
    pub search: Option<String>,

    /// `all` (default), `own`, or `shared`
    pub filter: Option<String>,

    /// `name`, `-name`, `created_at`, or `-created_at` (default)
    pub order: Option<String>,

    /// 1-based page number
    pub page: Option<i64>,

    pub page_size: Option<i64>,
}

/// Query parameters for tasks inside a list detail
#[derive(Debug, Deserialize)]
pub struct ListDetailParams {
    /// Substring match over title and description
    pub search: Option<String>,

    pub priority: Option<TaskPriority>,

    /// `pending`, `in_progress`, `completed`, or the virtual `overdue`
    pub status: Option<StatusFilter>,

    /// Only tasks assigned to this user
    pub assigned_to: Option<Uuid>,

    pub due_from: Option<DateTime<Utc>>,

    pub due_to: Option<DateTime<Utc>>,

    pub page: Option<i64>,

    pub page_size: Option<i64>,
}

/// Create/update list request
#[derive(Debug, Deserialize, Validate)]
pub struct ListRequest {
    /// Display name
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    /// Description, empty when not provided
    pub description: Option<String>,

    /// Display color as `#rrggbb`
    pub color: Option<String>,
}

/// Partial update request; only set fields change
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateListRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub color: Option<String>,
}

/// Share request
#[derive(Debug, Deserialize, Validate)]
pub struct ShareRequest {
    /// Username of the user to share with
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Read or write; defaults to read
    #[serde(default = "default_permission")]
    pub permission: SharePermission,
}

fn default_permission() -> SharePermission {
    SharePermission::Read
}

/// Paged list overview response
#[derive(Debug, Serialize)]
pub struct ListListsResponse {
    pub lists: Vec<TaskListSummary>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// List detail response with one page of tasks
#[derive(Debug, Serialize)]
pub struct ListDetailResponse {
    pub list: TaskList,
    pub tasks: Vec<TaskResponse>,
    pub total_tasks: i64,
    pub page: i64,
    pub page_size: i64,

    /// Whether the current user may mutate tasks in this list
    pub can_edit: bool,

    /// Current share grants (visible to everyone who can view the list)
    pub shared_with: Vec<SharedListEntry>,
}

/// Per-list statistics, as shown on the list card
#[derive(Debug, Serialize)]
pub struct ListStatsResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub overdue_tasks: i64,
    pub high_priority_tasks: i64,
}

fn validate_color(color: &str) -> Result<(), ApiError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ApiError::field_error(
            "color",
            "Color must be in #rrggbb format",
        ))
    }
}

fn page_bounds(page: Option<i64>, page_size: Option<i64>, default_size: i64) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(default_size).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * page_size;
    (page, page_size, offset)
}

/// Lists the lists visible to the current user
pub async fn list_lists(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ListListsParams>,
) -> ApiResult<Json<ListListsResponse>> {
    let (page, page_size, offset) = page_bounds(params.page, params.page_size, LIST_PAGE_SIZE);

    let query = ListQuery {
        scope: ListScope::parse(params.filter.as_deref().unwrap_or("all")),
        search: params.search.filter(|s| !s.trim().is_empty()),
        order: ListOrder::parse(params.order.as_deref().unwrap_or("-created_at")),
        limit: page_size,
        offset,
    };

    let lists = TaskList::list_for_user(&state.db, auth.user_id, &query).await?;
    let total = TaskList::count_for_user(&state.db, auth.user_id, &query).await?;

    Ok(Json(ListListsResponse {
        lists,
        total,
        page,
        page_size,
    }))
}

/// Creates a new list owned by the current user
pub async fn create_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ListRequest>,
) -> ApiResult<Json<TaskList>> {
    req.validate()?;

    let name = req.name.trim().to_string();
    if name.chars().count() < 2 {
        return Err(ApiError::field_error("name", "Name must be 2-100 characters"));
    }

    let color = req.color.unwrap_or_else(|| "#007bff".to_string());
    validate_color(&color)?;

    let list = TaskList::create(
        &state.db,
        CreateTaskList {
            owner_id: auth.user_id,
            name,
            description: req.description.unwrap_or_default(),
            color,
        },
    )
    .await?;

    tracing::info!(list_id = %list.id, owner_id = %auth.user_id, "List created");

    Ok(Json(list))
}

/// Fetches a list with a filtered, paginated page of its tasks
pub async fn get_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<Uuid>,
    Query(params): Query<ListDetailParams>,
) -> ApiResult<Json<ListDetailResponse>> {
    let role = require_view(&state.db, list_id, auth.user_id).await?;

    let list = TaskList::find_by_id(&state.db, list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    let (page, page_size, offset) = page_bounds(params.page, params.page_size, TASK_PAGE_SIZE);

    let filter = TaskFilter {
        search: params.search.filter(|s| !s.trim().is_empty()),
        priority: params.priority,
        status: params.status,
        assigned_to: params.assigned_to,
        due_from: params.due_from,
        due_to: params.due_to,
    };

    let tasks = Task::list_in_list(&state.db, list_id, &filter, page_size, offset).await?;
    let total_tasks = Task::count_in_list(&state.db, list_id, &filter).await?;
    let shared_with = SharedList::list_for_list(&state.db, list_id).await?;

    Ok(Json(ListDetailResponse {
        list,
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
        total_tasks,
        page,
        page_size,
        can_edit: role.can_edit_tasks(),
        shared_with,
    }))
}

/// Updates a list; owner only
pub async fn update_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<Uuid>,
    Json(req): Json<UpdateListRequest>,
) -> ApiResult<Json<TaskList>> {
    require_owner(&state.db, list_id, auth.user_id).await?;
    req.validate()?;

    let name = match req.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.chars().count() < 2 {
                return Err(ApiError::field_error("name", "Name must be 2-100 characters"));
            }
            Some(name)
        }
        None => None,
    };

    if let Some(ref color) = req.color {
        validate_color(color)?;
    }

    let list = TaskList::update(
        &state.db,
        list_id,
        UpdateTaskList {
            name,
            description: req.description,
            color: req.color,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    Ok(Json(list))
}

/// Deletes a list and everything in it; owner only
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_owner(&state.db, list_id, auth.user_id).await?;

    let deleted = TaskList::delete(&state.db, list_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("List not found".to_string()));
    }

    tracing::info!(list_id = %list_id, user_id = %auth.user_id, "List deleted");

    Ok(Json(serde_json::json!({ "message": "List deleted" })))
}

/// Task counters for one list
pub async fn list_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<Json<ListStatsResponse>> {
    require_view(&state.db, list_id, auth.user_id).await?;

    let counts = TaskList::task_counts(&state.db, list_id).await?;
    let overdue_tasks = Task::count_overdue_in_list(&state.db, list_id).await?;
    let high_priority_tasks =
        Task::count_high_priority_open_in_list(&state.db, list_id).await?;

    Ok(Json(ListStatsResponse {
        total_tasks: counts.total_tasks,
        completed_tasks: counts.completed_tasks,
        pending_tasks: counts.pending_tasks,
        overdue_tasks,
        high_priority_tasks,
    }))
}

/// Shares a list with another user; owner only
///
/// # Errors
///
/// - `403 Forbidden`: caller is not the owner
/// - `409 Conflict`: already shared with that user
/// - `422 Unprocessable Entity`: unknown username or self-share
pub async fn share_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<Uuid>,
    Json(req): Json<ShareRequest>,
) -> ApiResult<Json<SharedList>> {
    require_owner(&state.db, list_id, auth.user_id).await?;
    req.validate()?;

    let target = User::find_by_username(&state.db, req.username.trim())
        .await?
        .ok_or_else(|| ApiError::field_error("username", "User not found"))?;

    if target.id == auth.user_id {
        return Err(ApiError::field_error(
            "username",
            "You cannot share a list with yourself",
        ));
    }

    if SharedList::find(&state.db, list_id, target.id).await?.is_some() {
        return Err(ApiError::Conflict(
            "List is already shared with this user".to_string(),
        ));
    }

    let share = SharedList::create(
        &state.db,
        CreateSharedList {
            list_id,
            shared_with_id: target.id,
            permission: req.permission,
            shared_by_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(
        list_id = %list_id,
        shared_with = %target.id,
        permission = req.permission.as_str(),
        "List shared"
    );

    Ok(Json(share))
}

/// Revokes a share grant; owner only
pub async fn unshare_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((list_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    require_owner(&state.db, list_id, auth.user_id).await?;

    let removed = SharedList::delete(&state.db, list_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Share not found".to_string()));
    }

    tracing::info!(list_id = %list_id, unshared = %user_id, "List unshared");

    Ok(Json(serde_json::json!({ "message": "List unshared" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#007bff").is_ok());
        assert!(validate_color("#ABCDEF").is_ok());
        assert!(validate_color("007bff").is_err());
        assert!(validate_color("#07bff").is_err());
        assert!(validate_color("#gggggg").is_err());
        assert!(validate_color("#007bff0").is_err());
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None, 12), (1, 12, 0));
        assert_eq!(page_bounds(Some(3), Some(20), 12), (3, 20, 40));
        // Out-of-range values are clamped, not rejected
        assert_eq!(page_bounds(Some(0), Some(0), 12), (1, 1, 0));
        assert_eq!(page_bounds(Some(-2), Some(10_000), 12), (1, MAX_PAGE_SIZE, 0));
    }
}
