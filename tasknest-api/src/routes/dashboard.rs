/// Dashboard endpoint
///
/// Aggregates the panels the original dashboard shows: task counts across
/// every visible list, the most imminent upcoming tasks, the most overdue
/// tasks, and recent activity.
///
/// # Endpoints
///
/// - `GET /v1/dashboard`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use tasknest_shared::{
    auth::middleware::AuthContext,
    models::{
        activity::{ActivityFeedItem, TaskActivity},
        task::{DashboardCounts, Task, TaskWithList},
    },
};

/// Due-window for the "upcoming" panel, in days
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Rows per dashboard panel
const PANEL_LIMIT: i64 = 5;

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Task counts across every visible list
    #[serde(flatten)]
    pub counts: DashboardCounts,

    /// Open tasks due within the next week, soonest first
    pub upcoming_tasks: Vec<TaskWithList>,

    /// Open tasks past their due date, most overdue first
    pub overdue_tasks: Vec<TaskWithList>,

    /// Most recent activity on visible lists
    pub recent_activities: Vec<ActivityFeedItem>,
}

/// Builds the dashboard for the current user
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardResponse>> {
    let counts = Task::status_counts_for_user(&state.db, auth.user_id).await?;
    let upcoming_tasks =
        Task::upcoming_for_user(&state.db, auth.user_id, UPCOMING_WINDOW_DAYS, PANEL_LIMIT).await?;
    let overdue_tasks = Task::overdue_for_user(&state.db, auth.user_id, PANEL_LIMIT).await?;
    let recent_activities =
        TaskActivity::recent_for_user(&state.db, auth.user_id, PANEL_LIMIT).await?;

    Ok(Json(DashboardResponse {
        counts,
        upcoming_tasks,
        overdue_tasks,
        recent_activities,
    }))
}
