/// User search endpoint
///
/// Backs the share dialog: find users to share a list with.
///
/// # Endpoints
///
/// - `GET /v1/users/search?q=` - Case-insensitive lookup by username or name

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tasknest_shared::{auth::middleware::AuthContext, models::user::User};
use uuid::Uuid;

/// Minimum query length before any lookup happens
const MIN_QUERY_LENGTH: usize = 2;

/// Maximum results returned
const MAX_RESULTS: i64 = 10;

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search term
    #[serde(default)]
    pub q: String,
}

/// One user search hit
#[derive(Debug, Serialize)]
pub struct UserSearchHit {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub users: Vec<UserSearchHit>,
}

/// Searches users by username, first name, or last name
///
/// Queries shorter than two characters return an empty list rather than an
/// error, so the share dialog can call this on every keystroke. The
/// requesting user is excluded from the results.
pub async fn search_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params.q.trim();
    if query.chars().count() < MIN_QUERY_LENGTH {
        return Ok(Json(SearchResponse { users: vec![] }));
    }

    let users = User::search(&state.db, query, auth.user_id, MAX_RESULTS).await?;

    let users = users
        .into_iter()
        .map(|u| {
            let full_name = u.full_name();
            UserSearchHit {
                id: u.id,
                username: u.username,
                full_name,
                email: u.email,
            }
        })
        .collect();

    Ok(Json(SearchResponse { users }))
}
