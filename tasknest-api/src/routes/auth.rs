/// Authentication endpoints
///
/// This module provides session-cookie authentication:
/// - Registration (also creates the profile and a default list)
/// - Login / logout
/// - Current user lookup
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user, start a session
/// - `POST /v1/auth/login` - Verify credentials, start a session
/// - `POST /v1/auth/logout` - Revoke the current session
/// - `GET  /v1/auth/me` - Current user with profile

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{
        middleware::{build_session_cookie, clear_session_cookie, AuthContext},
        password,
    },
    models::{
        profile::Profile,
        session::Session,
        task_list::{CreateTaskList, TaskList},
        user::{CreateUser, User},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Name and description of the list every new account starts with
const DEFAULT_LIST_NAME: &str = "My Personal List";
const DEFAULT_LIST_DESCRIPTION: &str = "Personal task list";
const DEFAULT_LIST_COLOR: &str = "#007bff";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Given name
    #[validate(length(min = 1, max = 150, message = "First name is required"))]
    pub first_name: String,

    /// Family name
    #[validate(length(min = 1, max = 150, message = "Last name is required"))]
    pub last_name: String,

    /// Password (validated for strength separately)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    pub password: String,
}

/// User as returned by the API (no password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Current user with profile
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub bio: String,
    pub phone: String,
    pub avatar_path: Option<String>,
}

/// Registers a new user
///
/// Creates the user, their profile, and a default personal list in one
/// transaction, then starts a session and sets the cookie.
///
/// # Errors
///
/// - `409 Conflict`: username or email already taken
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|msg| ApiError::field_error("password", msg))?;

    // Friendly duplicate checks up front; the unique constraints still
    // backstop concurrent registrations
    if User::find_by_username(&state.db, req.username.trim()).await?.is_some() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }
    if User::find_by_email(&state.db, req.email.trim()).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let mut tx = state.db.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    Profile::get_or_create(&mut *tx, user.id).await?;

    // Every account starts with a personal list
    TaskList::create(
        &mut *tx,
        CreateTaskList {
            owner_id: user.id,
            name: DEFAULT_LIST_NAME.to_string(),
            description: DEFAULT_LIST_DESCRIPTION.to_string(),
            color: DEFAULT_LIST_COLOR.to_string(),
        },
    )
    .await?;

    let (_, token) = Session::create(&mut *tx, user.id, state.config.session.ttl_hours).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let cookie = build_session_cookie(
        &token,
        state.config.session_max_age_seconds(),
        state.secure_cookies(),
    );

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(UserResponse::from(user)),
    ))
}

/// Logs a user in
///
/// Verifies the password, records the login time, and starts a session.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let user = User::find_by_username(&state.db, req.username.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, user.id).await?;

    let (_, token) = Session::create(&state.db, user.id, state.config.session.ttl_hours).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    let cookie = build_session_cookie(
        &token,
        state.config.session_max_age_seconds(),
        state.secure_cookies(),
    );

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(UserResponse::from(user)),
    ))
}

/// Logs the current user out by revoking the session
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<impl IntoResponse> {
    Session::revoke(&state.db, auth.session_id).await?;

    let cookie = clear_session_cookie(state.secure_cookies());

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(serde_json::json!({ "message": "Logged out" })),
    ))
}

/// Returns the current user with their profile
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let profile = Profile::get_or_create(&state.db, auth.user_id).await?;

    Ok(Json(MeResponse {
        user: UserResponse::from(user),
        bio: profile.bio,
        phone: profile.phone,
        avatar_path: profile.avatar_path,
    }))
}
