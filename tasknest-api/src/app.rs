/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasknest_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = tasknest_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasknest_shared::{
    auth::{
        middleware::{extract_session_token, AuthContext, AuthError, SESSION_COOKIE},
        session_token::validate_session_token_format,
    },
    models::session::Session,
    storage::FileStore,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Upload root for attachments and avatars
    pub files: Arc<FileStore>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let files = Arc::new(FileStore::new(config.storage.upload_dir.clone()));
        Self {
            db,
            config: Arc::new(config),
            files,
        }
    }

    /// Whether session cookies must be marked Secure
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/                             # API v1 (versioned)
///     ├── /auth/                       # register + login public, rest authenticated
///     ├── /profile                     # current user's profile
///     ├── /dashboard                   # aggregate stats and panels
///     ├── /lists/...                   # lists, sharing, per-list stats and tasks
///     ├── /tasks/...                   # task mutations, status machine, activity
///     ├── /attachments/...             # download and delete
///     └── /users/search                # user lookup for the share dialog
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session authentication (all /v1 routes except register/login)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes that must work without a session
    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything below requires a valid session cookie
    let protected_routes = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        .route("/profile", put(routes::profile::update_profile))
        .route("/profile/avatar", post(routes::profile::upload_avatar))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/lists",
            get(routes::lists::list_lists).post(routes::lists::create_list),
        )
        .route(
            "/lists/:id",
            get(routes::lists::get_list)
                .put(routes::lists::update_list)
                .delete(routes::lists::delete_list),
        )
        .route("/lists/:id/stats", get(routes::lists::list_stats))
        .route("/lists/:id/share", post(routes::lists::share_list))
        .route(
            "/lists/:id/share/:user_id",
            delete(routes::lists::unshare_list),
        )
        .route("/lists/:id/tasks", post(routes::tasks::create_task))
        .route("/lists/:id/tasks/quick", post(routes::tasks::quick_add_task))
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/toggle", post(routes::tasks::toggle_task))
        .route("/tasks/:id/status", post(routes::tasks::change_task_status))
        .route("/tasks/:id/activity", get(routes::tasks::task_activity))
        .route(
            "/tasks/:id/attachments",
            post(routes::attachments::upload_attachment),
        )
        .route(
            "/attachments/:id",
            get(routes::attachments::download_attachment)
                .delete(routes::attachments::delete_attachment),
        )
        .route("/users/search", get(routes::users::search_users))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", public_auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Uploads are the largest accepted bodies; leave room for multipart framing
    let body_limit = state.config.storage.max_upload_bytes + 64 * 1024;

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Resolves the session cookie to a live session and injects `AuthContext`
/// into request extensions.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        extract_session_token(req.headers(), SESSION_COOKIE).ok_or(AuthError::MissingSession)?;

    if !validate_session_token_format(&token) {
        return Err(AuthError::MalformedToken.into());
    }

    let session = Session::authenticate(&state.db, &token)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    let auth_context = AuthContext::from_session(session.user_id, session.id);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
