/// Profile endpoints
///
/// # Endpoints
///
/// - `PUT  /v1/profile` - Update bio / phone
/// - `POST /v1/profile/avatar` - Multipart avatar upload

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, Multipart, State},
    Json,
};
use serde::Deserialize;
use tasknest_shared::{
    auth::middleware::AuthContext,
    models::profile::{Profile, UpdateProfile},
    storage::ALLOWED_AVATAR_EXTENSIONS,
};
use validator::Validate;

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Short biography
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    /// Phone number
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

/// Updates the current user's profile fields
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    req.validate()?;

    // Make sure the row exists before updating (accounts predating profiles)
    Profile::get_or_create(&state.db, auth.user_id).await?;

    let profile = Profile::update(
        &state.db,
        auth.user_id,
        UpdateProfile {
            bio: req.bio,
            phone: req.phone,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Uploads a profile avatar
///
/// Accepts a multipart form with a `file` field. Only image extensions are
/// allowed; the file replaces any previous avatar.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<Json<Profile>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| ApiError::field_error("file", "Missing filename"))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::field_error("file", "No file provided"))?;

    if bytes.is_empty() {
        return Err(ApiError::field_error("file", "Empty file"));
    }
    if bytes.len() > state.config.storage.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "Avatar exceeds the {} byte limit",
            state.config.storage.max_upload_bytes
        )));
    }
    if !tasknest_shared::storage::extension_allowed(&filename, ALLOWED_AVATAR_EXTENSIONS) {
        return Err(ApiError::field_error("file", "Avatar must be an image"));
    }

    let relative_path = state.files.avatar_path(auth.user_id, &filename)?;

    // Remove the previous avatar so orphaned files don't pile up
    let previous = Profile::get_or_create(&state.db, auth.user_id).await?;

    state.files.save(&relative_path, &bytes).await?;

    let profile = Profile::set_avatar(&state.db, auth.user_id, &relative_path)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    if let Some(old_path) = previous.avatar_path {
        if old_path != relative_path {
            if let Err(e) = state.files.remove(&old_path).await {
                tracing::warn!(path = %old_path, "Failed to remove previous avatar: {}", e);
            }
        }
    }

    tracing::info!(user_id = %auth.user_id, "Avatar updated");

    Ok(Json(profile))
}
