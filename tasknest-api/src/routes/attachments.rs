/// Task attachment endpoints
///
/// Files are stored on local disk under `task_attachments/{task_id}/` with
/// their metadata in the `task_attachments` table. Upload and delete append
/// `file_added` / `file_removed` activity in the same transaction as the row
/// change; the disk write happens before the row is committed so a failed
/// transaction never leaves a row pointing at nothing.
///
/// # Endpoints
///
/// - `POST   /v1/tasks/:id/attachments` - Multipart upload (write access)
/// - `GET    /v1/attachments/:id` - Download (view access)
/// - `DELETE /v1/attachments/:id` - Delete (write access)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tasknest_shared::{
    auth::{
        access::{require_view, require_write},
        middleware::AuthContext,
    },
    models::{
        activity::{ActivityAction, TaskActivity},
        attachment::{CreateAttachment, TaskAttachment},
        task::Task,
    },
    storage::file_extension,
};
use uuid::Uuid;

/// Attachment as returned by the API, with display helpers resolved
#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub filename: String,
    pub file_size: i64,
    pub file_size_display: String,
    pub is_image: bool,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

impl From<TaskAttachment> for AttachmentResponse {
    fn from(attachment: TaskAttachment) -> Self {
        let file_size_display = attachment.file_size_display();
        let is_image = attachment.is_image();
        Self {
            id: attachment.id,
            task_id: attachment.task_id,
            filename: attachment.filename,
            file_size: attachment.file_size,
            file_size_display,
            is_image,
            uploaded_by: attachment.uploaded_by,
            uploaded_at: attachment.uploaded_at,
        }
    }
}

/// Content type for a stored attachment, judged by extension
fn content_type_for(filename: &str) -> &'static str {
    match file_extension(filename).as_str() {
        ".pdf" => "application/pdf",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".txt" => "text/plain; charset=utf-8",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

async fn load_task(state: &AppState, task_id: Uuid) -> ApiResult<Task> {
    Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Uploads a file to a task
///
/// Accepts a multipart form with a `file` field. The extension allowlist
/// and size cap are enforced before anything reaches the disk.
pub async fn upload_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<AttachmentResponse>> {
    let task = load_task(&state, task_id).await?;
    require_write(&state.db, task.list_id, auth.user_id).await?;

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
            "File exceeds the {} byte limit",
            state.config.storage.max_upload_bytes
        )));
    }

    // Validates the filename and extension as a side effect
    let stored_path = state.files.attachment_path(task_id, &filename)?;

    state.files.save(&stored_path, &bytes).await?;

    let mut tx = state.db.begin().await?;

    let attachment = TaskAttachment::create(
        &mut *tx,
        CreateAttachment {
            task_id,
            stored_path: stored_path.clone(),
            filename: filename.clone(),
            file_size: bytes.len() as i64,
            uploaded_by: auth.user_id,
        },
    )
    .await?;

    TaskActivity::log(
        &mut *tx,
        task_id,
        auth.user_id,
        ActivityAction::FileAdded,
        &format!("File added: {}", attachment.filename),
    )
    .await?;

    if let Err(e) = tx.commit().await {
        // Roll the disk back so no orphan file remains
        if let Err(remove_err) = state.files.remove(&stored_path).await {
            tracing::warn!(path = %stored_path, "Failed to clean up upload: {}", remove_err);
        }
        return Err(e.into());
    }

    tracing::info!(
        task_id = %task_id,
        attachment_id = %attachment.id,
        size = attachment.file_size,
        "Attachment uploaded"
    );

    Ok(Json(AttachmentResponse::from(attachment)))
}

/// Downloads an attachment with its original filename
pub async fn download_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(attachment_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let attachment = TaskAttachment::find_by_id(&state.db, attachment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attachment not found".to_string()))?;

    let task = load_task(&state, attachment.task_id).await?;
    require_view(&state.db, task.list_id, auth.user_id).await?;

    let bytes = state.files.read(&attachment.stored_path).await.map_err(|e| {
        tracing::error!(path = %attachment.stored_path, "Stored file missing: {}", e);
        ApiError::NotFound("Attachment file not found".to_string())
    })?;

    let headers = [
        (
            header::CONTENT_TYPE,
            content_type_for(&attachment.filename).to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment.filename),
        ),
    ];

    Ok((headers, bytes))
}

/// Deletes an attachment and its stored file
pub async fn delete_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(attachment_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let attachment = TaskAttachment::find_by_id(&state.db, attachment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attachment not found".to_string()))?;

    let task = load_task(&state, attachment.task_id).await?;
    require_write(&state.db, task.list_id, auth.user_id).await?;

    let mut tx = state.db.begin().await?;

    let deleted = TaskAttachment::delete(&mut *tx, attachment_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Attachment not found".to_string()));
    }

    TaskActivity::log(
        &mut *tx,
        attachment.task_id,
        auth.user_id,
        ActivityAction::FileRemoved,
        &format!("File removed: {}", attachment.filename),
    )
    .await?;

    tx.commit().await?;

    // The row is gone; a leftover file is only a warning
    if let Err(e) = state.files.remove(&attachment.stored_path).await {
        tracing::warn!(path = %attachment.stored_path, "Failed to remove file: {}", e);
    }

    tracing::info!(
        task_id = %attachment.task_id,
        attachment_id = %attachment_id,
        "Attachment deleted"
    );

    Ok(Json(serde_json::json!({ "message": "Attachment deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("report.pdf"), "application/pdf");
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("notes.txt"), "text/plain; charset=utf-8");
        assert_eq!(content_type_for("unknown.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
