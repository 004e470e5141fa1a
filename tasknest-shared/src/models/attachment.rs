/// TaskAttachment model and database operations
///
/// An attachment row records a file stored on local disk under the upload
/// root at `task_attachments/{task_id}/{filename}`. The row and the file
/// are created and deleted together; the `storage` module owns the disk
/// side.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_attachments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     stored_path VARCHAR(512) NOT NULL,
///     filename VARCHAR(255) NOT NULL,
///     file_size BIGINT NOT NULL,
///     uploaded_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::storage::{file_extension, format_file_size, is_image_filename};

/// TaskAttachment model representing one stored file
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskAttachment {
    /// Unique attachment ID
    pub id: Uuid,

    /// Task the file is attached to
    pub task_id: Uuid,

    /// Relative path under the upload root
    pub stored_path: String,

    /// Original client filename
    pub filename: String,

    /// Size in bytes
    pub file_size: i64,

    /// User who uploaded the file
    pub uploaded_by: Uuid,

    /// When the file was uploaded
    pub uploaded_at: DateTime<Utc>,
}

/// Input for creating an attachment row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttachment {
    pub task_id: Uuid,
    pub stored_path: String,
    pub filename: String,
    pub file_size: i64,
    pub uploaded_by: Uuid,
}

impl TaskAttachment {
    /// Size in human-readable form (`B` / `KB` / `MB`)
    pub fn file_size_display(&self) -> String {
        format_file_size(self.file_size)
    }

    /// Lowercased extension of the original filename, with the dot
    pub fn extension(&self) -> String {
        file_extension(&self.filename)
    }

    /// Whether the file is an image, judged by extension
    pub fn is_image(&self) -> bool {
        is_image_filename(&self.filename)
    }

    /// Creates an attachment row
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateAttachment,
    ) -> Result<Self, sqlx::Error> {
        let attachment = sqlx::query_as::<_, TaskAttachment>(
            r#"
            INSERT INTO task_attachments (task_id, stored_path, filename, file_size, uploaded_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, task_id, stored_path, filename, file_size, uploaded_by, uploaded_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.stored_path)
        .bind(data.filename)
        .bind(data.file_size)
        .bind(data.uploaded_by)
        .fetch_one(db)
        .await?;

        Ok(attachment)
    }

    /// Finds an attachment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let attachment = sqlx::query_as::<_, TaskAttachment>(
            r#"
            SELECT id, task_id, stored_path, filename, file_size, uploaded_by, uploaded_at
            FROM task_attachments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(attachment)
    }

    /// Deletes an attachment row
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_attachments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the attachments of a task, newest first
    pub async fn list_for_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let attachments = sqlx::query_as::<_, TaskAttachment>(
            r#"
            SELECT id, task_id, stored_path, filename, file_size, uploaded_by, uploaded_at
            FROM task_attachments
            WHERE task_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(attachments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_attachment(filename: &str, file_size: i64) -> TaskAttachment {
        TaskAttachment {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            stored_path: format!("task_attachments/{}/{}", Uuid::new_v4(), filename),
            filename: filename.to_string(),
            file_size,
            uploaded_by: Uuid::new_v4(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_file_size_display() {
        assert_eq!(sample_attachment("a.txt", 512).file_size_display(), "512 B");
        assert_eq!(sample_attachment("a.txt", 2048).file_size_display(), "2.0 KB");
        assert_eq!(
            sample_attachment("a.txt", 3 * 1024 * 1024).file_size_display(),
            "3.0 MB"
        );
    }

    #[test]
    fn test_extension_and_image_detection() {
        let pdf = sample_attachment("Report.PDF", 10);
        assert_eq!(pdf.extension(), ".pdf");
        assert!(!pdf.is_image());

        let photo = sample_attachment("photo.jpeg", 10);
        assert_eq!(photo.extension(), ".jpeg");
        assert!(photo.is_image());
    }
}
