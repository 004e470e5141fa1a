/// Permission model for task lists
///
/// Access to everything in TaskNest flows through the containing task list.
/// A user's role on a list is resolved from ownership and share grants:
///
/// | Role   | Source                      | Can                                      |
/// |--------|-----------------------------|------------------------------------------|
/// | Owner  | `task_lists.owner_id`       | everything, incl. edit/delete/share list |
/// | Writer | `shared_lists` with `write` | create/edit/delete tasks and attachments |
/// | Reader | `shared_lists` with `read`  | view only                                |
///
/// Users with no role cannot see that the list exists: view-style checks
/// report the list as not found, while mutations on reachable objects are
/// denied outright (matching how the original application distinguished
/// hidden detail pages from forbidden edits).

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::shared_list::SharePermission;

/// A user's resolved role on one task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRole {
    /// The list owner
    Owner,

    /// Shared with write permission
    Writer,

    /// Shared with read permission
    Reader,
}

impl ListRole {
    /// Whether the role can see the list and its contents
    pub fn can_view(&self) -> bool {
        true
    }

    /// Whether the role can create/edit/delete tasks and attachments
    pub fn can_edit_tasks(&self) -> bool {
        matches!(self, ListRole::Owner | ListRole::Writer)
    }

    /// Whether the role can edit, delete, or share the list itself
    pub fn can_manage_list(&self) -> bool {
        matches!(self, ListRole::Owner)
    }
}

/// Error type for access checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// List does not exist, or the user may not know it exists
    #[error("List not found")]
    NotFound,

    /// List is visible but the role does not allow the operation
    #[error("Permission denied")]
    Denied,

    /// Database failure during role resolution
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Resolves a user's role on a list
///
/// Returns `Ok(None)` when the list exists but the user has no access,
/// and `Err(AccessError::NotFound)` when the list does not exist.
pub async fn role_for_list(
    pool: &PgPool,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<Option<ListRole>, AccessError> {
    let row: Option<(Uuid, Option<SharePermission>)> = sqlx::query_as(
        r#"
        SELECT l.owner_id, s.permission
        FROM task_lists l
        LEFT JOIN shared_lists s ON s.list_id = l.id AND s.shared_with_id = $2
        WHERE l.id = $1
        "#,
    )
    .bind(list_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let (owner_id, permission) = row.ok_or(AccessError::NotFound)?;

    if owner_id == user_id {
        return Ok(Some(ListRole::Owner));
    }

    Ok(permission.map(|p| match p {
        SharePermission::Write => ListRole::Writer,
        SharePermission::Read => ListRole::Reader,
    }))
}

/// Requires view access to a list
///
/// A user with no role gets `NotFound`, hiding the list's existence.
pub async fn require_view(
    pool: &PgPool,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<ListRole, AccessError> {
    match role_for_list(pool, list_id, user_id).await? {
        Some(role) => Ok(role),
        None => Err(AccessError::NotFound),
    }
}

/// Requires write access to a list's tasks (owner or write grant)
pub async fn require_write(
    pool: &PgPool,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<ListRole, AccessError> {
    match role_for_list(pool, list_id, user_id).await? {
        Some(role) if role.can_edit_tasks() => Ok(role),
        _ => Err(AccessError::Denied),
    }
}

/// Requires list management rights (owner only)
pub async fn require_owner(
    pool: &PgPool,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<ListRole, AccessError> {
    match role_for_list(pool, list_id, user_id).await? {
        Some(role) if role.can_manage_list() => Ok(role),
        _ => Err(AccessError::Denied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_do_everything() {
        assert!(ListRole::Owner.can_view());
        assert!(ListRole::Owner.can_edit_tasks());
        assert!(ListRole::Owner.can_manage_list());
    }

    #[test]
    fn test_writer_edits_tasks_but_not_list() {
        assert!(ListRole::Writer.can_view());
        assert!(ListRole::Writer.can_edit_tasks());
        assert!(!ListRole::Writer.can_manage_list());
    }

    #[test]
    fn test_reader_is_view_only() {
        assert!(ListRole::Reader.can_view());
        assert!(!ListRole::Reader.can_edit_tasks());
        assert!(!ListRole::Reader.can_manage_list());
    }

    // Role resolution against the database is covered by the integration
    // tests in tests/db_integration_tests.rs
}
