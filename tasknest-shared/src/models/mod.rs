/// Database models for TaskNest
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `profile`: 1:1 user profile extension (bio, phone, avatar)
/// - `session`: Server-side login sessions backing the session cookie
/// - `task_list`: Task lists owned by a user
/// - `shared_list`: Read/write grants of a list to another user
/// - `task`: Tasks with priority, status machine, and due dates
/// - `attachment`: Files attached to tasks
/// - `activity`: Append-only per-task audit log
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::user::{User, CreateUser};
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "jdoe".to_string(),
///     email: "user@example.com".to_string(),
///     first_name: "John".to_string(),
///     last_name: "Doe".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod activity;
pub mod attachment;
pub mod profile;
pub mod session;
pub mod shared_list;
pub mod task;
pub mod task_list;
pub mod user;
