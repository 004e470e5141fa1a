/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, current user
/// - `profile`: Profile updates and avatar upload
/// - `dashboard`: Aggregate stats and dashboard panels
/// - `lists`: Task list CRUD, sharing, and per-list stats
/// - `tasks`: Task CRUD, status machine, and activity log
/// - `attachments`: Upload, download, and delete of task files
/// - `users`: User search for the share dialog

pub mod attachments;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod lists;
pub mod profile;
pub mod tasks;
pub mod users;
