/// Authentication and authorization utilities
///
/// This module provides the security primitives for TaskNest:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`session_token`]: Opaque session cookie token generation and hashing
/// - [`middleware`]: Cookie extraction and the `AuthContext` request extension
/// - [`access`]: The owner / writer / reader permission model for task lists
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: 256-bit random tokens, SHA-256 hashed at rest
/// - **Cookies**: HttpOnly, SameSite=Lax, Secure in production
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::auth::password::{hash_password, verify_password};
/// use tasknest_shared::auth::session_token::generate_session_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = generate_session_token();
/// # Ok(())
/// # }
/// ```

pub mod access;
pub mod middleware;
pub mod password;
pub mod session_token;
