/// Session cookie authentication for Axum
///
/// The API server authenticates browsers with an opaque session cookie.
/// This module provides the pieces the server's auth layer is built from:
/// cookie parsing, `Set-Cookie` construction, and the `AuthContext` that
/// authenticated handlers read from request extensions.
///
/// # Request Extensions
///
/// After successful authentication the middleware inserts:
/// - `AuthContext`: the authenticated user and session IDs
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use tasknest_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "tasknest_session";

/// Authentication context added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Session backing this request (revoked on logout)
    pub session_id: Uuid,
}

impl AuthContext {
    /// Creates auth context from an authenticated session
    pub fn from_session(user_id: Uuid, session_id: Uuid) -> Self {
        Self { user_id, session_id }
    }
}

/// Error type for session extraction and validation
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session cookie on the request
    #[error("Missing session cookie")]
    MissingSession,

    /// Cookie present but not a valid session token
    #[error("Malformed session token")]
    MalformedToken,

    /// Token did not resolve to a live session
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Database failure during session lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Extracts the session token from a request's Cookie header
///
/// Returns `None` when the header is absent or carries no cookie with the
/// given name. The value is not validated here; see
/// [`super::session_token::validate_session_token_format`].
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

/// Builds the `Set-Cookie` value that starts a session
///
/// HttpOnly keeps the token away from scripts; SameSite=Lax covers the
/// cross-site request cases a cookie-authenticated JSON API cares about.
/// `secure` must be true in production so the cookie only travels over TLS.
pub fn build_session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that ends a session (logout)
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_session_token_single_cookie() {
        let headers = headers_with_cookie("tasknest_session=tnsess_abc123");
        assert_eq!(
            extract_session_token(&headers, SESSION_COOKIE),
            Some("tnsess_abc123".to_string())
        );
    }

    #[test]
    fn test_extract_session_token_among_many() {
        let headers =
            headers_with_cookie("theme=dark; tasknest_session=tnsess_abc123; lang=en");
        assert_eq!(
            extract_session_token(&headers, SESSION_COOKIE),
            Some("tnsess_abc123".to_string())
        );
    }

    #[test]
    fn test_extract_session_token_missing() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert_eq!(extract_session_token(&headers, SESSION_COOKIE), None);

        let empty = HeaderMap::new();
        assert_eq!(extract_session_token(&empty, SESSION_COOKIE), None);
    }

    #[test]
    fn test_extract_session_token_ignores_name_prefix_collision() {
        let headers = headers_with_cookie("tasknest_session_old=zzz; tasknest_session=good");
        assert_eq!(
            extract_session_token(&headers, SESSION_COOKIE),
            Some("good".to_string())
        );
    }

    #[test]
    fn test_build_session_cookie() {
        let cookie = build_session_cookie("tnsess_tok", 3600, false);
        assert!(cookie.starts_with("tasknest_session=tnsess_tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_build_session_cookie_secure() {
        let cookie = build_session_cookie("tnsess_tok", 3600, true);
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_session_cookie() {
        let cookie = clear_session_cookie(false);
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("tasknest_session=;"));
    }
}
