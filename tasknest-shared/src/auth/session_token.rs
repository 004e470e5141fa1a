/// Session token utilities
///
/// Generates and hashes the opaque tokens carried by the session cookie.
/// These work in conjunction with the `models::session` module for database
/// operations.
///
/// # Security
///
/// - **Format**: `tnsess_{40_chars}` (prefix + 40 random alphanumeric chars)
/// - **Storage**: Tokens are hashed with SHA-256 before storage
/// - **Entropy**: 62^40 combinations, well beyond brute force
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::session_token::{
///     generate_session_token, hash_session_token, validate_session_token_format,
/// };
///
/// let token = generate_session_token();
/// assert!(token.starts_with("tnsess_"));
/// assert!(validate_session_token_format(&token));
///
/// // Deterministic hash for storage and lookup
/// assert_eq!(hash_session_token(&token), hash_session_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of a session token (characters)
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Session token prefix
const TOKEN_PREFIX: &str = "tnsess_";

/// Total length of a session token (prefix + random)
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new session token
///
/// Creates a cryptographically random token with the format
/// `tnsess_{40_chars}`. Only its SHA-256 hash ever reaches the database.
pub fn generate_session_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random_part: String = (0..TOKEN_RANDOM_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("{}{}", TOKEN_PREFIX, random_part)
}

/// Hashes a session token using SHA-256
///
/// # Returns
///
/// Hex-encoded SHA-256 hash (64 characters)
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates session token format
///
/// Checks the prefix, the total length, and that the random part is
/// alphanumeric. Rejecting malformed cookies up front avoids a pointless
/// database lookup.
pub fn validate_session_token_format(token: &str) -> bool {
    if token.len() != SESSION_TOKEN_LENGTH {
        return false;
    }

    let Some(random_part) = token.strip_prefix(TOKEN_PREFIX) else {
        return false;
    };

    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token_format() {
        let token = generate_session_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), SESSION_TOKEN_LENGTH);
        assert!(validate_session_token_format(&token));
    }

    #[test]
    fn test_generate_session_token_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_session_token() {
        let hash = hash_session_token("tnsess_test");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));

        // Deterministic
        assert_eq!(hash, hash_session_token("tnsess_test"));
    }

    #[test]
    fn test_validate_session_token_format_rejects_bad_input() {
        assert!(!validate_session_token_format(""));
        assert!(!validate_session_token_format("tnsess_short"));
        assert!(!validate_session_token_format(&format!(
            "wrong__{}",
            "a".repeat(TOKEN_RANDOM_LENGTH)
        )));
        assert!(!validate_session_token_format(&format!(
            "tnsess_{}!",
            "a".repeat(TOKEN_RANDOM_LENGTH - 1)
        )));
    }
}
