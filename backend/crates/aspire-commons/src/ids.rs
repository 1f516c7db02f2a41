// Random identifiers for nonces, CSRF tokens and sessions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

/// Bytes of entropy in every nonce and CSRF token.
pub const TOKEN_BYTES: usize = 32;

/// Generate a URL-safe random token with [`TOKEN_BYTES`] bytes of entropy.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a new session identifier (UUID v4, simple hex form).
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Short prefix of a secret value, safe to write to logs.
pub fn fingerprint(secret: &str) -> String {
    let prefix: String = secret.chars().take(8).collect();
    format!("{}…", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_token_is_urlsafe_and_unique() {
        let tokens: HashSet<String> = (0..64).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 64);

        for token in &tokens {
            // 32 bytes -> 43 base64 characters without padding
            assert_eq!(token.len(), 43);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_session_id_is_hex() {
        let id = generate_session_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_session_id());
    }

    #[test]
    fn test_fingerprint_truncates() {
        assert_eq!(fingerprint("abcdefghijkl"), "abcdefgh…");
        assert_eq!(fingerprint("abc"), "abc…");
    }
}
