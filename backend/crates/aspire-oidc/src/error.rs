/// Errors produced while validating a platform `id_token`.
#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    /// JWKS fetch or parse failed.
    #[error("JWKS fetch failed: {0}")]
    JwksFetchFailed(String),

    /// Token is missing the `kid` header required for key lookup.
    #[error("Token is missing the 'kid' header")]
    MissingKid,

    /// No key with the given `kid` was found in the platform's key set.
    #[error("No key found for kid '{0}'")]
    KeyNotFound(String),

    /// Key material could not be loaded or converted to a decoding key.
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// The header names an algorithm the gateway does not accept.
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A claim required by LTI is absent or empty.
    #[error("Missing '{0}' claim")]
    MissingClaim(&'static str),

    /// JWT decode / signature verification / claims validation failed.
    #[error("JWT validation failed: {0}")]
    JwtValidationFailed(String),
}

impl From<jsonwebtoken::errors::Error> for OidcError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => OidcError::JwtValidationFailed("Token expired".into()),
            ErrorKind::InvalidSignature => {
                OidcError::JwtValidationFailed("Invalid signature".into())
            }
            ErrorKind::InvalidIssuer => OidcError::JwtValidationFailed("Invalid issuer".into()),
            ErrorKind::InvalidAudience => {
                OidcError::JwtValidationFailed("Invalid audience".into())
            }
            ErrorKind::MissingRequiredClaim(claim) => {
                OidcError::JwtValidationFailed(format!("Missing '{}' claim", claim))
            }
            ErrorKind::InvalidToken => OidcError::JwtValidationFailed("Invalid token".into()),
            _ => OidcError::JwtValidationFailed(e.to_string()),
        }
    }
}
