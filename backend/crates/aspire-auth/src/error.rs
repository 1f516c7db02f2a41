use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use aspire_cache::CacheError;
use aspire_commons::ErrorBody;
use aspire_oidc::OidcError;

/// Errors raised by the launch handshake and the auth guard.
///
/// Each variant maps to one HTTP status and one error type name, rendered
/// as `{code, type, message}`.
#[derive(Debug, thiserror::Error)]
pub enum LtiError {
    /// The token's nonce does not belong to a live launch.
    #[error("{0}")]
    NonceValidation(String),

    /// The posted state does not match the launch that issued the nonce.
    #[error("{0}")]
    StateValidation(String),

    /// The `id_token` failed signature or claim validation.
    #[error("{0}")]
    TokenValidation(String),

    /// The request carries no usable session or lacks a required role.
    #[error("{message}")]
    AuthValidation { status: u16, message: String },

    /// Login was initiated for an unregistered client id.
    #[error("{0}")]
    ClientId(String),

    /// A cache invariant was violated (e.g. a session id collision).
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl LtiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        LtiError::AuthValidation {
            status: 401,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        LtiError::AuthValidation {
            status: 403,
            message: message.into(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            LtiError::NonceValidation(_) => 401,
            LtiError::StateValidation(_) => 403,
            LtiError::TokenValidation(_) => 401,
            LtiError::AuthValidation { status, .. } => *status,
            LtiError::ClientId(_) => 400,
            LtiError::Cache(_) => 500,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LtiError::NonceValidation(_) => "NonceValidationError",
            LtiError::StateValidation(_) => "StateValidationError",
            LtiError::TokenValidation(_) => "TokenValidationError",
            LtiError::AuthValidation { .. } => "AuthValidationError",
            LtiError::ClientId(_) => "ClientIdError",
            LtiError::Cache(_) => "CacheError",
        }
    }

    /// Message safe to return to the client.
    pub fn public_message(&self) -> String {
        match self {
            LtiError::Cache(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.status(), self.error_type(), self.public_message())
    }
}

impl From<OidcError> for LtiError {
    fn from(e: OidcError) -> Self {
        LtiError::TokenValidation(e.to_string())
    }
}

impl ResponseError for LtiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if let LtiError::Cache(e) = self {
            log::error!("Session cache failure: {}", e);
        }
        HttpResponse::build(self.status_code()).json(self.to_body())
    }
}
