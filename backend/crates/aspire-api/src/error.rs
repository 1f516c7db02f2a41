//! JSON error mapping for every handler.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use aspire_auth::LtiError;
use aspire_cache::CacheError;
use aspire_commons::ErrorBody;
use aspire_oidc::OidcError;
use aspire_session::{DataAccessError, EntityLookupError};

/// Error returned by API handlers, rendered as `{code, type, message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Lti(#[from] LtiError),

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error(transparent)]
    EntityLookup(#[from] EntityLookupError),

    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("Token signing failed: {0}")]
    Signing(#[from] OidcError),
}

impl From<CacheError> for ApiError {
    fn from(e: CacheError) -> Self {
        ApiError::Lti(LtiError::Cache(e))
    }
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Lti(e) => e.status(),
            ApiError::DataAccess(e) => e.status(),
            ApiError::EntityLookup(_) => 500,
            ApiError::MissingParameter(_) => 400,
            ApiError::InvalidParameter { .. } => 400,
            ApiError::NotFound(_) => 404,
            ApiError::NotImplemented(_) => 501,
            ApiError::Signing(_) => 500,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Lti(e) => e.error_type(),
            ApiError::DataAccess(e) => e.error_type(),
            ApiError::EntityLookup(_) | ApiError::Signing(_) => "InternalError",
            ApiError::MissingParameter(_) | ApiError::InvalidParameter { .. } => "BadRequestError",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::NotImplemented(_) => "NotImplementedError",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            ApiError::Lti(e) => e.public_message(),
            ApiError::EntityLookup(_) | ApiError::Signing(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody::new(self.status(), self.error_type(), message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Lti(LtiError::Cache(e)) => log::error!("Session cache failure: {}", e),
            ApiError::EntityLookup(e) => log::error!("{}", e),
            ApiError::Signing(e) => log::error!("Failed to sign simulated token: {}", e),
            ApiError::DataAccess(e) => log::debug!("{}", e),
            _ => {},
        }
        HttpResponse::build(self.status_code()).json(self.to_body())
    }
}
