//! Authentication response handler
//!
//! POST /lti/oidc/response - Validates the platform's `id_token` and opens a session

use actix_web::{web, HttpResponse};
use aspire_auth::{LaunchHandshake, LtiError};

use super::models::{LaunchFrame, OidcResponseForm};
use crate::error::ApiError;

/// POST /lti/oidc/response
///
/// Returns the launch frame context; the frame then posts the session id
/// to `/lti/launch` from the tool's own origin.
pub async fn oidc_response_handler(
    handshake: web::Data<LaunchHandshake>,
    form: web::Form<OidcResponseForm>,
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();

    if let Some(message) = form.platform_error() {
        log::warn!("{}", message);
        return Err(LtiError::TokenValidation(message).into());
    }

    let id_token = form
        .id_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| LtiError::TokenValidation("Missing id_token".to_string()))?;
    let state = form
        .state
        .filter(|state| !state.is_empty())
        .ok_or_else(|| LtiError::StateValidation("Missing state".to_string()))?;

    let outcome = handshake.complete(&id_token, &state).await?;
    Ok(HttpResponse::Ok().json(LaunchFrame::from(outcome)))
}
