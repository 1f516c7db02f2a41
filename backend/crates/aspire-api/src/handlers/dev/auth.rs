//! GET|POST /lti/dev/auth

use actix_web::{web, HttpResponse};
use aspire_oidc::LaunchClaims;
use serde_json::Value;

use super::models::{SimulatedAuthQuery, SimulatedAuthResponse};
use super::simulator;
use crate::context::ToolContext;
use crate::error::ApiError;

/// Answers the authorization request with a tool-signed `id_token`.
///
/// The simulated platform must trust the tool's own public key for the
/// token to pass validation at `/lti/oidc/response`.
pub async fn dev_auth_handler(
    tool: web::Data<ToolContext>,
    query: web::Query<SimulatedAuthQuery>,
) -> Result<HttpResponse, ApiError> {
    let simulator = simulator(&tool)?;
    let signer = simulator.signer.as_ref().ok_or_else(|| {
        ApiError::NotImplemented("No tool signing key is configured".to_string())
    })?;
    let query = query.into_inner();

    let mut custom = simulator.custom_claims.clone();
    if let Some(params) = query.params.as_deref().filter(|p| !p.trim().is_empty()) {
        match serde_json::from_str::<Value>(params) {
            Ok(Value::Object(overrides)) => custom.extend(overrides),
            Ok(_) => {
                return Err(ApiError::InvalidParameter {
                    name: "params",
                    reason: "expected a JSON object".to_string(),
                })
            },
            Err(e) => {
                return Err(ApiError::InvalidParameter {
                    name: "params",
                    reason: e.to_string(),
                })
            },
        }
    }

    let id_token = signer.mint_id_token(&LaunchClaims {
        audience: query.client_id,
        nonce: query.nonce,
        subject: query.login_hint.unwrap_or_else(|| simulator.login_hint.clone()),
        custom,
    })?;
    log::debug!("Minted simulated id_token for {}", simulator.client_id);

    Ok(HttpResponse::Ok().json(SimulatedAuthResponse {
        response_url: tool.redirect_uri.clone(),
        id_token,
        state: query.state,
    }))
}
