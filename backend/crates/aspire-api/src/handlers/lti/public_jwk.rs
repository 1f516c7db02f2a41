//! GET /lti/public_jwk - Public key platforms use to verify tool-signed messages

use actix_web::{web, HttpResponse};

use crate::context::ToolContext;
use crate::error::ApiError;

pub async fn public_jwk_handler(tool: web::Data<ToolContext>) -> Result<HttpResponse, ApiError> {
    let jwk = tool
        .public_jwk
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("No tool public key is configured".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "public_jwk": jwk })))
}
