//! Logout handler
//!
//! POST /lti/logout - Deletes the session and clears the session cookie

use actix_web::{web, HttpRequest, HttpResponse};
use aspire_auth::helpers::create_logout_cookie;
use aspire_auth::AuthGuard;
use aspire_cache::StoreKind;
use aspire_commons::ids::fingerprint;

use crate::context::ToolContext;
use crate::error::ApiError;

/// POST /lti/logout
pub async fn logout_handler(
    req: HttpRequest,
    guard: web::Data<AuthGuard>,
    tool: web::Data<ToolContext>,
) -> Result<HttpResponse, ApiError> {
    let source = guard.source_from_request(&req, None);
    let session = guard.enforce_auth(&source, &[]).await?;

    guard.cache().delete(&session.session_id, StoreKind::Session).await;
    log::info!("Session {} logged out", fingerprint(&session.session_id));

    Ok(HttpResponse::Ok()
        .cookie(create_logout_cookie(&tool.cookie))
        .json(serde_json::json!({
            "message": "Logged out successfully"
        })))
}
