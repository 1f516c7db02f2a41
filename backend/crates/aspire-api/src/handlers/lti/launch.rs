//! Launch handler
//!
//! POST /lti/launch - Binds a freshly created session to the browser

use actix_web::{web, HttpRequest, HttpResponse};
use aspire_auth::helpers::create_session_cookie;
use aspire_auth::AuthGuard;
use aspire_commons::StorageTarget;

use super::models::{LaunchContext, LaunchForm};
use crate::context::ToolContext;
use crate::error::ApiError;

/// POST /lti/launch
///
/// With cookie storage the session id is set as an HttpOnly cookie.
/// Otherwise it is returned in the body together with the header name the
/// client must send it in.
pub async fn launch_handler(
    req: HttpRequest,
    guard: web::Data<AuthGuard>,
    tool: web::Data<ToolContext>,
    form: web::Form<LaunchForm>,
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();
    let source = guard.source_from_request(&req, Some(form.session_id));
    let session = guard.enforce_auth(&source, &[]).await?;

    let storage_target = StorageTarget::from_param(&form.storage_target);
    let context = LaunchContext::new(
        session.id_token.custom_claims().cloned().unwrap_or_default(),
        storage_target.clone(),
        tool.tool_domain.clone(),
        form.oidc_auth_domain,
    );

    if storage_target.is_cookie() {
        let cookie =
            create_session_cookie(&session.session_id, tool.session_idle_seconds, &tool.cookie);
        Ok(HttpResponse::Ok().cookie(cookie).json(context))
    } else {
        let context = context.with_header_transport(session.session_id, guard.header_name());
        Ok(HttpResponse::Ok().json(context))
    }
}
