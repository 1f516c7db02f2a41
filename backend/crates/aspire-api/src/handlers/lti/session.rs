//! GET /lti/session - Returns information about the caller's session

use actix_web::{web, HttpResponse};
use aspire_auth::{AuthGuard, LtiSession};

use super::models::SessionInfo;

pub async fn session_handler(session: LtiSession, guard: web::Data<AuthGuard>) -> HttpResponse {
    HttpResponse::Ok().json(SessionInfo::new(&session, guard.role_provider()))
}
