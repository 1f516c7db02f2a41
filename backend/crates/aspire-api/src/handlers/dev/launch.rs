//! POST /lti/dev/launch

use actix_web::{web, HttpRequest, HttpResponse};
use aspire_auth::AuthGuard;

use super::simulator;
use crate::context::ToolContext;
use crate::error::ApiError;
use crate::handlers::lti::launch_handler;
use crate::handlers::lti::models::LaunchForm;

pub async fn dev_launch_handler(
    req: HttpRequest,
    guard: web::Data<AuthGuard>,
    tool: web::Data<ToolContext>,
    form: web::Form<LaunchForm>,
) -> Result<HttpResponse, ApiError> {
    simulator(&tool)?;
    launch_handler(req, guard, tool, form).await
}
