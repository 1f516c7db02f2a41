//! GET /lti/dev/init

use actix_web::{web, HttpResponse};

use super::models::SimulatedInit;
use super::simulator;
use crate::context::ToolContext;
use crate::error::ApiError;

pub async fn dev_init_handler(tool: web::Data<ToolContext>) -> Result<HttpResponse, ApiError> {
    let simulator = simulator(&tool)?;

    Ok(HttpResponse::Ok().json(SimulatedInit {
        init_url: tool.url("/lti/oidc/init"),
        iss: tool.tool_domain.trim_end_matches('/').to_string(),
        client_id: simulator.client_id.clone(),
        login_hint: simulator.login_hint.clone(),
        target_link_uri: tool.launch_uri.clone(),
    }))
}
