//! GET /lti/developer_key - Tool registration document for the platform admin

use actix_web::{web, HttpResponse};

use super::models::DeveloperKey;
use crate::context::ToolContext;

pub async fn developer_key_handler(tool: web::Data<ToolContext>) -> HttpResponse {
    HttpResponse::Ok().json(DeveloperKey::for_tool(&tool))
}
