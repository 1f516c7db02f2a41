use actix_web::{HttpResponse, Responder};

use super::models::HealthResponse;

/// GET /healthcheck
///
/// Returns 200 OK while the server is running.
pub async fn healthcheck_handler() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::healthy())
}
