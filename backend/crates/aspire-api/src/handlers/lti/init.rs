//! Login initiation handlers
//!
//! GET|POST /lti/oidc/init - Platforms may use either method

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use aspire_auth::LaunchHandshake;

use super::models::InitParams;
use crate::error::ApiError;

/// GET /lti/oidc/init
pub async fn oidc_init_get_handler(
    req: HttpRequest,
    handshake: web::Data<LaunchHandshake>,
    params: web::Query<InitParams>,
) -> Result<HttpResponse, ApiError> {
    initiate_login(&req, &handshake, params.into_inner()).await
}

/// POST /lti/oidc/init
pub async fn oidc_init_post_handler(
    req: HttpRequest,
    handshake: web::Data<LaunchHandshake>,
    params: web::Form<InitParams>,
) -> Result<HttpResponse, ApiError> {
    initiate_login(&req, &handshake, params.into_inner()).await
}

/// Store the launch nonce and redirect the browser to the platform's
/// authorization endpoint.
async fn initiate_login(
    req: &HttpRequest,
    handshake: &LaunchHandshake,
    params: InitParams,
) -> Result<HttpResponse, ApiError> {
    let has_cookies = req.headers().contains_key(header::COOKIE);
    let login = params.into_login(has_cookies)?;
    let redirect = handshake.initiate(login).await?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, redirect.url))
        .finish())
}
