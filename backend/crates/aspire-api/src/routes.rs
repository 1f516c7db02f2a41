//! API routes configuration
//!
//! This module configures all HTTP routes of the Aspire LTI gateway.

use crate::handlers;
use actix_web::web;

/// Configure API routes
///
/// - GET|POST /lti/oidc/init - Login initiation
/// - POST /lti/oidc/response - Platform authentication response
/// - POST /lti/launch - Bind the session to the browser (requires session)
/// - POST /lti/logout - End the session (requires session)
/// - GET /lti/session - Current session (requires session)
/// - GET /lti/public_jwk - Tool public key
/// - GET /lti/developer_key - Tool registration document
/// - GET /lti/dev/init, GET|POST /lti/dev/auth, POST /lti/dev/launch -
///   Launch simulator (local environment only)
/// - GET /healthcheck - Health check endpoint
///
/// Handlers expect `web::Data` for [`aspire_auth::LaunchHandshake`],
/// [`aspire_auth::AuthGuard`] and [`crate::ToolContext`].
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lti")
            .service(
                web::resource("/oidc/init")
                    .route(web::get().to(handlers::oidc_init_get_handler))
                    .route(web::post().to(handlers::oidc_init_post_handler)),
            )
            .route("/oidc/response", web::post().to(handlers::oidc_response_handler))
            .route("/launch", web::post().to(handlers::launch_handler))
            .route("/logout", web::post().to(handlers::logout_handler))
            .route("/session", web::get().to(handlers::session_handler))
            .route("/public_jwk", web::get().to(handlers::public_jwk_handler))
            .route("/developer_key", web::get().to(handlers::developer_key_handler))
            .service(
                web::scope("/dev")
                    .route("/init", web::get().to(handlers::dev_init_handler))
                    .service(
                        web::resource("/auth")
                            .route(web::get().to(handlers::dev_auth_handler))
                            .route(web::post().to(handlers::dev_auth_handler)),
                    )
                    .route("/launch", web::post().to(handlers::dev_launch_handler)),
            ),
    )
    .route("/healthcheck", web::get().to(handlers::healthcheck_handler));
}
