//! Server-wide middleware configuration helpers.
//!
//! Middleware stack (outermost first):
//!
//! 1. **Logger**: Request/response logging
//! 2. **CORS**: Cross-origin resource sharing policy (via actix-cors)

use actix_cors::Cors;
use actix_web::http::{header::HeaderName, Method};
use actix_web::middleware;
use aspire_configs::ServerConfig;
use log::debug;

/// Build CORS middleware from server configuration using actix-cors.
///
/// The session header is always exposed so that launch frames without
/// third-party cookies can read it.
pub fn build_cors_from_config(config: &ServerConfig) -> Cors {
    let cors_config = &config.security.cors;

    let mut cors = Cors::default();

    if cors_config.allowed_origins.is_empty() || cors_config.allowed_origins.iter().any(|o| o == "*")
    {
        cors = cors.allow_any_origin();
        debug!("CORS: Allowing any origin");
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        debug!("CORS: Allowed origins: {:?}", cors_config.allowed_origins);
    }

    let methods: Vec<Method> =
        cors_config.allowed_methods.iter().filter_map(|m| m.parse().ok()).collect();
    if !methods.is_empty() {
        cors = cors.allowed_methods(methods);
    }

    if cors_config.allowed_headers.iter().any(|h| h == "*") {
        cors = cors.allow_any_header();
    } else {
        let mut headers: Vec<HeaderName> =
            cors_config.allowed_headers.iter().filter_map(|h| h.parse().ok()).collect();
        if let Ok(session_header) = config.session.header_name.parse::<HeaderName>() {
            if !headers.contains(&session_header) {
                headers.push(session_header);
            }
        }
        cors = cors.allowed_headers(headers);
    }

    let mut expose_headers: Vec<HeaderName> =
        cors_config.expose_headers.iter().filter_map(|h| h.parse().ok()).collect();
    if let Ok(session_header) = config.session.header_name.parse::<HeaderName>() {
        if !expose_headers.contains(&session_header) {
            expose_headers.push(session_header);
        }
    }
    cors = cors.expose_headers(expose_headers);

    if cors_config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors.max_age(usize::try_from(cors_config.max_age).ok())
}

/// Build the request logger middleware.
///
/// Query strings are left out of the access log: the init redirect and the
/// platform response carry launch secrets.
pub fn request_logger() -> middleware::Logger {
    middleware::Logger::new("%a \"%{r}xi\" %s %b %T").custom_request_replace("r", |req| {
        format!("{} {}", req.method(), req.path())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web, App, HttpResponse};

    fn config_with_origin(origin: &str) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.security.cors.allowed_origins = vec![origin.to_string()];
        config.security.cors.allow_credentials = true;
        config
    }

    #[actix_web::test]
    async fn test_cors_exposes_session_header() {
        let config = config_with_origin("https://lms.example.edu");
        let app = test::init_service(
            App::new()
                .wrap(build_cors_from_config(&config))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, "https://lms.example.edu"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let exposed = resp
            .headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(exposed.contains(&config.session.header_name));
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn test_default_cors_is_not_credentialed() {
        let config = ServerConfig::default();
        let app = test::init_service(
            App::new()
                .wrap(build_cors_from_config(&config))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, "https://anywhere.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
    }

    #[actix_web::test]
    async fn test_cors_rejects_unknown_origin() {
        let config = config_with_origin("https://lms.example.edu");
        let app = test::init_service(
            App::new()
                .wrap(build_cors_from_config(&config))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .to_request();
        if let Ok(resp) = test::try_call_service(&app, req).await {
            assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        }
    }
}
