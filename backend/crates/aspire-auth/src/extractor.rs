//! Actix-web extractor resolving the caller's LTI session.
//!
//! The [`AuthGuard`] must be registered as app data:
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(web::Data::new(guard))
//!     .service(my_handler)
//! ```
//!
//! Handlers then receive a live session as a parameter:
//!
//! ```rust,ignore
//! #[get("/session")]
//! async fn handler(session: LtiSession) -> impl Responder {
//!     let claims = &session.id_token;
//! }
//! ```
//!
//! No role is required; handlers needing one call
//! [`AuthGuard::enforce_auth`] directly.

use crate::error::LtiError;
use crate::guard::AuthGuard;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use aspire_commons::Session;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

#[derive(Debug, Clone)]
pub struct LtiSession(pub Session);

impl LtiSession {
    pub fn into_inner(self) -> Session {
        self.0
    }
}

impl Deref for LtiSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<LtiSession> for Session {
    fn from(extractor: LtiSession) -> Self {
        extractor.0
    }
}

impl FromRequest for LtiSession {
    type Error = LtiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let guard = req.app_data::<web::Data<AuthGuard>>().ok_or_else(|| {
                log::error!("AuthGuard not configured. Register it as app data.");
                LtiError::AuthValidation {
                    status: 500,
                    message: "Session guard not configured".to_string(),
                }
            })?;

            let source = guard.source_from_request(&req, None);
            guard.enforce_auth(&source, &[]).await.map(LtiSession)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::{test, App, HttpResponse};
    use aspire_cache::{InMemoryCache, SessionCache};
    use aspire_commons::constants::{SESSION_COOKIE_NAME, SESSION_HEADER_NAME};
    use aspire_commons::{CustomClaimRoles, ErrorBody, IdToken};
    use std::sync::Arc;

    async fn whoami(session: LtiSession) -> HttpResponse {
        HttpResponse::Ok().body(session.session_id.clone())
    }

    async fn guard() -> AuthGuard {
        let cache: Arc<dyn SessionCache> = Arc::new(InMemoryCache::default());
        cache
            .create(Session::new("sess-1", IdToken::default(), "csrf", None).into())
            .await
            .unwrap();
        AuthGuard::new(cache, Arc::new(CustomClaimRoles::default()))
    }

    #[actix_web::test]
    async fn test_extracts_session_from_cookie_and_header() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(guard().await))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "sess-1"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "sess-1");

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((SESSION_HEADER_NAME, "sess-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_rejects_missing_and_unknown_sessions() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(guard().await))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 403);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error_type, "AuthValidationError");

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((SESSION_HEADER_NAME, "unknown"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_web::test]
    async fn test_missing_guard_is_server_error() {
        let app =
            test::init_service(App::new().route("/whoami", web::get().to(whoami))).await;
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((SESSION_HEADER_NAME, "sess-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 500);
    }
}
