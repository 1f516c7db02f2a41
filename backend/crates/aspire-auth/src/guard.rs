//! Session resolution and role enforcement for protected endpoints.

use crate::error::LtiError;
use crate::helpers::cookie::extract_session_cookie;
use actix_web::HttpRequest;
use aspire_cache::SessionCache;
use aspire_commons::constants::{SESSION_COOKIE_NAME, SESSION_HEADER_NAME};
use aspire_commons::ids::fingerprint;
use aspire_commons::{RoleProvider, Session};
use std::sync::Arc;

/// Candidate places a session id can come from, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdSource {
    /// Passed explicitly by the handler (e.g. a form field)
    pub explicit: Option<String>,
    /// Value of the session cookie
    pub cookie: Option<String>,
    /// Value of the session header
    pub header: Option<String>,
}

impl SessionIdSource {
    pub fn explicit(session_id: impl Into<String>) -> Self {
        Self {
            explicit: Some(session_id.into()),
            ..Default::default()
        }
    }

    /// First non-empty identifier: explicit, then cookie, then header.
    pub fn resolve(&self) -> Option<&str> {
        [&self.explicit, &self.cookie, &self.header]
            .into_iter()
            .filter_map(|candidate| candidate.as_deref())
            .find(|value| !value.is_empty())
    }
}

/// Resolves the caller's session and optionally checks its roles.
pub struct AuthGuard {
    cache: Arc<dyn SessionCache>,
    role_provider: Arc<dyn RoleProvider>,
    cookie_name: String,
    header_name: String,
}

impl AuthGuard {
    pub fn new(cache: Arc<dyn SessionCache>, role_provider: Arc<dyn RoleProvider>) -> Self {
        Self {
            cache,
            role_provider,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            header_name: SESSION_HEADER_NAME.to_string(),
        }
    }

    /// Override the cookie and header names the session id is read from.
    pub fn with_transport(
        mut self,
        cookie_name: impl Into<String>,
        header_name: impl Into<String>,
    ) -> Self {
        self.cookie_name = cookie_name.into();
        self.header_name = header_name.into();
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn role_provider(&self) -> &dyn RoleProvider {
        self.role_provider.as_ref()
    }

    pub fn cache(&self) -> &Arc<dyn SessionCache> {
        &self.cache
    }

    /// Collect the session id candidates carried by a request.
    pub fn source_from_request(&self, req: &HttpRequest, explicit: Option<String>) -> SessionIdSource {
        SessionIdSource {
            explicit,
            cookie: extract_session_cookie(req, &self.cookie_name),
            header: req
                .headers()
                .get(self.header_name.as_str())
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        }
    }

    /// Resolve the session behind `source`.
    ///
    /// - no identifier: 403
    /// - unknown or expired session: 401
    /// - `accepted_roles` non-empty and disjoint from the session roles: 403
    pub async fn enforce_auth(
        &self,
        source: &SessionIdSource,
        accepted_roles: &[&str],
    ) -> Result<Session, LtiError> {
        let session_id = source
            .resolve()
            .ok_or_else(|| LtiError::forbidden("Missing session id"))?;

        let session = self.cache.get_session(session_id).await.ok_or_else(|| {
            log::debug!("No live session for {}", fingerprint(session_id));
            LtiError::unauthorized("Invalid or expired session")
        })?;

        if !accepted_roles.is_empty() {
            let roles = session.roles(self.role_provider.as_ref());
            if !accepted_roles.iter().any(|role| roles.contains(*role)) {
                log::debug!(
                    "Session {} lacks any of the roles {:?}",
                    fingerprint(session_id),
                    accepted_roles
                );
                return Err(LtiError::forbidden("Insufficient Permissions"));
            }
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use aspire_cache::InMemoryCache;
    use aspire_commons::constants::LTI_CUSTOM_CLAIM;
    use aspire_commons::{CustomClaimRoles, IdToken};
    use serde_json::{json, Value};

    fn claims(roles: &str) -> IdToken {
        match json!({ LTI_CUSTOM_CLAIM: { "roles": roles } }) {
            Value::Object(map) => IdToken::new(map),
            _ => unreachable!(),
        }
    }

    async fn guard_with_session(session_id: &str, roles: &str) -> AuthGuard {
        let cache: Arc<dyn SessionCache> = Arc::new(InMemoryCache::default());
        cache
            .create(Session::new(session_id, claims(roles), "csrf", None).into())
            .await
            .unwrap();
        AuthGuard::new(cache, Arc::new(CustomClaimRoles::default()))
    }

    #[test]
    fn test_source_priority() {
        let source = SessionIdSource {
            explicit: Some("a".into()),
            cookie: Some("b".into()),
            header: Some("c".into()),
        };
        assert_eq!(source.resolve(), Some("a"));

        let source = SessionIdSource {
            explicit: Some(String::new()),
            cookie: None,
            header: Some("c".into()),
        };
        assert_eq!(source.resolve(), Some("c"));

        assert_eq!(SessionIdSource::default().resolve(), None);
    }

    #[tokio::test]
    async fn test_missing_identifier_is_forbidden() {
        let guard = guard_with_session("s1", "Student").await;
        let err = guard
            .enforce_auth(&SessionIdSource::default(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.status(), 403);
        assert_eq!(err.error_type(), "AuthValidationError");
    }

    #[tokio::test]
    async fn test_unknown_session_is_unauthorized() {
        let guard = guard_with_session("s1", "Student").await;
        let err = guard
            .enforce_auth(&SessionIdSource::explicit("nope"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.status(), 401);
    }

    #[tokio::test]
    async fn test_role_requirement() {
        let guard = guard_with_session("s1", "Student").await;
        let source = SessionIdSource::explicit("s1");

        let err = guard.enforce_auth(&source, &["Teacher"]).await.unwrap_err();
        assert_eq!(err.status(), 403);
        assert_eq!(err.to_string(), "Insufficient Permissions");

        let session = guard
            .enforce_auth(&source, &["Teacher", "Student"])
            .await
            .unwrap();
        assert_eq!(session.session_id, "s1");

        assert!(guard.enforce_auth(&source, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_source_from_request() {
        let guard = guard_with_session("s1", "Student").await;

        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "from-cookie"))
            .insert_header((SESSION_HEADER_NAME, "from-header"))
            .to_http_request();
        let source = guard.source_from_request(&req, None);
        assert_eq!(source.resolve(), Some("from-cookie"));

        let req = TestRequest::default()
            .insert_header((SESSION_HEADER_NAME, "s1"))
            .to_http_request();
        let source = guard.source_from_request(&req, None);
        assert!(guard.enforce_auth(&source, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_custom_transport_names() {
        let guard = guard_with_session("s1", "Student")
            .await
            .with_transport("my-cookie", "x-my-session");

        let req = TestRequest::default()
            .insert_header(("x-my-session", "s1"))
            .to_http_request();
        let source = guard.source_from_request(&req, None);
        assert_eq!(source.header.as_deref(), Some("s1"));

        let req = TestRequest::default()
            .insert_header((SESSION_HEADER_NAME, "s1"))
            .to_http_request();
        assert_eq!(guard.source_from_request(&req, None).resolve(), None);
    }
}
