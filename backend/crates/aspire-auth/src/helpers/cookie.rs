// Cookie handling for the HttpOnly session cookie
//
// The launch endpoint sets the session id as a cookie when the platform
// frame supports third-party cookies; logout expires it again.

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use aspire_commons::constants::SESSION_COOKIE_NAME;
use aspire_configs::SessionSettings;

/// Configuration for the session cookie
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Cookie name (default: "lti-session-id")
    pub name: String,
    /// Whether to set the Secure flag (should be true in production/HTTPS)
    pub secure: bool,
    /// Cookie path (default: "/")
    pub path: String,
    /// SameSite policy
    pub same_site: SameSite,
    /// Domain (None = current domain)
    pub domain: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_string(),
            secure: true,
            path: "/".to_string(),
            same_site: SameSite::Strict,
            domain: None,
        }
    }
}

impl CookieConfig {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            name: settings.cookie_name.clone(),
            secure: settings.cookie_secure,
            ..Default::default()
        }
    }
}

/// Create the HttpOnly session cookie.
///
/// `max_age_seconds` should match the session idle window so the browser
/// drops the cookie no earlier than the server drops the session.
pub fn create_session_cookie<'a>(
    session_id: &str,
    max_age_seconds: u64,
    config: &CookieConfig,
) -> Cookie<'a> {
    let max_age = Duration::seconds(i64::try_from(max_age_seconds).unwrap_or(i64::MAX));

    let mut cookie = Cookie::build(config.name.clone(), session_id.to_string())
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .max_age(max_age)
        .finish();

    if let Some(ref domain) = config.domain {
        cookie.set_domain(domain.clone());
    }

    cookie
}

/// Create a cookie that clears the session cookie.
pub fn create_logout_cookie<'a>(config: &CookieConfig) -> Cookie<'a> {
    let mut cookie = Cookie::build(config.name.clone(), "")
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .finish();

    if let Some(ref domain) = config.domain {
        cookie.set_domain(domain.clone());
    }

    cookie
}

/// Read a non-empty session cookie from the request.
pub fn extract_session_cookie(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_create_session_cookie() {
        let config = CookieConfig::default();
        let cookie = create_session_cookie("abc123", 28_800, &config);

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "abc123");
        assert!(cookie.http_only().unwrap_or(false));
        assert!(cookie.secure().unwrap_or(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(28_800)));
    }

    #[test]
    fn test_create_logout_cookie() {
        let config = CookieConfig::default();
        let cookie = create_logout_cookie(&config);

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = SessionSettings {
            cookie_name: "custom-session".to_string(),
            cookie_secure: false,
            ..Default::default()
        };
        let config = CookieConfig::from_settings(&settings);
        let cookie = create_session_cookie("id", 60, &config);
        assert_eq!(cookie.name(), "custom-session");
        assert!(!cookie.secure().unwrap_or(true));
    }

    #[test]
    fn test_extract_session_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "sess-1"))
            .to_http_request();
        assert_eq!(
            extract_session_cookie(&req, SESSION_COOKIE_NAME).as_deref(),
            Some("sess-1")
        );
        assert!(extract_session_cookie(&req, "other").is_none());

        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ""))
            .to_http_request();
        assert!(extract_session_cookie(&req, SESSION_COOKIE_NAME).is_none());
    }
}
