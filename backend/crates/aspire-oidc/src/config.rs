use aspire_configs::PlatformSettings;

/// Registration of one LMS platform with this tool.
///
/// Built from [`PlatformSettings`] at startup. The `client_id` is the key the
/// gateway uses to select a registration, both at login initiation and when
/// an `id_token` arrives.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Human-readable name used in logs
    pub name: String,

    /// Expected `iss` claim
    pub issuer: String,

    /// Client id issued to this tool by the platform; expected in `aud`
    pub client_id: String,

    /// Platform OIDC authorization endpoint
    pub auth_request_url: String,

    /// Platform JWKS endpoint, if keys are fetched over HTTP
    pub jwks_uri: Option<String>,

    /// Clock skew tolerated on `exp` and `iat`, in seconds
    pub leeway_seconds: u64,
}

impl PlatformConfig {
    pub fn new(
        issuer: impl Into<String>,
        client_id: impl Into<String>,
        auth_request_url: impl Into<String>,
        jwks_uri: Option<String>,
    ) -> Self {
        let issuer = issuer.into();
        Self {
            name: issuer.clone(),
            issuer,
            client_id: client_id.into(),
            auth_request_url: auth_request_url.into(),
            jwks_uri,
            leeway_seconds: 60,
        }
    }

    pub fn with_leeway(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    /// Origin (`scheme://host[:port]`) of the authorization endpoint.
    ///
    /// The launch frame uses it as the `postMessage` target when the
    /// platform stores the session id instead of a cookie.
    pub fn auth_domain(&self) -> &str {
        let url = self.auth_request_url.as_str();
        let host_start = url.find("://").map(|i| i + 3).unwrap_or(0);
        match url[host_start..].find('/') {
            Some(path_start) => &url[..host_start + path_start],
            None => url,
        }
    }
}

impl From<&PlatformSettings> for PlatformConfig {
    fn from(settings: &PlatformSettings) -> Self {
        Self {
            name: settings.display_name().to_string(),
            issuer: settings.issuer.clone(),
            client_id: settings.client_id.clone(),
            auth_request_url: settings.auth_request_url.clone(),
            jwks_uri: settings.jwks_uri.clone(),
            leeway_seconds: settings.leeway_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_domain() {
        let config = PlatformConfig::new(
            "https://canvas.instructure.com",
            "10000000000001",
            "https://sso.canvaslms.com/api/lti/authorize_redirect",
            None,
        );
        assert_eq!(config.auth_domain(), "https://sso.canvaslms.com");

        let config = PlatformConfig::new("iss", "c", "http://localhost:3000", None);
        assert_eq!(config.auth_domain(), "http://localhost:3000");
    }

    #[test]
    fn test_from_settings() {
        let settings = PlatformSettings {
            name: None,
            issuer: "https://lms.example.edu".to_string(),
            client_id: "client-1".to_string(),
            auth_request_url: "https://lms.example.edu/auth".to_string(),
            jwks_uri: Some("https://lms.example.edu/jwks".to_string()),
            public_key_path: None,
            leeway_seconds: 30,
        };
        let config = PlatformConfig::from(&settings);
        assert_eq!(config.name, "https://lms.example.edu");
        assert_eq!(config.leeway_seconds, 30);
        assert_eq!(config.jwks_uri.as_deref(), Some("https://lms.example.edu/jwks"));
    }
}
