//! LTI 1.3 third-party initiated login.
//!
//! ```text
//! platform ──login──▶ initiate() ──302──▶ platform auth endpoint
//!                          │ NonceRecord
//!                          ▼
//!                        cache
//!                          ▲ take_nonce
//! platform ──id_token──▶ complete() ──▶ Session ──▶ session id
//! ```
//!
//! Every step is single-shot: a failure is terminal and the browser has to
//! restart the launch from the platform.

use crate::error::LtiError;
use aspire_cache::SessionCache;
use aspire_commons::ids::{fingerprint, generate_session_id, generate_token};
use aspire_commons::{NonceRecord, Session, StorageTarget};
use aspire_oidc::{extract_audience_unverified, PlatformRegistry};
use std::fmt;
use std::sync::Arc;

/// Progress of one launch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    InitRequested,
    AuthResponsePending,
    SessionEstablished,
    Failed,
}

impl LaunchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchState::InitRequested => "init_requested",
            LaunchState::AuthResponsePending => "auth_response_pending",
            LaunchState::SessionEstablished => "session_established",
            LaunchState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LaunchState::SessionEstablished | LaunchState::Failed)
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a platform login initiation request.
#[derive(Debug, Clone)]
pub struct LoginInitiation {
    /// Platform issuer, when supplied; must match the registration
    pub issuer: Option<String>,
    pub client_id: String,
    pub target_link_uri: String,
    pub login_hint: String,
    /// Opaque platform value echoed back in the authentication request
    pub lti_message_hint: Option<String>,
    pub storage_target: StorageTarget,
}

/// Where to send the browser after `initiate`.
#[derive(Debug, Clone)]
pub struct AuthRedirect {
    pub url: String,
    pub state: LaunchState,
}

/// Result of a completed launch.
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    pub session_id: String,
    pub csrf_token: String,
    pub target_link_uri: String,
    pub storage_target: StorageTarget,
    /// Origin of the platform authorization endpoint
    pub platform_auth_domain: String,
}

pub struct LaunchHandshake {
    cache: Arc<dyn SessionCache>,
    platforms: Arc<PlatformRegistry>,
    redirect_uri: String,
}

impl LaunchHandshake {
    /// `redirect_uri` is the absolute URL platforms post the `id_token` to.
    pub fn new(
        cache: Arc<dyn SessionCache>,
        platforms: Arc<PlatformRegistry>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            platforms,
            redirect_uri: redirect_uri.into(),
        }
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn platforms(&self) -> &PlatformRegistry {
        &self.platforms
    }

    /// Start a launch: store a fresh nonce and build the authentication
    /// request for the platform.
    pub async fn initiate(&self, login: LoginInitiation) -> Result<AuthRedirect, LtiError> {
        let platform = self.platforms.get(&login.client_id).ok_or_else(|| {
            log::warn!("Login initiation for unregistered client_id {}", login.client_id);
            LtiError::ClientId(format!("Unknown client_id '{}'", login.client_id))
        })?;
        let config = platform.config();

        if let Some(issuer) = login.issuer.as_deref() {
            if issuer != config.issuer {
                return Err(LtiError::ClientId(format!(
                    "Issuer '{}' is not registered for client_id '{}'",
                    issuer, login.client_id
                )));
            }
        }

        let nonce = generate_token();
        let state = generate_token();
        log::debug!(
            "Launch {}: {} ({})",
            fingerprint(&nonce),
            LaunchState::InitRequested,
            config.name
        );

        self.cache
            .create(
                NonceRecord::new(
                    nonce.as_str(),
                    state.as_str(),
                    login.client_id.as_str(),
                    login.target_link_uri,
                    login.storage_target,
                )
                .into(),
            )
            .await?;

        let mut params = vec![
            ("response_type", "id_token"),
            ("response_mode", "form_post"),
            ("client_id", login.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("nonce", nonce.as_str()),
            ("state", state.as_str()),
            ("scope", "openid"),
            ("login_hint", login.login_hint.as_str()),
            ("prompt", "none"),
        ];
        if let Some(hint) = login.lti_message_hint.as_deref() {
            params.push(("lti_message_hint", hint));
        }

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| LtiError::ClientId(format!("Invalid login parameters: {}", e)))?;
        let separator = if config.auth_request_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}{}", config.auth_request_url, separator, query);

        log::debug!(
            "Launch {}: {}",
            fingerprint(&nonce),
            LaunchState::AuthResponsePending
        );

        Ok(AuthRedirect {
            url,
            state: LaunchState::AuthResponsePending,
        })
    }

    /// Finish a launch from the platform's authentication response.
    pub async fn complete(&self, id_token: &str, state: &str) -> Result<LaunchOutcome, LtiError> {
        let result = self.complete_launch(id_token, state).await;
        if let Err(e) = &result {
            log::debug!(
                "Launch with state {}: {} ({})",
                fingerprint(state),
                LaunchState::Failed,
                e.error_type()
            );
        }
        result
    }

    async fn complete_launch(&self, id_token: &str, state: &str) -> Result<LaunchOutcome, LtiError> {
        // Routing only: the selected validator verifies the audience again
        let audiences = extract_audience_unverified(id_token)?;
        let platform = self.platforms.find_by_audience(&audiences).ok_or_else(|| {
            LtiError::TokenValidation("Token audience is not a registered client_id".into())
        })?;

        let claims = platform.validate(id_token).await?;
        let nonce = claims
            .nonce()
            .ok_or_else(|| LtiError::TokenValidation("Missing 'nonce' claim".into()))?;

        let record = self.cache.take_nonce(nonce).await.ok_or_else(|| {
            LtiError::NonceValidation("Nonce not found, expired or already used".into())
        })?;

        if record.state != state {
            return Err(LtiError::StateValidation(
                "State does not match the login request".into(),
            ));
        }

        let client_id = platform.config().client_id.clone();
        if record.client_id != client_id || !claims.has_audience(&record.client_id) {
            return Err(LtiError::TokenValidation(
                "Token audience does not match the initiating client".into(),
            ));
        }

        let session_id = generate_session_id();
        let csrf_token = generate_token();
        self.cache
            .create(Session::new(session_id.as_str(), claims, csrf_token.as_str(), Some(client_id)).into())
            .await?;

        log::debug!(
            "Launch {}: {} (session {})",
            fingerprint(&record.nonce),
            LaunchState::SessionEstablished,
            fingerprint(&session_id)
        );

        Ok(LaunchOutcome {
            session_id,
            csrf_token,
            target_link_uri: record.target_link_uri,
            storage_target: record.storage_target,
            platform_auth_domain: platform.config().auth_domain().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspire_cache::{InMemoryCache, StoreKind};
    use aspire_oidc::{PlatformConfig, PlatformValidator, StaticKeySource};
    use std::collections::HashMap;

    const PLATFORM_PUBLIC_PEM: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../testdata/platform_public.pem"
    ));

    fn handshake() -> (LaunchHandshake, Arc<dyn SessionCache>) {
        let cache: Arc<dyn SessionCache> = Arc::new(InMemoryCache::default());
        let mut registry = PlatformRegistry::new();
        registry.register(PlatformValidator::new(
            PlatformConfig::new(
                "https://lms.example.edu",
                "client-1",
                "https://lms.example.edu/api/lti/authorize",
                None,
            ),
            Arc::new(StaticKeySource::from_rsa_pem(PLATFORM_PUBLIC_PEM.as_bytes()).unwrap()),
        ));
        let handshake = LaunchHandshake::new(
            Arc::clone(&cache),
            Arc::new(registry),
            "https://tool.example.edu/lti/oidc/response",
        );
        (handshake, cache)
    }

    fn login(client_id: &str) -> LoginInitiation {
        LoginInitiation {
            issuer: Some("https://lms.example.edu".to_string()),
            client_id: client_id.to_string(),
            target_link_uri: "https://tool.example.edu/launch".to_string(),
            login_hint: "hint-42".to_string(),
            lti_message_hint: None,
            storage_target: StorageTarget::Cookie,
        }
    }

    fn query(url: &str) -> HashMap<String, String> {
        let (_, query) = url.split_once('?').unwrap();
        serde_urlencoded::from_str(query).unwrap()
    }

    #[tokio::test]
    async fn test_initiate_builds_auth_request() {
        let (handshake, cache) = handshake();
        let redirect = handshake.initiate(login("client-1")).await.unwrap();

        assert!(redirect
            .url
            .starts_with("https://lms.example.edu/api/lti/authorize?"));
        assert_eq!(redirect.state, LaunchState::AuthResponsePending);

        let params = query(&redirect.url);
        assert_eq!(params["response_type"], "id_token");
        assert_eq!(params["response_mode"], "form_post");
        assert_eq!(params["client_id"], "client-1");
        assert_eq!(
            params["redirect_uri"],
            "https://tool.example.edu/lti/oidc/response"
        );
        assert_eq!(params["scope"], "openid");
        assert_eq!(params["login_hint"], "hint-42");
        assert_eq!(params["prompt"], "none");
        assert!(!params.contains_key("lti_message_hint"));

        let record = cache.take_nonce(&params["nonce"]).await.unwrap();
        assert_eq!(record.state, params["state"]);
        assert_eq!(record.client_id, "client-1");
        assert_eq!(record.target_link_uri, "https://tool.example.edu/launch");
    }

    #[tokio::test]
    async fn test_initiate_echoes_message_hint() {
        let (handshake, _) = handshake();
        let mut login = login("client-1");
        login.lti_message_hint = Some("msg hint".to_string());
        let redirect = handshake.initiate(login).await.unwrap();
        assert_eq!(query(&redirect.url)["lti_message_hint"], "msg hint");
    }

    #[tokio::test]
    async fn test_initiate_unknown_client() {
        let (handshake, cache) = handshake();
        let err = handshake.initiate(login("client-x")).await.unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.error_type(), "ClientIdError");
        assert_eq!(cache.entry_count(StoreKind::Nonce), 0);
    }

    #[tokio::test]
    async fn test_initiate_issuer_mismatch() {
        let (handshake, _) = handshake();
        let mut login = login("client-1");
        login.issuer = Some("https://other.example.edu".to_string());
        let err = handshake.initiate(login).await.unwrap_err();
        assert_eq!(err.error_type(), "ClientIdError");
    }

    #[tokio::test]
    async fn test_each_initiation_gets_fresh_secrets() {
        let (handshake, _) = handshake();
        let a = query(&handshake.initiate(login("client-1")).await.unwrap().url);
        let b = query(&handshake.initiate(login("client-1")).await.unwrap().url);
        assert_ne!(a["nonce"], b["nonce"]);
        assert_ne!(a["state"], b["state"]);
        assert_ne!(a["nonce"], a["state"]);
    }

    #[tokio::test]
    async fn test_complete_rejects_garbage_token() {
        let (handshake, _) = handshake();
        let err = handshake.complete("not.a.token", "state").await.unwrap_err();
        assert_eq!(err.error_type(), "TokenValidationError");
        assert_eq!(err.status(), 401);
    }

    #[test]
    fn test_launch_state_terminal() {
        assert!(!LaunchState::InitRequested.is_terminal());
        assert!(!LaunchState::AuthResponsePending.is_terminal());
        assert!(LaunchState::SessionEstablished.is_terminal());
        assert!(LaunchState::Failed.is_terminal());
        assert_eq!(LaunchState::Failed.to_string(), "failed");
    }
}
