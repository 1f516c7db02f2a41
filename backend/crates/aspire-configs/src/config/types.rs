use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub tool: ToolSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub security: SecuritySettings,
    #[serde(default)]
    pub simulator: SimulatorSettings,
    /// Registered LMS platforms, one entry per `client_id`
    #[serde(default, alias = "platform")]
    pub platforms: Vec<PlatformSettings>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Deployment environment ("production", "staging", "local")
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Public base URL of the tool, e.g. "https://aspire.example.edu".
    /// Prefixed to the OIDC redirect path sent to platforms.
    #[serde(default = "default_domain_name")]
    pub domain_name: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            environment: default_environment(),
            domain_name: default_domain_name(),
        }
    }
}

impl ServerSettings {
    pub fn is_local(&self) -> bool {
        self.environment.eq_ignore_ascii_case("local")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides
    /// [logging.targets]
    /// aspire_auth = "debug"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// Tool-side launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Path the platform posts the `id_token` to
    #[serde(default = "default_oidc_redirect_path")]
    pub oidc_redirect_path: String,
    /// JSON document holding the tool's public JWK, served at /lti/public_jwk
    #[serde(default)]
    pub public_jwk_path: Option<String>,
    /// RSA private key (PEM) matching the public JWK; signs tool-issued tokens
    #[serde(default)]
    pub private_key_path: Option<String>,
    /// `kid` put on tool-signed tokens; falls back to the public JWK's `kid`
    #[serde(default)]
    pub key_id: Option<String>,
    /// Developer key title shown by the platform
    #[serde(default = "default_tool_title")]
    pub title: String,
    #[serde(default = "default_tool_description")]
    pub description: String,
    /// Launch URL registered with platforms (default: the tool domain)
    #[serde(default)]
    pub target_link_uri: Option<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            oidc_redirect_path: default_oidc_redirect_path(),
            public_jwk_path: None,
            private_key_path: None,
            key_id: None,
            title: default_tool_title(),
            description: default_tool_description(),
            target_link_uri: None,
        }
    }
}

impl ToolSettings {
    /// Launch URL registered with platforms.
    pub fn launch_uri(&self, domain_name: &str) -> String {
        self.target_link_uri
            .clone()
            .unwrap_or_else(|| domain_name.trim_end_matches('/').to_string())
    }

    /// Absolute redirect URI registered with platforms.
    pub fn redirect_uri(&self, domain_name: &str) -> String {
        format!(
            "{}{}",
            domain_name.trim_end_matches('/'),
            self.oidc_redirect_path
        )
    }
}

/// Nonce and session cache lifetimes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Time-to-live of an unconsumed launch nonce
    #[serde(default = "default_nonce_ttl_seconds")]
    pub nonce_ttl_seconds: u64,
    /// Idle window after which a session expires
    #[serde(default = "default_session_idle_seconds")]
    pub session_idle_seconds: u64,
    /// How often the background reaper purges expired entries
    #[serde(default = "default_reaper_interval_seconds")]
    pub reaper_interval_seconds: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            nonce_ttl_seconds: default_nonce_ttl_seconds(),
            session_idle_seconds: default_session_idle_seconds(),
            reaper_interval_seconds: default_reaper_interval_seconds(),
        }
    }
}

/// Session transport and role derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Header carrying the session id when third-party cookies are blocked
    #[serde(default = "default_header_name")]
    pub header_name: String,
    /// Whether the session cookie requires HTTPS (default: true)
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// "custom" (comma-delimited custom claim) or "lti" (standard roles claim)
    #[serde(default = "default_role_source")]
    pub role_source: String,
    /// Key inside the custom-claims map when `role_source = "custom"`
    #[serde(default = "default_roles_claim_key")]
    pub roles_claim_key: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            header_name: default_header_name(),
            cookie_secure: true,
            role_source: default_role_source(),
            roles_claim_key: default_roles_claim_key(),
        }
    }
}

/// Security settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default)]
    pub cors: CorsSettings,
}

/// Local launch simulator, served under /lti/dev only when
/// `server.environment = "local"`.
///
/// The simulated platform must be registered in `[[platforms]]` with the
/// tool domain as issuer, `<domain>/lti/dev/auth` as auth request URL and
/// the tool's public key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorSettings {
    #[serde(default = "default_simulator_client_id")]
    pub client_id: String,
    #[serde(default = "default_simulator_login_hint")]
    pub login_hint: String,
    /// Default custom claims of simulated launches
    /// [simulator.custom_claims]
    /// roles = "TeacherEnrollment"
    #[serde(default)]
    pub custom_claims: toml::Table,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            client_id: default_simulator_client_id(),
            login_hint: default_simulator_login_hint(),
            custom_claims: toml::Table::new(),
        }
    }
}

/// CORS configuration that maps directly to actix-cors options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty list or ["*"] = any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,
    /// Headers readable by the browser. Must include the session header
    /// so clients without cookies can read it.
    #[serde(default = "default_cors_expose_headers")]
    pub expose_headers: Vec<String>,
    /// Credentialed requests; requires explicit `allowed_origins`
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            expose_headers: default_cors_expose_headers(),
            allow_credentials: false,
            max_age: default_cors_max_age(),
        }
    }
}

/// One registered LMS platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSettings {
    /// Display name used in logs
    #[serde(default)]
    pub name: Option<String>,
    /// Expected `iss` claim, e.g. "https://canvas.instructure.com"
    pub issuer: String,
    /// Client id issued by the platform; expected `aud` claim
    pub client_id: String,
    /// Platform OIDC authorization endpoint
    pub auth_request_url: String,
    /// Platform JWKS endpoint (keys fetched and cached on demand)
    #[serde(default)]
    pub jwks_uri: Option<String>,
    /// Pre-provisioned platform public key (PEM) used instead of the JWKS
    #[serde(default)]
    pub public_key_path: Option<String>,
    /// Clock skew tolerated on `exp`/`iat`
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: u64,
}

impl PlatformSettings {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.issuer)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server: ServerSettings::default(),
            logging: LoggingSettings::default(),
            tool: ToolSettings::default(),
            cache: CacheSettings::default(),
            session: SessionSettings::default(),
            security: SecuritySettings::default(),
            simulator: SimulatorSettings::default(),
            platforms: Vec::new(),
        }
    }
}
