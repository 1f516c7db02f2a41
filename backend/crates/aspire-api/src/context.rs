//! Tool-side settings the handlers need at request time.

use aspire_auth::helpers::CookieConfig;
use aspire_configs::{ServerConfig, SimulatorSettings};
use aspire_oidc::ToolSigner;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Session cookie attributes
    pub cookie: CookieConfig,
    /// Session idle window, also used as the cookie max-age
    pub session_idle_seconds: u64,
    /// Public base URL of the tool
    pub tool_domain: String,
    /// Tool public JWK served at `/lti/public_jwk`
    pub public_jwk: Option<Value>,
    pub title: String,
    pub description: String,
    /// Launch URL registered with platforms
    pub launch_uri: String,
    pub redirect_uri: String,
    /// Present only in a local environment
    pub simulator: Option<DevSimulator>,
}

/// Local launch simulator state.
#[derive(Debug, Clone)]
pub struct DevSimulator {
    pub client_id: String,
    pub login_hint: String,
    pub custom_claims: Map<String, Value>,
    /// Signs the simulated `id_token`; without it `/lti/dev/auth` is unavailable
    pub signer: Option<ToolSigner>,
}

impl DevSimulator {
    pub fn from_settings(settings: &SimulatorSettings) -> Self {
        let custom_claims = match serde_json::to_value(&settings.custom_claims) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self {
            client_id: settings.client_id.clone(),
            login_hint: settings.login_hint.clone(),
            custom_claims,
            signer: None,
        }
    }
}

impl ToolContext {
    /// `public_jwk` is loaded by the server from `tool.public_jwk_path`.
    pub fn from_config(config: &ServerConfig, public_jwk: Option<Value>) -> Self {
        let domain = &config.server.domain_name;
        Self {
            cookie: CookieConfig::from_settings(&config.session),
            session_idle_seconds: config.cache.session_idle_seconds,
            tool_domain: domain.clone(),
            public_jwk,
            title: config.tool.title.clone(),
            description: config.tool.description.clone(),
            launch_uri: config.tool.launch_uri(domain),
            redirect_uri: config.tool.redirect_uri(domain),
            simulator: config
                .server
                .is_local()
                .then(|| DevSimulator::from_settings(&config.simulator)),
        }
    }

    /// Attach the tool signing key to the simulator, if one is enabled.
    pub fn with_signer(mut self, signer: Option<ToolSigner>) -> Self {
        if let Some(simulator) = self.simulator.as_mut() {
            simulator.signer = signer;
        }
        self
    }

    /// Absolute URL of a tool endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.tool_domain.trim_end_matches('/'), path)
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_only_in_local_environment() {
        let mut config = ServerConfig::default();
        assert!(ToolContext::from_config(&config, None).simulator.is_none());

        config.server.environment = "local".to_string();
        config
            .simulator
            .custom_claims
            .insert("course_id".to_string(), toml::Value::Integer(101));
        let tool = ToolContext::from_config(&config, None);
        let simulator = tool.simulator.unwrap();
        assert_eq!(simulator.client_id, "aspire-dev");
        assert_eq!(simulator.custom_claims["course_id"], 101);
        assert!(simulator.signer.is_none());
    }

    #[test]
    fn test_urls() {
        let mut config = ServerConfig::default();
        config.server.domain_name = "https://tool.example.edu/".to_string();
        let tool = ToolContext::from_config(&config, None);
        assert_eq!(tool.url("/lti/oidc/init"), "https://tool.example.edu/lti/oidc/init");
        assert_eq!(tool.launch_uri, "https://tool.example.edu");
        assert_eq!(tool.redirect_uri, "https://tool.example.edu/lti/oidc/response");
    }
}
