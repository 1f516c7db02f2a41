use super::types::ServerConfig;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

impl ServerConfig {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate the result.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, apply environment overrides and
    /// validate the result.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let mut config: ServerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - ASPIRE_SERVER_HOST: Override server.host
    /// - ASPIRE_SERVER_PORT: Override server.port
    /// - ASPIRE_ENV: Override server.environment
    /// - ASPIRE_DOMAIN_NAME: Override server.domain_name
    /// - ASPIRE_LOG_LEVEL: Override logging.level
    /// - ASPIRE_LOG_TO_CONSOLE: Override logging.log_to_console
    ///
    /// Environment variables take precedence over config.toml values.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        use std::env;

        if let Ok(host) = env::var("ASPIRE_SERVER_HOST") {
            self.server.host = host;
        }

        if let Ok(port_str) = env::var("ASPIRE_SERVER_PORT") {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid ASPIRE_SERVER_PORT value: {}", port_str))?;
        }

        if let Ok(environment) = env::var("ASPIRE_ENV") {
            self.server.environment = environment;
        }

        if let Ok(domain) = env::var("ASPIRE_DOMAIN_NAME") {
            self.server.domain_name = domain;
        }

        if let Ok(level) = env::var("ASPIRE_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(val) = env::var("ASPIRE_LOG_TO_CONSOLE") {
            self.logging.log_to_console =
                val.eq_ignore_ascii_case("true") || val == "1" || val.eq_ignore_ascii_case("yes");
        }

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.server.domain_name.trim().is_empty() {
            return Err(anyhow::anyhow!("server.domain_name cannot be empty"));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !valid_levels.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    valid_levels.join(", ")
                ));
            }
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        if !self.tool.oidc_redirect_path.starts_with('/') {
            return Err(anyhow::anyhow!(
                "tool.oidc_redirect_path must start with '/': {}",
                self.tool.oidc_redirect_path
            ));
        }

        if self.cache.nonce_ttl_seconds == 0 {
            return Err(anyhow::anyhow!("cache.nonce_ttl_seconds cannot be 0"));
        }
        if self.cache.session_idle_seconds == 0 {
            return Err(anyhow::anyhow!("cache.session_idle_seconds cannot be 0"));
        }
        if self.cache.reaper_interval_seconds == 0 {
            return Err(anyhow::anyhow!("cache.reaper_interval_seconds cannot be 0"));
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(anyhow::anyhow!("session.cookie_name cannot be empty"));
        }
        if self.session.header_name.trim().is_empty() {
            return Err(anyhow::anyhow!("session.header_name cannot be empty"));
        }

        let valid_role_sources = ["custom", "lti"];
        if !valid_role_sources.contains(&self.session.role_source.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid session.role_source '{}'. Must be one of: {}",
                self.session.role_source,
                valid_role_sources.join(", ")
            ));
        }

        let cors = &self.security.cors;
        if cors.allow_credentials
            && (cors.allowed_origins.is_empty() || cors.allowed_origins.iter().any(|o| o == "*"))
        {
            return Err(anyhow::anyhow!(
                "security.cors.allow_credentials requires explicit allowed_origins"
            ));
        }

        self.validate_platforms()
    }

    fn validate_platforms(&self) -> anyhow::Result<()> {
        let mut client_ids = HashSet::new();

        for platform in &self.platforms {
            if platform.issuer.trim().is_empty() {
                return Err(anyhow::anyhow!("platform issuer cannot be empty"));
            }
            if platform.client_id.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "platform '{}' has an empty client_id",
                    platform.display_name()
                ));
            }
            if platform.auth_request_url.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "platform '{}' has an empty auth_request_url",
                    platform.display_name()
                ));
            }
            if platform.jwks_uri.is_none() && platform.public_key_path.is_none() {
                return Err(anyhow::anyhow!(
                    "platform '{}' needs either jwks_uri or public_key_path",
                    platform.display_name()
                ));
            }
            if !client_ids.insert(platform.client_id.as_str()) {
                return Err(anyhow::anyhow!(
                    "duplicate platform client_id '{}'",
                    platform.client_id
                ));
            }
        }

        Ok(())
    }
}
