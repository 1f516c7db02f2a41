//! Server lifecycle management helpers.
//!
//! Bootstraps the session cache, platform registry and launch services,
//! wires the HTTP server, and coordinates graceful shutdown.

use crate::middleware;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use aspire_api::{configure_routes, ToolContext};
use aspire_auth::{AuthGuard, LaunchHandshake};
use aspire_cache::{spawn_reaper, InMemoryCache, SessionCache};
use aspire_commons::{CustomClaimRoles, LtiRolesClaim, RoleProvider};
use aspire_configs::{ServerConfig, SessionSettings};
use aspire_oidc::{PlatformRegistry, ToolSigner};
use log::{debug, info, warn};
use serde_json::Value;
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Shared state registered as `web::Data` on every worker.
#[derive(Clone)]
pub struct AppState {
    pub handshake: web::Data<LaunchHandshake>,
    pub guard: web::Data<AuthGuard>,
    pub tool: web::Data<ToolContext>,
}

impl AppState {
    /// Register shared state and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.handshake.clone())
            .app_data(self.guard.clone())
            .app_data(self.tool.clone());
        configure_routes(cfg);
    }
}

/// Aggregated application components that need to be shared across the
/// HTTP server and shutdown handling.
pub struct ApplicationComponents {
    pub cache: Arc<dyn SessionCache>,
    pub state: AppState,
    pub reaper: JoinHandle<()>,
}

/// Role provider selected by `session.role_source`.
pub fn role_provider(settings: &SessionSettings) -> Arc<dyn RoleProvider> {
    match settings.role_source.as_str() {
        "lti" => Arc::new(LtiRolesClaim),
        _ => Arc::new(CustomClaimRoles::new(settings.roles_claim_key.clone())),
    }
}

/// Read the tool's public JWK document, if one is configured.
pub fn load_public_jwk(path: Option<&str>) -> Result<Option<Value>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read tool public JWK from {}", path))?;
    let jwk: Value = serde_json::from_str(&content)
        .with_context(|| format!("Tool public JWK at {} is not valid JSON", path))?;
    Ok(Some(jwk))
}

/// Load the tool signing key, if one is configured.
///
/// The `kid` comes from `tool.key_id`, then from the public JWK document.
pub fn load_tool_signer(
    config: &ServerConfig,
    public_jwk: Option<&Value>,
) -> Result<Option<ToolSigner>> {
    let Some(path) = config.tool.private_key_path.as_deref() else {
        return Ok(None);
    };
    let key_id = config.tool.key_id.clone().or_else(|| {
        public_jwk
            .and_then(|jwk| jwk.get("kid"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    let issuer = config.server.domain_name.trim_end_matches('/');
    let signer = ToolSigner::from_pem_file(path, key_id, issuer)
        .with_context(|| format!("Failed to load tool signing key from {}", path))?;
    Ok(Some(signer))
}

/// Build the cache, reaper, platform registry, handshake and guard.
///
/// Must run inside a Tokio runtime: the reaper is spawned here.
pub async fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let phase_start = std::time::Instant::now();

    let cache: Arc<dyn SessionCache> = Arc::new(InMemoryCache::new(&config.cache));
    let reaper = spawn_reaper(
        Arc::clone(&cache),
        Duration::from_secs(config.cache.reaper_interval_seconds),
    );
    info!(
        "Session cache ready (nonce ttl {}s, session idle {}s)",
        config.cache.nonce_ttl_seconds, config.cache.session_idle_seconds
    );

    let registry = PlatformRegistry::from_settings(&config.platforms)
        .context("Failed to register platforms")?;
    if registry.is_empty() {
        warn!("No platforms are registered; every launch will be rejected");
    }

    let redirect_uri = config.tool.redirect_uri(&config.server.domain_name);
    debug!("OIDC redirect URI: {}", redirect_uri);

    let handshake = LaunchHandshake::new(Arc::clone(&cache), Arc::new(registry), redirect_uri);
    let guard = AuthGuard::new(Arc::clone(&cache), role_provider(&config.session))
        .with_transport(
            config.session.cookie_name.clone(),
            config.session.header_name.clone(),
        );
    let public_jwk = load_public_jwk(config.tool.public_jwk_path.as_deref())?;
    let signer = load_tool_signer(config, public_jwk.as_ref())?;
    let tool = ToolContext::from_config(config, public_jwk).with_signer(signer);
    if let Some(simulator) = tool.simulator.as_ref() {
        warn!(
            "Launch simulator enabled at /lti/dev for client {} (signing key {})",
            simulator.client_id,
            if simulator.signer.is_some() { "loaded" } else { "missing" }
        );
    }

    info!(
        "Launch services initialized ({:.2}ms)",
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ApplicationComponents {
        cache,
        state: AppState {
            handshake: web::Data::new(handshake),
            guard: web::Data::new(guard),
            tool: web::Data::new(tool),
        },
        reaper,
    })
}

fn worker_count(config: &ServerConfig) -> usize {
    if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    }
}

/// Start the HTTP server and run until SIGINT/SIGTERM.
///
/// Actix handles the signals and drains in-flight requests; the reaper is
/// stopped afterwards.
pub async fn run(config: &ServerConfig, components: ApplicationComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);
    debug!("Endpoints: /lti/oidc/init, /lti/oidc/response, /lti/launch, /lti/session, /lti/developer_key");

    let state = components.state.clone();
    let cors_config = config.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::build_cors_from_config(&cors_config))
            .wrap(middleware::request_logger())
            .configure(|cfg| state.configure(cfg))
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .workers(worker_count(config))
    .shutdown_timeout(30)
    .run();

    info!("Server started on {} ({} workers)", bind_addr, worker_count(config));
    server.await?;

    info!("Stopping cache reaper...");
    components.reaper.abort();
    debug!(
        "Dropping {} live sessions",
        components.cache.entry_count(aspire_cache::StoreKind::Session)
    );

    info!("Server shutdown complete");
    Ok(())
}

/// A running HTTP server instance intended for integration tests.
///
/// Uses the same middleware stack and route wiring as the production server
/// but binds to an ephemeral port and provides an explicit shutdown handle.
pub struct RunningTestHttpServer {
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub cache: Arc<dyn SessionCache>,
    server_handle: actix_web::dev::ServerHandle,
    server_task: JoinHandle<std::io::Result<()>>,
    reaper: JoinHandle<()>,
}

impl RunningTestHttpServer {
    pub async fn shutdown(self) {
        self.server_handle.stop(false).await;
        let _ = self.server_task.await;
        self.reaper.abort();
    }
}

/// Start the HTTP server for integration tests on a random available port.
///
/// Does not install signal handling; the caller must invoke `shutdown()`.
pub async fn run_for_tests(
    config: &ServerConfig,
    components: ApplicationComponents,
) -> Result<RunningTestHttpServer> {
    let bind_ip = if config.server.host.is_empty() {
        "127.0.0.1"
    } else {
        config.server.host.as_str()
    };

    let listener = TcpListener::bind((bind_ip, 0))?;
    let bind_addr = listener.local_addr()?;

    let state = components.state.clone();
    let cors_config = config.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::build_cors_from_config(&cors_config))
            .wrap(middleware::request_logger())
            .configure(|cfg| state.configure(cfg))
    })
    .listen(listener)?
    .workers(1)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    Ok(RunningTestHttpServer {
        base_url: format!("http://{}", bind_addr),
        bind_addr,
        cache: components.cache,
        server_handle,
        server_task,
        reaper: components.reaper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspire_commons::constants::{LTI_CUSTOM_CLAIM, LTI_ROLES_CLAIM};
    use aspire_commons::IdToken;
    use serde_json::json;
    use std::io::Write;

    fn token(value: Value) -> IdToken {
        match value {
            Value::Object(map) => IdToken::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_role_provider_selection() {
        let claims = token(json!({
            LTI_CUSTOM_CLAIM: { "canvas_roles": "TeacherEnrollment" },
            LTI_ROLES_CLAIM: ["http://purl.imsglobal.org/vocab/lis/v2/membership#Learner"]
        }));

        let settings = SessionSettings {
            roles_claim_key: "canvas_roles".to_string(),
            ..SessionSettings::default()
        };
        assert!(role_provider(&settings).roles(&claims).contains("TeacherEnrollment"));

        let settings = SessionSettings {
            role_source: "lti".to_string(),
            ..SessionSettings::default()
        };
        assert!(role_provider(&settings).roles(&claims).contains("Learner"));
    }

    #[test]
    fn test_load_tool_signer() {
        let mut config = ServerConfig::default();
        assert!(load_tool_signer(&config, None).unwrap().is_none());

        config.tool.private_key_path = Some(format!(
            "{}/testdata/platform_private.pem",
            env!("CARGO_MANIFEST_DIR")
        ));
        let jwk = json!({ "kty": "RSA", "kid": "tool-key-1" });
        let signer = load_tool_signer(&config, Some(&jwk)).unwrap().unwrap();
        assert_eq!(signer.key_id(), Some("tool-key-1"));
        assert_eq!(signer.issuer(), "http://127.0.0.1:8080");

        config.tool.key_id = Some("configured".to_string());
        let signer = load_tool_signer(&config, Some(&jwk)).unwrap().unwrap();
        assert_eq!(signer.key_id(), Some("configured"));

        config.tool.private_key_path = Some("/nonexistent/tool.pem".to_string());
        assert!(load_tool_signer(&config, None).is_err());
    }

    #[test]
    fn test_worker_count() {
        let mut config = ServerConfig::default();
        config.server.workers = 0;
        assert_eq!(worker_count(&config), num_cpus::get());

        config.server.workers = 3;
        assert_eq!(worker_count(&config), 3);
    }

    #[test]
    fn test_load_public_jwk() {
        assert!(load_public_jwk(None).unwrap().is_none());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"kty":"RSA","kid":"tool-key-1"}}"#).unwrap();
        let jwk = load_public_jwk(file.path().to_str()).unwrap().unwrap();
        assert_eq!(jwk["kid"], "tool-key-1");

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(load_public_jwk(bad.path().to_str()).is_err());
        assert!(load_public_jwk(Some("/nonexistent/jwk.json")).is_err());
    }
}
