// Aspire Server entrypoint
//!
//! Initialization, middleware wiring and shutdown live in dedicated modules
//! so this file remains a thin orchestrator.

use anyhow::Result;
use aspire_configs::ServerConfig;
use aspire_server::lifecycle::{bootstrap, run};
use aspire_server::logging;
use log::info;
use std::env;

#[actix_web::main]
async fn main() -> Result<()> {
    // Config path: first argument, then ASPIRE_CONFIG, then ./config.toml
    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("ASPIRE_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());

    let config = match ServerConfig::from_file(&config_path) {
        Ok(cfg) => {
            eprintln!(
                "Loaded config from: {}",
                std::fs::canonicalize(&config_path)
                    .unwrap_or_else(|_| std::path::PathBuf::from(&config_path))
                    .display()
            );
            cfg
        },
        Err(e) => {
            eprintln!("FATAL: Failed to load {}: {:#}", config_path, e);
            std::process::exit(1);
        },
    };

    // Logging before any other side effects
    logging::init_logging(&config.logging)?;

    info!("Aspire LTI gateway v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Environment: {}  Host: {}  Port: {}  Domain: {}",
        config.server.environment, config.server.host, config.server.port, config.server.domain_name
    );
    if !config.session.cookie_secure && !config.server.is_local() {
        log::warn!("Session cookie is not marked Secure outside a local environment");
    }

    let components = bootstrap(&config).await?;

    // Run HTTP server until termination signal is received
    run(&config, components).await
}
