//! Semiconductor Part Lookup Service
//!
//! HTTP front end for Digi-Key part lookups.

use anyhow::{Context, Result};
use semiconductor_part_lookup::{
    create_app, AppState, CredentialProvider, NoCredentialProvider, PartLookupAdapter, TerminalPrompt,
};
use semiconductor_utils::{init_logging, AppConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting semiconductor part lookup service");

    tokio::fs::create_dir_all(&config.digikey.storage_path)
        .await
        .with_context(|| format!("creating storage path {}", config.digikey.storage_path.display()))?;

    let provider: Arc<dyn CredentialProvider> = if config.digikey.interactive_credentials {
        Arc::new(TerminalPrompt)
    } else {
        Arc::new(NoCredentialProvider)
    };
    let adapter = PartLookupAdapter::new(&config.digikey, provider)?;
    info!(
        api_url = %config.digikey.base_url(),
        timeout_seconds = config.digikey.lookup_timeout_seconds,
        "Digi-Key client ready"
    );

    let app = create_app(AppState { adapter }, &config.server);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server host/port")?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Part lookup service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
