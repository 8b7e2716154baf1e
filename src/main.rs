//! Main application entry point (server binary).
//!
//! This is a thin wrapper around the `ip_lookup` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Serving HTTP until Ctrl-C
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::process;

use ip_lookup::initialization::{build_lookup_service, init_logger_with};
use ip_lookup::server::{start_server, AppState};
use ip_lookup::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting IPINFO_API_TOKEN in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    let service = match build_lookup_service(&config).await {
        Ok(service) => service,
        Err(e) => {
            eprintln!("ip_lookup error: {:#}", e);
            process::exit(1);
        }
    };

    let state = AppState {
        service: service.clone(),
        limits: config.batch_limits(),
        cache_control: config.cache_control_header(),
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    let served = start_server(&config.bind_address(), state, shutdown).await;
    service.close().await;

    if let Err(e) = served {
        eprintln!("ip_lookup error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
