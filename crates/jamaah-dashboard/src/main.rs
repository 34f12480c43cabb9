//! Prayer-times dashboard binary.
//!
//! Loads configuration, reports on the data and images directories,
//! binds the HTTP server, opens a browser on the dashboard and serves
//! until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration (`dashboard-config.yaml` if present, then env)
//! 3. Validate data files and check for the current month's file
//! 4. List slideshow images and ensure the images directory exists
//! 5. Bind the listener (port conflicts exit non-zero with remediation)
//! 6. Launch the browser on a detached task
//! 7. Serve until `Ctrl-C`, then exit 0

mod error;
mod launcher;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use jamaah_server::config::CONFIG_FILE_NAME;
use jamaah_server::{server, startup, AppState, DashboardConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::DashboardError;

/// Application entry point. Any startup or bind failure exits non-zero.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("jamaah-dashboard starting");

    match run().await {
        Ok(()) => {
            info!("jamaah-dashboard stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "jamaah-dashboard failed");
            if let Some(remediation) = e.remediation() {
                error!("{remediation}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DashboardError> {
    let config = DashboardConfig::load(Path::new(CONFIG_FILE_NAME))?;
    info!(
        address = %config.server.address(),
        static_root = %config.paths.static_root.display(),
        data_dir = %config.paths.data_dir.display(),
        images_dir = %config.paths.images_dir.display(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::from_config(&config));

    let report = startup::run_diagnostics(&state.inventory);
    if report.needs_fallback_data() {
        warn!(
            pause_ms = config.startup.fallback_pause_ms,
            "Starting without prayer data; press Ctrl+C to stop and add data files"
        );
        tokio::time::sleep(Duration::from_millis(config.startup.fallback_pause_ms)).await;
    }

    let listener = server::bind(&config.server).await?;

    let serving_from = std::fs::canonicalize(&config.paths.static_root)
        .unwrap_or_else(|_| config.paths.static_root.clone());
    info!(
        url = %config.dashboard_url(),
        serving_from = %serving_from.display(),
        data_files = report.valid_files.len(),
        images = report.images.len(),
        "Dashboard ready, press Ctrl+C to stop"
    );

    if config.launcher.enabled {
        launcher::spawn(
            config.launch_url(),
            Duration::from_millis(config.launcher.delay_ms),
        );
    }

    server::serve(listener, state, server::ctrl_c()).await?;
    Ok(())
}
