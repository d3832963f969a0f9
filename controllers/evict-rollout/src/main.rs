//! Evict-to-Rollout Controller
//!
//! Keeps single-replica workloads available through node drains.
//!
//! Each invocation scans for cordoned nodes, finds pods on them annotated
//! `evict-to-rollout=true` (configurable), walks their ownership up to the
//! owning Deployment and, when that Deployment is stable, triggers a rollout
//! restart so a replacement pod is scheduled on a healthy node before the
//! drain evicts the old one.

mod candidates;
mod config;
mod controller;
mod dedup;
mod error;
mod node_scanner;
mod outcome;
mod ownership;
mod reconciler;
mod stability;
#[cfg(test)]
mod test_utils;

use crate::config::{Config, LogFormat};
use crate::error::ControllerError;
use controller::Controller;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    // kube's rustls transport needs a process-wide crypto provider
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("rustls crypto provider already installed");
    }

    info!("Starting Evict-to-Rollout Controller");
    info!("Configuration:");
    info!("  Annotation: {}", config.run.selector);
    info!("  Dry run: {}", config.run.dry_run);

    let controller = Controller::new(config.run).await?;
    controller.run().await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}
