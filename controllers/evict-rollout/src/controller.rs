//! Main controller implementation.
//!
//! This module contains the `Controller` struct that owns the cluster client
//! and runs a single reconciliation pass. Scheduling repeated passes is left
//! to whatever invokes the binary (typically a CronJob).

use crate::config::RunConfig;
use crate::error::ControllerError;
use crate::outcome::RunSummary;
use crate::reconciler::ReconciliationRun;
use cluster_client::{ClusterClientTrait, KubeClusterClient};
use tracing::info;

/// Main controller for evict-to-rollout.
#[derive(Debug)]
pub struct Controller<C: ClusterClientTrait = KubeClusterClient> {
    client: C,
    config: RunConfig,
}

impl Controller<KubeClusterClient> {
    /// Creates a controller connected to the cluster from the ambient
    /// configuration (service account or kubeconfig).
    pub async fn new(config: RunConfig) -> Result<Self, ControllerError> {
        info!("Initializing Evict-to-Rollout Controller");

        let client = KubeClusterClient::try_default().await?;
        Ok(Self::with_client(client, config))
    }
}

impl<C: ClusterClientTrait> Controller<C> {
    /// Creates a controller over an existing client.
    pub fn with_client(client: C, config: RunConfig) -> Self {
        Self { client, config }
    }

    /// Runs one reconciliation pass and logs its summary.
    pub async fn run(&self) -> Result<RunSummary, ControllerError> {
        info!(
            dry_run = self.config.dry_run,
            "Starting reconciliation pass (selector {})",
            self.config.selector
        );

        let summary = ReconciliationRun::new(&self.client, &self.config)
            .execute()
            .await?;

        info!(
            nodes = summary.nodes,
            node_failures = summary.node_failures,
            candidates = summary.candidates,
            triggered = summary.triggered,
            dry_run = summary.dry_run,
            already_triggered = summary.already_triggered,
            skipped = summary.skipped,
            "Reconciliation pass complete"
        );

        Ok(summary)
    }
}
