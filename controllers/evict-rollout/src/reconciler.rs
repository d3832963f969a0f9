//! Reconciliation pass.
//!
//! A `ReconciliationRun` walks every cordoned node, evaluates each opted-in
//! pod on it and restarts the owning Deployment at most once per run:
//!
//! 1. List unschedulable nodes (failure aborts the run)
//! 2. Per node, list candidate pods (failure skips the node)
//! 3. Per candidate, resolve Pod -> ReplicaSet -> Deployment
//! 4. Check the Deployment is stable
//! 5. Restart it (or log the intent in dry-run) unless already done this run
//!
//! Nodes and candidates are processed one at a time.

use crate::candidates::find_candidates;
use crate::config::RunConfig;
use crate::dedup::DedupRecord;
use crate::error::ControllerError;
use crate::node_scanner::scan_unschedulable_nodes;
use crate::outcome::{CandidateOutcome, RunSummary, SkipReason};
use crate::ownership::resolve_owner;
use crate::stability::{check_deployment, Stability};
use cluster_client::{ClusterClientTrait, DeploymentKey, PodInfo};
use tracing::{debug, error, info, warn};

/// A single, stateless pass over the cluster.
///
/// Holds the dedup record for the duration of the pass; it is dropped when
/// `execute` returns.
pub struct ReconciliationRun<'a> {
    client: &'a dyn ClusterClientTrait,
    config: &'a RunConfig,
    dedup: DedupRecord,
    summary: RunSummary,
}

impl std::fmt::Debug for ReconciliationRun<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationRun")
            .field("config", &self.config)
            .field("dedup", &self.dedup)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<'a> ReconciliationRun<'a> {
    /// Creates a run with an empty dedup record.
    pub fn new(client: &'a dyn ClusterClientTrait, config: &'a RunConfig) -> Self {
        Self {
            client,
            config,
            dedup: DedupRecord::new(),
            summary: RunSummary::default(),
        }
    }

    /// Runs the pass to completion.
    ///
    /// Only a node listing failure is returned as an error; every other
    /// problem is logged and skipped.
    pub async fn execute(mut self) -> Result<RunSummary, ControllerError> {
        let nodes = scan_unschedulable_nodes(self.client).await?;

        if nodes.is_empty() {
            info!("No unschedulable nodes found, nothing to do");
            return Ok(self.summary);
        }

        info!("Found {} unschedulable node(s): {}", nodes.len(), nodes.join(", "));

        for node in &nodes {
            self.reconcile_node(node).await;
        }

        if !self.dedup.is_empty() {
            let restarted: Vec<String> = self.dedup.iter().map(ToString::to_string).collect();
            info!(
                dry_run = self.config.dry_run,
                "Selected {} deployment(s) for restart: {}",
                self.dedup.len(),
                restarted.join(", ")
            );
        }

        Ok(self.summary)
    }

    async fn reconcile_node(&mut self, node: &str) {
        self.summary.nodes += 1;

        let candidates = match find_candidates(self.client, node, &self.config.selector).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(node, "Failed to list pods on node, skipping: {}", e);
                self.summary.node_failures += 1;
                return;
            }
        };

        if candidates.is_empty() {
            info!(node, "No pods annotated with {} on node", self.config.selector);
            return;
        }

        info!(node, "Found {} candidate pod(s)", candidates.len());

        for pod in &candidates {
            let outcome = self.reconcile_candidate(node, pod).await;
            self.summary.record(&outcome);
        }
    }

    /// Drives one candidate pod to a terminal outcome.
    pub(crate) async fn reconcile_candidate(&mut self, node: &str, pod: &PodInfo) -> CandidateOutcome {
        let key = match self.resolve_stable_deployment(pod).await {
            Ok(key) => key,
            Err(reason) => {
                log_skip(node, pod, &reason);
                return CandidateOutcome::Skipped(reason);
            }
        };

        if self.dedup.contains(&key) {
            info!(
                node,
                namespace = %pod.namespace,
                pod = %pod.name,
                deployment = %key.name,
                "Deployment already restarted in this run"
            );
            return CandidateOutcome::AlreadyTriggered(key);
        }

        // Recorded before the write so a failed or simulated restart is
        // still attempted at most once
        self.dedup.record(key.clone());

        if self.config.dry_run {
            info!(
                node,
                namespace = %pod.namespace,
                pod = %pod.name,
                deployment = %key.name,
                "[dry-run] Would trigger rollout restart"
            );
            return CandidateOutcome::DryRun(key);
        }

        self.restart(node, pod, key).await
    }

    async fn resolve_stable_deployment(&self, pod: &PodInfo) -> Result<DeploymentKey, SkipReason> {
        let key = resolve_owner(self.client, pod).await?;

        match check_deployment(self.client, &key).await? {
            Stability::Stable => {
                debug!(namespace = %key.namespace, deployment = %key.name, "Deployment is stable");
                Ok(key)
            }
            Stability::Unstable(reason) => Err(SkipReason::Unstable {
                deployment: key.name,
                reason,
            }),
        }
    }

    async fn restart(&self, node: &str, pod: &PodInfo, key: DeploymentKey) -> CandidateOutcome {
        match self.client.trigger_rollout_restart(&key.namespace, &key.name).await {
            Ok(()) => {
                info!(
                    node,
                    namespace = %pod.namespace,
                    pod = %pod.name,
                    deployment = %key.name,
                    "Triggered rollout restart"
                );
                CandidateOutcome::Triggered(key)
            }
            Err(e) => {
                error!(
                    node,
                    namespace = %pod.namespace,
                    pod = %pod.name,
                    deployment = %key.name,
                    "Failed to trigger rollout restart: {}",
                    e
                );
                CandidateOutcome::Skipped(SkipReason::RestartFailed { cause: e.to_string() })
            }
        }
    }
}

fn log_skip(node: &str, pod: &PodInfo, reason: &SkipReason) {
    match reason {
        SkipReason::ReplicaSetUnavailable { .. } | SkipReason::DeploymentUnavailable { .. } => {
            warn!(node, namespace = %pod.namespace, pod = %pod.name, reason = %reason, "Skipping pod");
        }
        _ => {
            info!(node, namespace = %pod.namespace, pod = %pod.name, reason = %reason, "Skipping pod");
        }
    }
}
