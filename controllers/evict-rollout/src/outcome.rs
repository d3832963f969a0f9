//! Per-candidate decisions and the run summary built from them.

use crate::stability::UnstableReason;
use cluster_client::DeploymentKey;
use std::fmt;

/// Why a candidate pod did not lead to a restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Pod has no `ReplicaSet` owner reference
    NoReplicaSetOwner,
    /// Owning ReplicaSet could not be fetched (deleted or unreachable)
    ReplicaSetUnavailable { replica_set: String, cause: String },
    /// ReplicaSet has no `Deployment` owner reference
    NoDeploymentOwner { replica_set: String },
    /// Owning Deployment could not be fetched
    DeploymentUnavailable { deployment: String, cause: String },
    /// Deployment failed the stability predicate
    Unstable { deployment: String, reason: UnstableReason },
    /// Restart write was rejected by the cluster
    RestartFailed { cause: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoReplicaSetOwner => write!(f, "no ReplicaSet owner"),
            SkipReason::ReplicaSetUnavailable { replica_set, cause } => {
                write!(f, "ReplicaSet {} unavailable: {}", replica_set, cause)
            }
            SkipReason::NoDeploymentOwner { replica_set } => {
                write!(f, "ReplicaSet {} has no Deployment owner", replica_set)
            }
            SkipReason::DeploymentUnavailable { deployment, cause } => {
                write!(f, "Deployment {} unavailable: {}", deployment, cause)
            }
            SkipReason::Unstable { deployment, reason } => {
                write!(f, "Deployment {} unstable: {}", deployment, reason)
            }
            SkipReason::RestartFailed { cause } => write!(f, "restart failed: {}", cause),
        }
    }
}

/// Terminal state of one candidate pod
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Restart written to the cluster
    Triggered(DeploymentKey),
    /// Restart would have been written; dry-run suppressed it
    DryRun(DeploymentKey),
    /// Deployment was already restarted (or dry-run restarted) earlier in this run
    AlreadyTriggered(DeploymentKey),
    Skipped(SkipReason),
}

/// Counters for one reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Unschedulable nodes processed
    pub nodes: usize,
    /// Nodes whose pods could not be listed
    pub node_failures: usize,
    /// Candidate pods evaluated
    pub candidates: usize,
    pub triggered: usize,
    pub dry_run: usize,
    pub already_triggered: usize,
    pub skipped: usize,
}

impl RunSummary {
    /// Count one candidate outcome
    pub fn record(&mut self, outcome: &CandidateOutcome) {
        self.candidates += 1;
        match outcome {
            CandidateOutcome::Triggered(_) => self.triggered += 1,
            CandidateOutcome::DryRun(_) => self.dry_run += 1,
            CandidateOutcome::AlreadyTriggered(_) => self.already_triggered += 1,
            CandidateOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_each_outcome() {
        let key = DeploymentKey::new("prod", "app");
        let mut summary = RunSummary::default();
        summary.record(&CandidateOutcome::Triggered(key.clone()));
        summary.record(&CandidateOutcome::AlreadyTriggered(key.clone()));
        summary.record(&CandidateOutcome::AlreadyTriggered(key.clone()));
        summary.record(&CandidateOutcome::DryRun(key));
        summary.record(&CandidateOutcome::Skipped(SkipReason::NoReplicaSetOwner));

        assert_eq!(summary.candidates, 5);
        assert_eq!(summary.triggered, 1);
        assert_eq!(summary.already_triggered, 2);
        assert_eq!(summary.dry_run, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NoReplicaSetOwner.to_string(), "no ReplicaSet owner");
        assert_eq!(
            SkipReason::NoDeploymentOwner { replica_set: "app-77f".to_string() }.to_string(),
            "ReplicaSet app-77f has no Deployment owner"
        );
        assert_eq!(
            SkipReason::Unstable {
                deployment: "app".to_string(),
                reason: UnstableReason::Paused,
            }
            .to_string(),
            "Deployment app unstable: rollout is paused"
        );
    }
}
