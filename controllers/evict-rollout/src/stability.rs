//! Deployment stability gate.
//!
//! A restart is only safe when the Deployment is fully rolled out, fully
//! ready, not scaled to zero and not paused. The terms are checked in a fixed
//! order and the first failing one is reported.

use crate::outcome::SkipReason;
use cluster_client::{ClusterClientTrait, DeploymentInfo, DeploymentKey};
use std::fmt;

/// The predicate term a Deployment failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnstableReason {
    /// `status.observedGeneration != metadata.generation`
    GenerationNotObserved { observed_generation: i64, generation: i64 },
    /// `status.replicas != status.readyReplicas`
    ReplicasNotReady { replicas: i64, ready_replicas: i64 },
    /// `status.replicas != status.updatedReplicas`
    ReplicasNotUpdated { replicas: i64, updated_replicas: i64 },
    /// `status.replicas == 0`
    ScaledToZero,
    /// `spec.paused == true`
    Paused,
}

impl fmt::Display for UnstableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnstableReason::GenerationNotObserved { observed_generation, generation } => write!(
                f,
                "observed generation {} does not match generation {}",
                observed_generation, generation
            ),
            UnstableReason::ReplicasNotReady { replicas, ready_replicas } => {
                write!(f, "{} of {} replicas ready", ready_replicas, replicas)
            }
            UnstableReason::ReplicasNotUpdated { replicas, updated_replicas } => {
                write!(f, "{} of {} replicas updated", updated_replicas, replicas)
            }
            UnstableReason::ScaledToZero => write!(f, "scaled to zero replicas"),
            UnstableReason::Paused => write!(f, "rollout is paused"),
        }
    }
}

/// Result of the stability predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Stable,
    Unstable(UnstableReason),
}

/// Evaluate the stability predicate against a fetched Deployment.
pub fn evaluate_stability(deployment: &DeploymentInfo) -> Stability {
    let status = &deployment.status;

    if status.observed_generation != deployment.generation {
        return Stability::Unstable(UnstableReason::GenerationNotObserved {
            observed_generation: status.observed_generation,
            generation: deployment.generation,
        });
    }
    if status.replicas != status.ready_replicas {
        return Stability::Unstable(UnstableReason::ReplicasNotReady {
            replicas: status.replicas,
            ready_replicas: status.ready_replicas,
        });
    }
    if status.replicas != status.updated_replicas {
        return Stability::Unstable(UnstableReason::ReplicasNotUpdated {
            replicas: status.replicas,
            updated_replicas: status.updated_replicas,
        });
    }
    if status.replicas <= 0 {
        return Stability::Unstable(UnstableReason::ScaledToZero);
    }
    if deployment.paused {
        return Stability::Unstable(UnstableReason::Paused);
    }

    Stability::Stable
}

/// Fetch the Deployment behind `key` and evaluate it.
///
/// A failed fetch is a skip, not an error.
pub async fn check_deployment(
    client: &dyn ClusterClientTrait,
    key: &DeploymentKey,
) -> Result<Stability, SkipReason> {
    let deployment = client
        .get_deployment(&key.namespace, &key.name)
        .await
        .map_err(|e| SkipReason::DeploymentUnavailable {
            deployment: key.name.clone(),
            cause: e.to_string(),
        })?;

    Ok(evaluate_stability(&deployment))
}
