//! Ownership chain resolution: Pod -> ReplicaSet -> Deployment.
//!
//! Each hop takes the first owner reference of the expected kind. Topology
//! mismatches and a vanished ReplicaSet are skips, never errors.

use crate::outcome::SkipReason;
use cluster_client::{ClusterClientTrait, DeploymentKey, PodInfo, KIND_DEPLOYMENT, KIND_REPLICA_SET};
use tracing::debug;

/// Resolve the Deployment that ultimately owns `pod`.
///
/// No fetch is attempted when the pod has no ReplicaSet owner. A ReplicaSet
/// fetch failure is reported as `ReplicaSetUnavailable` whether the object was
/// deleted or the API call failed; the cause is kept in the reason.
pub async fn resolve_owner(
    client: &dyn ClusterClientTrait,
    pod: &PodInfo,
) -> Result<DeploymentKey, SkipReason> {
    let rs_ref = pod
        .owner_of_kind(KIND_REPLICA_SET)
        .ok_or(SkipReason::NoReplicaSetOwner)?;

    let replica_set = client
        .get_replica_set(&pod.namespace, &rs_ref.name)
        .await
        .map_err(|e| SkipReason::ReplicaSetUnavailable {
            replica_set: rs_ref.name.clone(),
            cause: e.to_string(),
        })?;

    let deployment_ref = replica_set
        .owner_of_kind(KIND_DEPLOYMENT)
        .ok_or_else(|| SkipReason::NoDeploymentOwner {
            replica_set: replica_set.name.clone(),
        })?;

    debug!(
        namespace = %pod.namespace,
        pod = %pod.name,
        replica_set = %replica_set.name,
        deployment = %deployment_ref.name,
        "Resolved ownership chain"
    );

    // Owner references never cross namespaces
    Ok(DeploymentKey::new(&pod.namespace, &deployment_ref.name))
}
