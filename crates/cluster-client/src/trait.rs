//! ClusterClient trait for mocking
//!
//! This trait abstracts the cluster control plane so the reconciliation pass
//! never depends on a concrete transport. `KubeClusterClient` implements it
//! against the Kubernetes API; tests use `MockClusterClient`.

use crate::error::ClusterError;
use crate::models::*;

/// Trait for cluster read/write operations used by the controller
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterClientTrait: Send + Sync {
    /// List every node in the cluster
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>, ClusterError>;

    /// List pods scheduled on `node`, across all namespaces
    async fn list_pods_on_node(&self, node: &str) -> Result<Vec<PodInfo>, ClusterError>;

    /// Fetch a ReplicaSet. Returns `ClusterError::NotFound` when it does not exist.
    async fn get_replica_set(&self, namespace: &str, name: &str) -> Result<ReplicaSetInfo, ClusterError>;

    /// Fetch a Deployment. Returns `ClusterError::NotFound` when it does not exist.
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<DeploymentInfo, ClusterError>;

    /// Restart a Deployment's pods through its rolling-update strategy
    /// (equivalent to `kubectl rollout restart deployment/<name>`).
    async fn trigger_rollout_restart(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;
}
