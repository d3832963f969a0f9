//! Kubernetes API client
//!
//! Implements `ClusterClientTrait` on top of `kube::Client`. Reads go through
//! typed `Api` handles; the rollout restart is a merge patch of the pod
//! template annotation `kubectl` itself uses.

use crate::error::ClusterError;
use crate::models::*;
use crate::cluster_trait::ClusterClientTrait;
use chrono::{SecondsFormat, Utc};
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client};
use serde_json::json;
use tracing::debug;

/// Pod template annotation written by `kubectl rollout restart`
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// Cluster client backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
}

impl std::fmt::Debug for KubeClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClusterClient").finish_non_exhaustive()
    }
}

impl KubeClusterClient {
    /// Wrap an existing Kubernetes client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a client from the ambient configuration (in-cluster service
    /// account, or the local kubeconfig when running outside the cluster)
    pub async fn try_default() -> Result<Self, ClusterError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn nodes(&self) -> Api<Node> {
        Api::all(self.client.clone())
    }

    fn pods(&self) -> Api<Pod> {
        Api::all(self.client.clone())
    }

    fn replica_sets(&self, namespace: &str) -> Api<ReplicaSet> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Body of the restart patch: stamp the pod template so the Deployment
/// controller rolls out a new ReplicaSet.
pub fn restart_patch(timestamp: &str) -> serde_json::Value {
    let mut annotations = serde_json::Map::new();
    annotations.insert(RESTARTED_AT_ANNOTATION.to_string(), json!(timestamp));

    json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": annotations
                }
            }
        }
    })
}

#[async_trait::async_trait]
impl ClusterClientTrait for KubeClusterClient {
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>, ClusterError> {
        let nodes = self.nodes().list(&ListParams::default()).await?;
        debug!("Listed {} nodes", nodes.items.len());
        Ok(nodes.items.iter().map(NodeInfo::from).collect())
    }

    async fn list_pods_on_node(&self, node: &str) -> Result<Vec<PodInfo>, ClusterError> {
        let params = ListParams::default().fields(&format!("spec.nodeName={}", node));
        let pods = self.pods().list(&params).await?;
        debug!("Listed {} pods on node {}", pods.items.len(), node);
        Ok(pods.items.iter().map(PodInfo::from).collect())
    }

    async fn get_replica_set(&self, namespace: &str, name: &str) -> Result<ReplicaSetInfo, ClusterError> {
        match self.replica_sets(namespace).get_opt(name).await? {
            Some(rs) => Ok(ReplicaSetInfo::from(&rs)),
            None => Err(ClusterError::NotFound(format!("ReplicaSet {}/{}", namespace, name))),
        }
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<DeploymentInfo, ClusterError> {
        match self.deployments(namespace).get_opt(name).await? {
            Some(deployment) => Ok(DeploymentInfo::from(&deployment)),
            None => Err(ClusterError::NotFound(format!("Deployment {}/{}", namespace, name))),
        }
    }

    async fn trigger_rollout_restart(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let patch = restart_patch(&timestamp);
        let pp = PatchParams::default();

        self.deployments(namespace)
            .patch(name, &pp, &Patch::Merge(&patch))
            .await?;

        debug!("Patched {}/{} with {}={}", namespace, name, RESTARTED_AT_ANNOTATION, timestamp);
        Ok(())
    }
}
