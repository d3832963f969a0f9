//! Mock ClusterClient for unit testing
//!
//! This module provides a mock implementation of ClusterClientTrait that can be used
//! in unit tests without requiring a running cluster. Every fetch and every
//! restart is counted so tests can assert on the calls the controller made.

use crate::error::ClusterError;
use crate::models::*;
use crate::cluster_trait::ClusterClientTrait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Mock ClusterClient for testing
///
/// This mock stores objects in memory and can be configured to fail specific
/// calls for testing the controller's error paths.
#[derive(Clone, Default)]
pub struct MockClusterClient {
    // In-memory storage for objects
    nodes: Arc<Mutex<Vec<NodeInfo>>>,
    pods: Arc<Mutex<Vec<PodInfo>>>,
    replica_sets: Arc<Mutex<HashMap<(String, String), ReplicaSetInfo>>>,
    deployments: Arc<Mutex<HashMap<(String, String), DeploymentInfo>>>,
    // Failure injection
    fail_node_listing: Arc<Mutex<bool>>,
    failing_pod_listings: Arc<Mutex<HashSet<String>>>,
    failing_restarts: Arc<Mutex<HashSet<DeploymentKey>>>,
    // Call recording
    pod_listings: Arc<Mutex<Vec<String>>>,
    replica_set_fetches: Arc<Mutex<Vec<(String, String)>>>,
    deployment_fetches: Arc<Mutex<Vec<(String, String)>>>,
    restarts: Arc<Mutex<Vec<DeploymentKey>>>,
}

impl std::fmt::Debug for MockClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClusterClient").finish_non_exhaustive()
    }
}

impl MockClusterClient {
    /// Create a new, empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the mock store (for test setup)
    pub fn add_node(&self, name: &str, unschedulable: bool) {
        self.nodes.lock().unwrap().push(NodeInfo {
            name: name.to_string(),
            unschedulable,
        });
    }

    /// Add a pod to the mock store (for test setup)
    pub fn add_pod(&self, pod: PodInfo) {
        self.pods.lock().unwrap().push(pod);
    }

    /// Add a ReplicaSet to the mock store (for test setup)
    pub fn add_replica_set(&self, rs: ReplicaSetInfo) {
        self.replica_sets
            .lock()
            .unwrap()
            .insert((rs.namespace.clone(), rs.name.clone()), rs);
    }

    /// Add a Deployment to the mock store (for test setup)
    pub fn add_deployment(&self, deployment: DeploymentInfo) {
        self.deployments
            .lock()
            .unwrap()
            .insert((deployment.namespace.clone(), deployment.name.clone()), deployment);
    }

    /// Make `list_nodes` fail
    pub fn fail_node_listing(&self) {
        *self.fail_node_listing.lock().unwrap() = true;
    }

    /// Make `list_pods_on_node` fail for one node
    pub fn fail_pod_listing(&self, node: &str) {
        self.failing_pod_listings.lock().unwrap().insert(node.to_string());
    }

    /// Make `trigger_rollout_restart` fail for one deployment
    pub fn fail_restart(&self, namespace: &str, name: &str) {
        self.failing_restarts
            .lock()
            .unwrap()
            .insert(DeploymentKey::new(namespace, name));
    }

    /// Nodes whose pods were listed, in call order
    pub fn pod_listings(&self) -> Vec<String> {
        self.pod_listings.lock().unwrap().clone()
    }

    /// ReplicaSet fetches as `(namespace, name)`, in call order
    pub fn replica_set_fetches(&self) -> Vec<(String, String)> {
        self.replica_set_fetches.lock().unwrap().clone()
    }

    /// Deployment fetches as `(namespace, name)`, in call order
    pub fn deployment_fetches(&self) -> Vec<(String, String)> {
        self.deployment_fetches.lock().unwrap().clone()
    }

    /// Successful restart writes, in call order
    pub fn restarts(&self) -> Vec<DeploymentKey> {
        self.restarts.lock().unwrap().clone()
    }

    /// Number of successful restart writes for one deployment
    pub fn restart_count(&self, namespace: &str, name: &str) -> usize {
        let key = DeploymentKey::new(namespace, name);
        self.restarts.lock().unwrap().iter().filter(|k| **k == key).count()
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for MockClusterClient {
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>, ClusterError> {
        if *self.fail_node_listing.lock().unwrap() {
            return Err(ClusterError::InvalidObject("node listing failed".to_string()));
        }
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn list_pods_on_node(&self, node: &str) -> Result<Vec<PodInfo>, ClusterError> {
        self.pod_listings.lock().unwrap().push(node.to_string());
        if self.failing_pod_listings.lock().unwrap().contains(node) {
            return Err(ClusterError::InvalidObject(format!("pod listing on {} failed", node)));
        }

        // Same semantics as the spec.nodeName field selector
        Ok(self
            .pods
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.node_name.as_deref() == Some(node))
            .cloned()
            .collect())
    }

    async fn get_replica_set(&self, namespace: &str, name: &str) -> Result<ReplicaSetInfo, ClusterError> {
        let key = (namespace.to_string(), name.to_string());
        self.replica_set_fetches.lock().unwrap().push(key.clone());
        self.replica_sets
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("ReplicaSet {}/{}", namespace, name)))
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<DeploymentInfo, ClusterError> {
        let key = (namespace.to_string(), name.to_string());
        self.deployment_fetches.lock().unwrap().push(key.clone());
        self.deployments
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("Deployment {}/{}", namespace, name)))
    }

    async fn trigger_rollout_restart(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        let key = DeploymentKey::new(namespace, name);
        if self.failing_restarts.lock().unwrap().contains(&key) {
            return Err(ClusterError::InvalidObject(format!("restart of {} rejected", key)));
        }
        if !self
            .deployments
            .lock()
            .unwrap()
            .contains_key(&(namespace.to_string(), name.to_string()))
        {
            return Err(ClusterError::NotFound(format!("Deployment {}", key)));
        }
        self.restarts.lock().unwrap().push(key);
        Ok(())
    }
}
