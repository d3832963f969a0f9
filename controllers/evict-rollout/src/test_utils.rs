//! Test utilities for unit testing the reconciliation pass
//!
//! This module provides helpers for creating test objects and setting up the
//! mock cluster for common scenarios.

use crate::config::{RunConfig, DEFAULT_ANNOTATION_KEY, DEFAULT_ANNOTATION_VALUE};
use cluster_client::*;
use std::collections::BTreeMap;

/// Helper to create a test pod
pub fn create_test_pod(
    namespace: &str,
    name: &str,
    node: &str,
    annotations: &[(&str, &str)],
    owners: &[(&str, &str)],
) -> PodInfo {
    PodInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        node_name: Some(node.to_string()),
        annotations: annotations
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        owner_references: owners
            .iter()
            .map(|(kind, owner)| OwnerRef::new(*kind, *owner))
            .collect(),
    }
}

/// Helper to create an opted-in pod owned by `replica_set`
pub fn create_candidate_pod(namespace: &str, name: &str, node: &str, replica_set: &str) -> PodInfo {
    create_test_pod(
        namespace,
        name,
        node,
        &[(DEFAULT_ANNOTATION_KEY, DEFAULT_ANNOTATION_VALUE)],
        &[(KIND_REPLICA_SET, replica_set)],
    )
}

/// Helper to create a test ReplicaSet, optionally owned by a Deployment
pub fn create_test_replica_set(namespace: &str, name: &str, deployment: Option<&str>) -> ReplicaSetInfo {
    ReplicaSetInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        owner_references: deployment
            .map(|d| vec![OwnerRef::new(KIND_DEPLOYMENT, d)])
            .unwrap_or_default(),
    }
}

/// Helper to create a fully rolled-out Deployment at generation 3
pub fn create_stable_deployment(namespace: &str, name: &str, replicas: i64) -> DeploymentInfo {
    DeploymentInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        generation: 3,
        paused: false,
        status: DeploymentStatusInfo {
            observed_generation: 3,
            replicas,
            ready_replicas: replicas,
            updated_replicas: replicas,
        },
    }
}

/// Helper to build a run config with the default selector
pub fn test_run_config(dry_run: bool) -> RunConfig {
    RunConfig {
        dry_run,
        ..RunConfig::default()
    }
}

/// Cordoned `worker-1` running `prod/app-abc`, owned by ReplicaSet `app-77f`,
/// owned by a stable 3-replica Deployment `app`.
pub fn create_single_candidate_cluster() -> MockClusterClient {
    let client = MockClusterClient::new();
    client.add_node("worker-1", true);
    client.add_node("worker-2", false);
    client.add_pod(create_candidate_pod("prod", "app-abc", "worker-1", "app-77f"));
    client.add_replica_set(create_test_replica_set("prod", "app-77f", Some("app")));
    client.add_deployment(create_stable_deployment("prod", "app", 3));
    client
}
