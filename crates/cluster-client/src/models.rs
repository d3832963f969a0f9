//! Cluster object models
//!
//! Owned snapshots of the Kubernetes objects the controller reads. Only the
//! fields the reconciliation pass looks at are carried; everything else in the
//! API objects is dropped during conversion.

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::{Node, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Owner kind of a ReplicaSet in a pod's owner references
pub const KIND_REPLICA_SET: &str = "ReplicaSet";

/// Owner kind of a Deployment in a ReplicaSet's owner references
pub const KIND_DEPLOYMENT: &str = "Deployment";

/// Node as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    /// `spec.unschedulable`; absent means schedulable
    pub unschedulable: bool,
}

/// Single owner reference entry (`metadata.ownerReferences[]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: String,
    pub name: String,
}

impl OwnerRef {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Pod as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    /// `spec.nodeName`, `None` while the pod is unscheduled
    pub node_name: Option<String>,
    pub annotations: BTreeMap<String, String>,
    /// Owner references in the order the API server returned them
    pub owner_references: Vec<OwnerRef>,
}

impl PodInfo {
    /// First owner reference of the given kind, if any
    pub fn owner_of_kind(&self, kind: &str) -> Option<&OwnerRef> {
        first_owner_of_kind(&self.owner_references, kind)
    }
}

/// ReplicaSet as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSetInfo {
    pub name: String,
    pub namespace: String,
    pub owner_references: Vec<OwnerRef>,
}

impl ReplicaSetInfo {
    /// First owner reference of the given kind, if any
    pub fn owner_of_kind(&self, kind: &str) -> Option<&OwnerRef> {
        first_owner_of_kind(&self.owner_references, kind)
    }
}

/// Rollout status counters of a Deployment.
///
/// Every counter is zero when the API server omitted it. This is the only
/// place that defaulting happens; consumers compare the values directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatusInfo {
    pub observed_generation: i64,
    pub replicas: i64,
    pub ready_replicas: i64,
    pub updated_replicas: i64,
}

/// Deployment as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    /// `metadata.generation`, zero when absent
    pub generation: i64,
    /// `spec.paused`, false when absent
    pub paused: bool,
    pub status: DeploymentStatusInfo,
}

impl DeploymentInfo {
    pub fn key(&self) -> DeploymentKey {
        DeploymentKey::new(&self.namespace, &self.name)
    }
}

/// Identity of a Deployment: `(namespace, name)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeploymentKey {
    pub namespace: String,
    pub name: String,
}

impl DeploymentKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DeploymentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

fn first_owner_of_kind<'a>(owners: &'a [OwnerRef], kind: &str) -> Option<&'a OwnerRef> {
    owners.iter().find(|o| o.kind == kind)
}

fn convert_owners(owners: Option<&Vec<OwnerReference>>) -> Vec<OwnerRef> {
    owners
        .map(|refs| {
            refs.iter()
                .map(|r| OwnerRef::new(r.kind.clone(), r.name.clone()))
                .collect()
        })
        .unwrap_or_default()
}

// Conversions from the k8s-openapi types. Missing optional fields collapse to
// their documented defaults here and nowhere else.

impl From<&Node> for NodeInfo {
    fn from(node: &Node) -> Self {
        Self {
            name: node.metadata.name.clone().unwrap_or_default(),
            unschedulable: node
                .spec
                .as_ref()
                .and_then(|s| s.unschedulable)
                .unwrap_or(false),
        }
    }
}

impl From<&Pod> for PodInfo {
    fn from(pod: &Pod) -> Self {
        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            node_name: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
            annotations: pod.metadata.annotations.clone().unwrap_or_default(),
            owner_references: convert_owners(pod.metadata.owner_references.as_ref()),
        }
    }
}

impl From<&ReplicaSet> for ReplicaSetInfo {
    fn from(rs: &ReplicaSet) -> Self {
        Self {
            name: rs.metadata.name.clone().unwrap_or_default(),
            namespace: rs.metadata.namespace.clone().unwrap_or_default(),
            owner_references: convert_owners(rs.metadata.owner_references.as_ref()),
        }
    }
}

impl From<&Deployment> for DeploymentInfo {
    fn from(deployment: &Deployment) -> Self {
        let status = deployment
            .status
            .as_ref()
            .map(|s| DeploymentStatusInfo {
                observed_generation: s.observed_generation.unwrap_or(0),
                replicas: i64::from(s.replicas.unwrap_or(0)),
                ready_replicas: i64::from(s.ready_replicas.unwrap_or(0)),
                updated_replicas: i64::from(s.updated_replicas.unwrap_or(0)),
            })
            .unwrap_or_default();

        Self {
            name: deployment.metadata.name.clone().unwrap_or_default(),
            namespace: deployment.metadata.namespace.clone().unwrap_or_default(),
            generation: deployment.metadata.generation.unwrap_or(0),
            paused: deployment
                .spec
                .as_ref()
                .and_then(|s| s.paused)
                .unwrap_or(false),
            status,
        }
    }
}
