//! Cluster client errors

use thiserror::Error;

/// Errors that can occur when talking to the cluster control plane
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Kubernetes API request/response error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Object does not exist (or no longer exists)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object came back without a field the controller relies on
    #[error("Invalid object: {0}")]
    InvalidObject(String),
}

impl ClusterError {
    /// Whether this error means the object is gone rather than unreachable
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound(_))
    }
}
