//! Controller-specific error types.
//!
//! Only run-aborting conditions are errors. Everything the reconciliation
//! pass can skip over is a `SkipReason` instead (see `outcome.rs`).

use cluster_client::ClusterError;
use thiserror::Error;

/// Errors that can occur in the Evict-to-Rollout Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Cluster client could not be created
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// Nodes could not be listed; the run cannot tell which nodes are draining
    #[error("Failed to list nodes: {0}")]
    NodeListing(#[source] ClusterError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
