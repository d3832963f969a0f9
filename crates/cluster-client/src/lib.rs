//! Cluster Client
//!
//! The read/write boundary between the evict-rollout controller and the
//! Kubernetes control plane. Provides owned models for the handful of objects
//! the controller inspects (nodes, pods, ReplicaSets, Deployments) and the
//! single write it performs, a rollout restart.
//!
//! # Example
//!
//! ```no_run
//! use cluster_client::{ClusterClientTrait, KubeClusterClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KubeClusterClient::try_default().await?;
//!
//! for node in client.list_nodes().await? {
//!     if node.unschedulable {
//!         let pods = client.list_pods_on_node(&node.name).await?;
//!         println!("{} is cordoned with {} pods", node.name, pods.len());
//!     }
//! }
//!
//! client.trigger_rollout_restart("prod", "app").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod cluster_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeClusterClient;
pub use error::ClusterError;
pub use models::*;
pub use cluster_trait::ClusterClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockClusterClient;
