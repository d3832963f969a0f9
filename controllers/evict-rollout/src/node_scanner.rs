//! Discovery of cordoned nodes.

use crate::error::ControllerError;
use cluster_client::{ClusterClientTrait, NodeInfo};
use tracing::debug;

/// Names of nodes marked unschedulable, sorted.
///
/// A listing failure aborts the run: without it there is no way to tell
/// which nodes are draining.
pub async fn scan_unschedulable_nodes(
    client: &dyn ClusterClientTrait,
) -> Result<Vec<String>, ControllerError> {
    let nodes = client
        .list_nodes()
        .await
        .map_err(ControllerError::NodeListing)?;

    let unschedulable = unschedulable_node_names(&nodes);
    debug!(total = nodes.len(), unschedulable = unschedulable.len(), "Scanned nodes");
    Ok(unschedulable)
}

/// Filter `nodes` down to the unschedulable ones
pub fn unschedulable_node_names(nodes: &[NodeInfo]) -> Vec<String> {
    let mut names: Vec<String> = nodes
        .iter()
        .filter(|n| n.unschedulable)
        .map(|n| n.name.clone())
        .collect();
    names.sort();
    names
}
