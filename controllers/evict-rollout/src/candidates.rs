//! Candidate pod discovery.
//!
//! A candidate is a pod scheduled on a cordoned node whose annotations carry
//! the configured opt-in pair exactly.

use cluster_client::{ClusterClientTrait, ClusterError, PodInfo};
use std::fmt;
use tracing::debug;

/// Annotation `key=value` pair a pod must carry to opt in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSelector {
    pub key: String,
    pub value: String,
}

impl AnnotationSelector {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Exact match on both key and value
    pub fn matches(&self, pod: &PodInfo) -> bool {
        pod.annotations
            .get(&self.key)
            .is_some_and(|value| *value == self.value)
    }
}

impl fmt::Display for AnnotationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Lists the pods on `node` (all namespaces) that match `selector`.
///
/// Candidates come back sorted by namespace then name. A listing failure is
/// returned as-is; the caller decides to skip the node.
pub async fn find_candidates(
    client: &dyn ClusterClientTrait,
    node: &str,
    selector: &AnnotationSelector,
) -> Result<Vec<PodInfo>, ClusterError> {
    let pods = client.list_pods_on_node(node).await?;
    let listed = pods.len();

    let mut candidates: Vec<PodInfo> = pods
        .into_iter()
        .filter(|pod| {
            // A stale listing can return a pod that has since moved
            let on_node = pod.node_name.as_deref() == Some(node);
            if !on_node {
                debug!(node, namespace = %pod.namespace, pod = %pod.name, "Pod no longer on node, ignoring");
            }
            on_node
        })
        .filter(|pod| selector.matches(pod))
        .collect();

    candidates.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));

    debug!(node, listed, candidates = candidates.len(), "Filtered pods by {}", selector);
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use cluster_client::MockClusterClient;

    fn selector() -> AnnotationSelector {
        AnnotationSelector::new("evict-to-rollout", "true")
    }

    #[test]
    fn test_selector_exact_match() {
        let pod = create_test_pod("prod", "app-abc", "worker-1", &[("evict-to-rollout", "true")], &[]);
        assert!(selector().matches(&pod));
    }

    #[test]
    fn test_selector_wrong_value() {
        let pod = create_test_pod("prod", "app-abc", "worker-1", &[("evict-to-rollout", "True")], &[]);
        assert!(!selector().matches(&pod), "Value comparison is case-sensitive");

        let pod = create_test_pod("prod", "app-abc", "worker-1", &[("evict-to-rollout", "")], &[]);
        assert!(!selector().matches(&pod));
    }

    #[test]
    fn test_selector_missing_key() {
        let pod = create_test_pod("prod", "app-abc", "worker-1", &[("other", "true")], &[]);
        assert!(!selector().matches(&pod));

        let pod = create_test_pod("prod", "app-abc", "worker-1", &[], &[]);
        assert!(!selector().matches(&pod));
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(selector().to_string(), "evict-to-rollout=true");
    }

    #[tokio::test]
    async fn test_find_candidates_filters_and_sorts() {
        let client = MockClusterClient::new();
        client.add_pod(create_candidate_pod("prod", "b-pod", "worker-1", "b-rs"));
        client.add_pod(create_candidate_pod("dev", "z-pod", "worker-1", "z-rs"));
        client.add_pod(create_candidate_pod("prod", "a-pod", "worker-1", "a-rs"));
        client.add_pod(create_test_pod("prod", "plain", "worker-1", &[], &[("ReplicaSet", "plain-rs")]));
        client.add_pod(create_candidate_pod("prod", "elsewhere", "worker-2", "e-rs"));

        let candidates = find_candidates(&client, "worker-1", &selector()).await
            .expect("listing should succeed");

        let names: Vec<(&str, &str)> = candidates
            .iter()
            .map(|p| (p.namespace.as_str(), p.name.as_str()))
            .collect();
        assert_eq!(names, vec![("dev", "z-pod"), ("prod", "a-pod"), ("prod", "b-pod")]);
    }

    #[tokio::test]
    async fn test_find_candidates_empty_is_ok() {
        let client = MockClusterClient::new();
        client.add_pod(create_test_pod("prod", "plain", "worker-1", &[], &[]));

        let candidates = find_candidates(&client, "worker-1", &selector()).await
            .expect("listing should succeed");
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_find_candidates_listing_failure() {
        let client = MockClusterClient::new();
        client.fail_pod_listing("worker-1");

        let result = find_candidates(&client, "worker-1", &selector()).await;
        assert!(result.is_err());
    }
}
