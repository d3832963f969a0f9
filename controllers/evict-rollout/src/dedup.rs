//! Per-run record of Deployments already restarted.
//!
//! Owned by a single `ReconciliationRun` and dropped with it. The run loop is
//! sequential, so the record is borrowed mutably rather than locked; a
//! parallel run loop would need to serialise access to keep the at-most-once
//! guarantee.

use cluster_client::DeploymentKey;
use std::collections::BTreeSet;

/// Set of `(namespace, name)` keys restarted during one run
#[derive(Debug, Default)]
pub struct DedupRecord {
    triggered: BTreeSet<DeploymentKey>,
}

impl DedupRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &DeploymentKey) -> bool {
        self.triggered.contains(key)
    }

    /// Record `key`. Returns `false` if it was already present.
    pub fn record(&mut self, key: DeploymentKey) -> bool {
        self.triggered.insert(key)
    }

    pub fn len(&self) -> usize {
        self.triggered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggered.is_empty()
    }

    /// Recorded keys in `namespace/name` order
    pub fn iter(&self) -> impl Iterator<Item = &DeploymentKey> {
        self.triggered.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_idempotent() {
        let mut record = DedupRecord::new();
        assert!(record.is_empty());

        assert!(record.record(DeploymentKey::new("prod", "app")));
        assert!(!record.record(DeploymentKey::new("prod", "app")));
        assert_eq!(record.len(), 1);
        assert!(record.contains(&DeploymentKey::new("prod", "app")));
    }

    #[test]
    fn test_namespace_is_part_of_the_key() {
        let mut record = DedupRecord::new();
        record.record(DeploymentKey::new("prod", "app"));

        assert!(!record.contains(&DeploymentKey::new("staging", "app")));
        assert!(record.record(DeploymentKey::new("staging", "app")));

        let keys: Vec<String> = record.iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["prod/app", "staging/app"]);
    }

    #[test]
    fn test_records_are_isolated() {
        let mut first = DedupRecord::new();
        first.record(DeploymentKey::new("prod", "app"));

        let second = DedupRecord::new();
        assert!(!second.contains(&DeploymentKey::new("prod", "app")));
    }
}
