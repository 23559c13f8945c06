// src/collector.rs
//! Aggregation of per-entity findings.
//!
//! At most one finding survives per (entity, category) pair; recording the
//! same pair again replaces the earlier entry (last write wins across the
//! unordered layer iteration). Output ordering is deterministic regardless
//! of insertion order.

use crate::types::{CheckCategory, Entity, Finding};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct ResultCollector {
    findings: BTreeMap<(Entity, CheckCategory), Finding>,
}

impl ResultCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entity: Entity, category: CheckCategory) {
        self.findings
            .insert((entity.clone(), category), Finding::new(entity, category));
    }

    /// Drains into an entity-sorted finding list.
    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings.into_values().collect()
    }
}
