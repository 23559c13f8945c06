// src/checks/mod.rs
//! The rule catalogue and its orchestrator.
//!
//! Rules never call each other; the [`Checker`] runs them in sequence and
//! bundles their output. A review pass borrows the project shared; a repair
//! pass takes it exclusively, applies every available fix in place and marks
//! the corresponding findings as resolved.

pub mod duplicates;
pub mod naming;
pub mod optimization;
pub mod primary_key;
pub mod safeguards;

use crate::collector::ResultCollector;
use crate::config::CheckerConfig;
use crate::error::Result;
use crate::project::Project;
use crate::types::{CheckCategory, CheckReport, Entity, Finding};

pub struct Checker {
    config: CheckerConfig,
}

impl Checker {
    /// Creates a checker.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: CheckerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// One evaluation pass over a shared view of the project. Nothing is
    /// mutated.
    #[must_use]
    pub fn review(&self, project: &Project) -> CheckReport {
        let mut report = self.read_pass(project);
        report.simplification = findings(
            optimization::simplification_candidates(project),
            CheckCategory::SimplifyGeometry,
            false,
        );
        report.estimated_metadata = findings(
            optimization::estimated_metadata_candidates(project),
            CheckCategory::EstimatedMetadata,
            false,
        );
        report
    }

    /// One evaluation pass with exclusive access: every fix-capable rule
    /// mutates the project in place and its findings come back marked
    /// `fixed`. Re-running repair on an already-repaired project yields no
    /// new fix findings.
    pub fn repair(&self, project: &mut Project) -> CheckReport {
        let simplification = optimization::simplification_candidates(project);
        for entity in &simplification {
            apply_to_layer(project, entity, optimization::clear_force_local_simplification);
        }

        let estimated = optimization::estimated_metadata_candidates(project);
        for entity in &estimated {
            apply_to_layer(project, entity, optimization::enable_estimated_metadata);
        }

        project.set_trust_metadata(true);

        let mut report = self.read_pass(project);
        report.simplification = findings(simplification, CheckCategory::SimplifyGeometry, true);
        report.estimated_metadata = findings(estimated, CheckCategory::EstimatedMetadata, true);
        report
    }

    /// The read-only part of the pass, shared between review and repair.
    fn read_pass(&self, project: &Project) -> CheckReport {
        let mut collector = ResultCollector::new();
        safeguards::run(project, &self.config, &mut collector);

        let (autogenerated_keys, int8_primary_keys) = primary_key::invalid_primary_keys(project);

        CheckReport {
            safeguards: collector.into_findings(),
            autogenerated_keys,
            int8_primary_keys,
            duplicated_names: duplicates::duplicated_names(project),
            duplicated_filters: duplicates::duplicated_datasource_filters(project),
            trailing_names: naming::trailing_whitespace_names(project),
            legend_items: naming::legend_item_names(project),
            simplification: Vec::new(),
            estimated_metadata: Vec::new(),
            trust_metadata: project.trust_metadata(),
        }
    }
}

fn findings(entities: Vec<Entity>, category: CheckCategory, fixed: bool) -> Vec<Finding> {
    entities
        .into_iter()
        .map(|entity| {
            if fixed {
                Finding::resolved(entity, category)
            } else {
                Finding::new(entity, category)
            }
        })
        .collect()
}

fn apply_to_layer(project: &mut Project, entity: &Entity, fix: fn(&mut crate::project::Layer)) {
    if let Entity::Layer { id, .. } = entity {
        if let Some(layer) = project.layer_mut(id) {
            fix(layer);
        }
    }
}
