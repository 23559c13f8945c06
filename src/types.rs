// src/types.rs
//! Common result structures: finding categories, entity references and the
//! aggregated report returned by one evaluation pass.

use serde::Serialize;
use std::collections::BTreeMap;

/// Category of one reported violation.
///
/// Message rendering is a presentation concern owned by the host; the core
/// only hands out the category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CheckCategory {
    PreventEcw,
    AuthenticationDb,
    PgService,
    PgForceUserPass,
    PreventDrive,
    PreventParentFolder,
    RasterWithoutPyramid,
    AutoGeneratedKey,
    InvalidInt8PrimaryKey,
    LeadingTrailingSpaceName,
    SimplifyGeometry,
    EstimatedMetadata,
    TrustProject,
}

/// Reference to the entity a finding is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Entity {
    /// The project itself, for project-level rules.
    Project,
    /// A layer, identified by its stable id; the display name travels along
    /// for host-side reporting.
    Layer { name: String, id: String },
    /// A group node; groups have no id, only a display name.
    Group { name: String },
}

impl Entity {
    #[must_use]
    pub fn layer(name: &str, id: &str) -> Self {
        Self::Layer {
            name: name.to_string(),
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn group(name: &str) -> Self {
        Self::Group {
            name: name.to_string(),
        }
    }
}

/// A single reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub entity: Entity,
    pub category: CheckCategory,
    /// True when the violation was resolved in place during a repair pass.
    pub fixed: bool,
}

impl Finding {
    #[must_use]
    pub fn new(entity: Entity, category: CheckCategory) -> Self {
        Self {
            entity,
            category,
            fixed: false,
        }
    }

    #[must_use]
    pub fn resolved(entity: Entity, category: CheckCategory) -> Self {
        Self {
            entity,
            category,
            fixed: true,
        }
    }
}

/// Aggregated results of one evaluation pass over a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    /// Safeguard findings, one per (entity, category), entity-sorted.
    pub safeguards: Vec<Finding>,
    /// Layers whose declared key column maps to no real field.
    pub autogenerated_keys: Vec<Finding>,
    /// Layers whose single primary key is an 8-byte integer.
    pub int8_primary_keys: Vec<Finding>,
    /// Display-name occurrence tally across layers and groups; a count of 2
    /// or more is a conflict.
    pub duplicated_names: BTreeMap<String, usize>,
    /// Narrative advisory for layers sharing a datasource with different
    /// SQL filters, passwords redacted. `None` when no layer carries a filter.
    pub duplicated_filters: Option<String>,
    /// Layers and groups whose display name carries leading or trailing
    /// whitespace.
    pub trailing_names: Vec<Finding>,
    /// Every legend entry name, in pre-order.
    pub legend_items: Vec<String>,
    /// Layers forcing simplification to run client-side.
    pub simplification: Vec<Finding>,
    /// Layers not using estimated metadata.
    pub estimated_metadata: Vec<Finding>,
    /// Project trust-metadata flag after the pass (repair enables it).
    pub trust_metadata: bool,
}

impl CheckReport {
    /// Returns true if any per-entity finding or name conflict was reported.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        self.total_findings() > 0
            || self.duplicated_filters.is_some()
            || self.duplicated_names.values().any(|count| *count >= 2)
    }

    /// Total number of per-entity findings across all categories.
    #[must_use]
    pub fn total_findings(&self) -> usize {
        self.finding_lists().map(Vec::len).sum()
    }

    /// Number of findings resolved in place, for "N issues fixed" summaries.
    #[must_use]
    pub fn fixed_count(&self) -> usize {
        self.finding_lists()
            .flat_map(|list| list.iter())
            .filter(|finding| finding.fixed)
            .count()
    }

    fn finding_lists(&self) -> impl Iterator<Item = &Vec<Finding>> {
        [
            &self.safeguards,
            &self.autogenerated_keys,
            &self.int8_primary_keys,
            &self.trailing_names,
            &self.simplification,
            &self.estimated_metadata,
        ]
        .into_iter()
    }
}
