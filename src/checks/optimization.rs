// src/checks/optimization.rs
//! Serving-efficiency rules, each a pure predicate plus a fix mutator.
//!
//! The orchestrator couples them: a review pass only runs the predicates, a
//! repair pass applies the mutator to every candidate. Each fix is one
//! atomic field assignment, so re-running a fixed layer yields no finding.

use crate::project::{GeometryKind, Layer, LayerKind, Project};
use crate::types::Entity;

/// True for PostgreSQL vector layers with simplifiable geometry that force
/// simplification to run client-side.
#[must_use]
pub fn needs_server_side_simplification(layer: &Layer) -> bool {
    if !layer.is_vector_postgres(true) {
        return false;
    }
    let Some(vector) = layer.vector() else {
        return false;
    };
    if vector.geometry == GeometryKind::Point {
        // Points are never simplified.
        return false;
    }
    vector.simplify_force_local
}

/// Fix: let simplification run server-side.
pub fn clear_force_local_simplification(layer: &mut Layer) {
    if let LayerKind::Vector(ref mut vector) = layer.kind {
        vector.simplify_force_local = false;
    }
}

/// True for PostgreSQL vector layers not using estimated table metadata.
#[must_use]
pub fn estimated_metadata_disabled(layer: &Layer) -> bool {
    layer.is_vector_postgres(true) && !layer.datasource().estimated_metadata
}

/// Fix: enable estimated metadata and push the edited descriptor back
/// through the layer, refreshing the provider-facing source string.
pub fn enable_estimated_metadata(layer: &mut Layer) {
    let mut uri = layer.datasource();
    uri.estimated_metadata = true;
    layer.set_datasource(&uri);
}

#[must_use]
pub fn simplification_candidates(project: &Project) -> Vec<Entity> {
    candidates(project, needs_server_side_simplification)
}

#[must_use]
pub fn estimated_metadata_candidates(project: &Project) -> Vec<Entity> {
    candidates(project, estimated_metadata_disabled)
}

fn candidates(project: &Project, predicate: fn(&Layer) -> bool) -> Vec<Entity> {
    project
        .layers()
        .filter(|layer| predicate(layer))
        .map(|layer| Entity::layer(&layer.name, &layer.id))
        .collect()
}
