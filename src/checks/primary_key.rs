// src/checks/primary_key.rs
//! Primary-key sanity for vector layers.
//!
//! Two independent defects: a declared key column that maps to no real
//! field (the backing store exposed an implicit row id), and a single
//! 8-byte integer key, which a JSON-speaking web stack cannot round-trip
//! without precision loss. Composite keys are out of scope for both.

use crate::project::{Layer, Project};
use crate::types::{CheckCategory, Entity, Finding};

/// Returns the declared key column when it does not exist among the layer's
/// fields. `None` for rasters, keyless sources and composite keys.
#[must_use]
pub fn auto_generated_key(layer: &Layer) -> Option<String> {
    let vector = layer.vector()?;
    let uri = layer.datasource();
    if uri.key_column.is_empty() {
        // GeoJSON and friends: no declared key at all.
        return None;
    }
    if vector.primary_key_attributes.len() >= 2 {
        return None;
    }
    if vector
        .fields
        .iter()
        .any(|field| field.name == uri.key_column)
    {
        return None;
    }
    Some(uri.key_column)
}

/// True when the layer's sole primary key is the declared key column, the
/// field exists, and its declared type is an 8-byte integer.
#[must_use]
pub fn invalid_int8_key(layer: &Layer) -> bool {
    let Some(vector) = layer.vector() else {
        return false;
    };
    if vector.primary_key_attributes.len() != 1 {
        // No key, or a composite key.
        return false;
    }
    let uri = layer.datasource();
    if uri.key_column.is_empty() || vector.primary_key_attributes[0] != uri.key_column {
        return false;
    }
    let Some(field) = vector
        .fields
        .iter()
        .find(|field| field.name == uri.key_column)
    else {
        // Missing field is auto_generated_key territory, not ours.
        return false;
    };
    field.type_name.eq_ignore_ascii_case("int8")
}

/// Sweeps the whole project for both key defects in one pass.
#[must_use]
pub fn invalid_primary_keys(project: &Project) -> (Vec<Finding>, Vec<Finding>) {
    let mut autogenerated = Vec::new();
    let mut int8 = Vec::new();
    for layer in project.layers() {
        if !layer.is_vector() {
            continue;
        }
        let entity = Entity::layer(&layer.name, &layer.id);
        if auto_generated_key(layer).is_some() {
            autogenerated.push(Finding::new(entity.clone(), CheckCategory::AutoGeneratedKey));
        }
        if invalid_int8_key(layer) {
            int8.push(Finding::new(entity, CheckCategory::InvalidInt8PrimaryKey));
        }
    }
    (autogenerated, int8)
}
