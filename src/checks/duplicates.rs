// src/checks/duplicates.rs
//! Cross-entity duplicate detection.
//!
//! The downstream publishing format keys its configuration on display
//! names, so names must be globally unique across layers and groups. And a
//! datasource shared by several layers that differ only in their SQL filter
//! is almost always a modelling mistake; the detector reports those as one
//! consolidated advisory rather than per-layer findings.

use crate::datasource::DataSourceDescriptor;
use crate::project::{Project, TreeNode};
use crate::tree::TreeWalker;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Occurrence count per display name, over all layers and all groups
/// (nested included). A count of 2 or more is a conflict.
#[must_use]
pub fn duplicated_names(project: &Project) -> BTreeMap<String, usize> {
    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for layer in project.layers() {
        *tally.entry(layer.name.clone()).or_insert(0) += 1;
    }
    for node in TreeWalker::new(project.root()) {
        if let TreeNode::Group(group) = node {
            *tally.entry(group.name.clone()).or_insert(0) += 1;
        }
    }
    tally
}

/// Consolidated advisory for layers sharing one datasource under different
/// filters. Datasource strings in the text are password-redacted. `None`
/// when no layer carries a filter at all.
#[must_use]
pub fn duplicated_datasource_filters(project: &Project) -> Option<String> {
    // datasource-without-filter -> filter -> first layer seen with it
    let mut grouped: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for layer in project.layers() {
        let uri = layer.datasource();
        if !uri.has_filter() {
            continue;
        }
        grouped
            .entry(uri.without_filter())
            .or_default()
            .entry(uri.sql.clone())
            .or_insert_with(|| layer.name.clone());
    }

    if grouped.is_empty() {
        return None;
    }

    let mut text = String::new();
    for (datasource, filters) in &grouped {
        if filters.len() <= 1 {
            continue;
        }
        let layer_names = quoted_list(filters.values());
        let filter_list = quoted_list(filters.keys());
        let redacted = DataSourceDescriptor::parse(datasource).to_connection_string(false);
        let _ = writeln!(
            text,
            "Review layers {layer_names} having the same datasource '{redacted}' \
             with these filters {filter_list}."
        );
    }
    text.push('\n');
    text.push_str(
        "Checkboxes are supported natively in the legend. Using filters for \
         the same datasource is highly discouraged.\n",
    );
    Some(text)
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items
        .map(|item| format!("'{item}'"))
        .collect::<Vec<_>>()
        .join(",")
}
