// src/checks/naming.rs
//! Display-name hygiene over the legend tree.

use crate::project::{Project, TreeNode};
use crate::tree::TreeWalker;
use crate::types::{CheckCategory, Entity, Finding};

/// Flags every layer and group whose display name differs from its trimmed
/// form. Pre-order walk; every node is visited exactly once, whatever the
/// tree depth.
#[must_use]
pub fn trailing_whitespace_names(project: &Project) -> Vec<Finding> {
    let mut findings = Vec::new();
    for node in TreeWalker::new(project.root()) {
        match node {
            TreeNode::Layer(id) => {
                let Some(layer) = project.layer(id) else {
                    continue;
                };
                if layer.name.trim() != layer.name {
                    findings.push(Finding::new(
                        Entity::layer(&layer.name, &layer.id),
                        CheckCategory::LeadingTrailingSpaceName,
                    ));
                }
            }
            TreeNode::Group(group) => {
                if group.name.trim() != group.name {
                    findings.push(Finding::new(
                        Entity::group(&group.name),
                        CheckCategory::LeadingTrailingSpaceName,
                    ));
                }
            }
        }
    }
    findings
}

/// Every legend entry name in pre-order, for host-side legend-size
/// advisories.
#[must_use]
pub fn legend_item_names(project: &Project) -> Vec<String> {
    TreeWalker::new(project.root())
        .map(|node| match node {
            TreeNode::Layer(id) => project
                .layer(id)
                .map_or_else(|| id.clone(), |layer| layer.name.clone()),
            TreeNode::Group(group) => group.name.clone(),
        })
        .collect()
}
