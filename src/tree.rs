// src/tree.rs
//! Pre-order traversal of the legend tree.
//!
//! Yields every node below the root exactly once. Iterative with an
//! explicit stack, so memory use is bounded by the tree shape rather than
//! the call stack.

use crate::project::{Group, TreeNode};

pub struct TreeWalker<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> TreeWalker<'a> {
    /// Walks the children of `root` (the root group itself is not a legend
    /// entry and is not yielded).
    #[must_use]
    pub fn new(root: &'a Group) -> Self {
        Self {
            stack: root.children.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for TreeWalker<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let TreeNode::Group(group) = node {
            self.stack.extend(group.children.iter().rev());
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Group {
        let mut root = Group::new("");
        root.add_layer("a");
        let mut nested = Group::new("g1");
        nested.add_layer("b");
        let mut deep = Group::new("g2");
        deep.add_layer("c");
        nested.add_group(deep);
        root.add_group(nested);
        root.add_layer("d");
        root
    }

    #[test]
    fn test_preorder_visits_each_node_once() {
        let root = sample_tree();
        let names: Vec<String> = TreeWalker::new(&root)
            .map(|node| match node {
                TreeNode::Layer(id) => id.clone(),
                TreeNode::Group(group) => group.name.clone(),
            })
            .collect();
        assert_eq!(names, vec!["a", "g1", "b", "g2", "c", "d"]);
    }

    #[test]
    fn test_empty_root_yields_nothing() {
        let root = Group::new("");
        assert_eq!(TreeWalker::new(&root).count(), 0);
    }
}
