// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Hierarchical structures: the AI-proposed `TreeNode` payload and the
//! document-owned `TreeContainer` arena.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::geometry::Size;
use super::ids::ElementId;

/// A hierarchical content proposal (e.g. a mind-map subtree).
///
/// Ownership makes the structure acyclic; child order is rank order and is
/// preserved on merge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeNode {
    pub text: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), children: Vec::new() }
    }

    pub fn with_children(text: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self { text: text.into(), children }
    }

    /// Total number of nodes including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    /// A node with no text and no children carries nothing to insert.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.children.is_empty()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }
}

pub type ChildIds = SmallVec<[ElementId; 4]>;

/// One tree node inside a container, keyed by the id of the shape it owns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeLink {
    parent: Option<ElementId>,
    children: ChildIds,
    extent: Size,
}

impl TreeLink {
    pub fn parent(&self) -> Option<&ElementId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Derived branch size: this node plus everything laid out under it.
    pub fn extent(&self) -> Size {
        self.extent
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("tree node {node_id} is not part of this tree")]
    UnknownNode { node_id: ElementId },
    #[error("tree node {node_id} is already linked")]
    AlreadyLinked { node_id: ElementId },
    #[error("moving {node_id} under {parent_id} would create a cycle")]
    Cycle { node_id: ElementId, parent_id: ElementId },
    #[error("the root node {node_id} cannot be reparented")]
    RootMove { node_id: ElementId },
}

/// A rooted, ordered hierarchy of shape elements stored as an id-indexed arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeContainer {
    root: ElementId,
    links: BTreeMap<ElementId, TreeLink>,
}

impl TreeContainer {
    pub fn new(root: ElementId) -> Self {
        let mut links = BTreeMap::new();
        links.insert(root.clone(), TreeLink::default());
        Self { root, links }
    }

    pub fn root(&self) -> &ElementId {
        &self.root
    }

    pub fn links(&self) -> &BTreeMap<ElementId, TreeLink> {
        &self.links
    }

    pub fn link(&self, node_id: &ElementId) -> Option<&TreeLink> {
        self.links.get(node_id)
    }

    pub fn contains(&self, node_id: &ElementId) -> bool {
        self.links.contains_key(node_id)
    }

    pub fn children(&self, node_id: &ElementId) -> &[ElementId] {
        self.links.get(node_id).map(TreeLink::children).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Appends `node_id` as the last child of `parent_id`.
    pub fn attach(&mut self, node_id: ElementId, parent_id: &ElementId) -> Result<(), TreeError> {
        if self.links.contains_key(&node_id) {
            return Err(TreeError::AlreadyLinked { node_id });
        }
        let Some(parent) = self.links.get_mut(parent_id) else {
            return Err(TreeError::UnknownNode { node_id: parent_id.clone() });
        };
        parent.children.push(node_id.clone());
        self.links.insert(
            node_id,
            TreeLink { parent: Some(parent_id.clone()), ..TreeLink::default() },
        );
        Ok(())
    }

    /// Moves an existing node (and its subtree) under `parent_id` at `index`.
    ///
    /// `index` is clamped to the new parent's child count.
    pub fn reparent(
        &mut self,
        node_id: &ElementId,
        parent_id: &ElementId,
        index: usize,
    ) -> Result<(), TreeError> {
        if node_id == &self.root {
            return Err(TreeError::RootMove { node_id: node_id.clone() });
        }
        if !self.links.contains_key(node_id) {
            return Err(TreeError::UnknownNode { node_id: node_id.clone() });
        }
        if !self.links.contains_key(parent_id) {
            return Err(TreeError::UnknownNode { node_id: parent_id.clone() });
        }
        if self.is_ancestor_or_self(node_id, parent_id) {
            return Err(TreeError::Cycle { node_id: node_id.clone(), parent_id: parent_id.clone() });
        }

        let old_parent_id = self.links.get(node_id).and_then(|link| link.parent.clone());
        if let Some(old_parent_id) = old_parent_id {
            if let Some(old_parent) = self.links.get_mut(&old_parent_id) {
                old_parent.children.retain(|child| child != node_id);
            }
        }
        if let Some(parent) = self.links.get_mut(parent_id) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, node_id.clone());
        }
        if let Some(link) = self.links.get_mut(node_id) {
            link.parent = Some(parent_id.clone());
        }
        Ok(())
    }

    /// Unlinks `node_id` and its whole subtree. The root cannot be detached.
    pub fn detach(&mut self, node_id: &ElementId) -> Result<Vec<ElementId>, TreeError> {
        if node_id == &self.root {
            return Err(TreeError::RootMove { node_id: node_id.clone() });
        }
        let Some(link) = self.links.get(node_id) else {
            return Err(TreeError::UnknownNode { node_id: node_id.clone() });
        };
        if let Some(parent_id) = link.parent.clone() {
            if let Some(parent) = self.links.get_mut(&parent_id) {
                parent.children.retain(|child| child != node_id);
            }
        }

        let subtree = self.post_order(node_id);
        for id in &subtree {
            self.links.remove(id);
        }
        Ok(subtree)
    }

    pub fn set_extent(&mut self, node_id: &ElementId, extent: Size) -> Result<(), TreeError> {
        let Some(link) = self.links.get_mut(node_id) else {
            return Err(TreeError::UnknownNode { node_id: node_id.clone() });
        };
        link.extent = extent;
        Ok(())
    }

    /// True when `ancestor` is `node` or lies on the path from `node` to the root.
    pub fn is_ancestor_or_self(&self, ancestor: &ElementId, node: &ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.links.get(current).and_then(|link| link.parent.as_ref());
        }
        false
    }

    /// Path from `node_id` up to and including the root.
    pub fn ancestors_inclusive(&self, node_id: &ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cursor = self.links.contains_key(node_id).then(|| node_id.clone());
        while let Some(current) = cursor {
            cursor = self.links.get(&current).and_then(|link| link.parent.clone());
            path.push(current);
        }
        path
    }

    /// Children before parents, siblings in rank order.
    pub fn post_order(&self, from: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.links.len());
        let mut stack = vec![(from.clone(), false)];
        while let Some((node_id, expanded)) = stack.pop() {
            if expanded {
                out.push(node_id);
                continue;
            }
            let children = self.children(&node_id).to_vec();
            stack.push((node_id, true));
            for child in children.into_iter().rev() {
                stack.push((child, false));
            }
        }
        out
    }

    /// Parents before children, siblings in rank order.
    pub fn pre_order(&self, from: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.links.len());
        let mut stack = vec![from.clone()];
        while let Some(node_id) = stack.pop() {
            for child in self.children(&node_id).iter().rev() {
                stack.push(child.clone());
            }
            out.push(node_id);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{TreeContainer, TreeError, TreeNode};
    use crate::model::ElementId;

    fn id(raw: &str) -> ElementId {
        ElementId::new(raw).expect("element id")
    }

    fn sample() -> TreeContainer {
        let mut tree = TreeContainer::new(id("root"));
        tree.attach(id("a"), &id("root")).expect("attach a");
        tree.attach(id("b"), &id("root")).expect("attach b");
        tree.attach(id("a1"), &id("a")).expect("attach a1");
        tree
    }

    #[test]
    fn tree_node_counts_and_depth() {
        let node = TreeNode::with_children(
            "root",
            vec![TreeNode::with_children("a", vec![TreeNode::new("a1")]), TreeNode::new("b")],
        );
        assert_eq!(node.len(), 4);
        assert_eq!(node.depth(), 3);
        assert!(!node.is_blank());
        assert!(TreeNode::new("  ").is_blank());
    }

    #[test]
    fn traversal_orders_respect_rank() {
        let tree = sample();
        assert_eq!(tree.post_order(&id("root")), vec![id("a1"), id("a"), id("b"), id("root")]);
        assert_eq!(tree.pre_order(&id("root")), vec![id("root"), id("a"), id("a1"), id("b")]);
    }

    #[test]
    fn reparent_moves_subtree_and_rejects_cycles() {
        let mut tree = sample();
        tree.reparent(&id("a"), &id("b"), 0).expect("reparent");
        assert_eq!(tree.children(&id("root")), &[id("b")]);
        assert_eq!(tree.children(&id("b")), &[id("a")]);

        let err = tree.reparent(&id("b"), &id("a1"), 0).unwrap_err();
        assert_eq!(err, TreeError::Cycle { node_id: id("b"), parent_id: id("a1") });

        let err = tree.reparent(&id("root"), &id("a"), 0).unwrap_err();
        assert_eq!(err, TreeError::RootMove { node_id: id("root") });
    }

    #[test]
    fn attach_rejects_duplicates_and_unknown_parents() {
        let mut tree = sample();
        assert_eq!(
            tree.attach(id("a"), &id("b")),
            Err(TreeError::AlreadyLinked { node_id: id("a") })
        );
        assert_eq!(
            tree.attach(id("z"), &id("missing")),
            Err(TreeError::UnknownNode { node_id: id("missing") })
        );
        assert_eq!(tree.ancestors_inclusive(&id("a1")), vec![id("a1"), id("a"), id("root")]);
    }
}
