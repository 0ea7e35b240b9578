// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::element::{DocumentElement, ElementKind};
use super::ids::ElementId;
use super::tree::TreeContainer;

/// The shared element graph. Owns every element beyond any single action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    elements: BTreeMap<ElementId, DocumentElement>,
    rev: u64,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &BTreeMap<ElementId, DocumentElement> {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut BTreeMap<ElementId, DocumentElement> {
        &mut self.elements
    }

    pub(crate) fn replace_elements(&mut self, elements: BTreeMap<ElementId, DocumentElement>) {
        self.elements = elements;
    }

    pub fn element(&self, id: &ElementId) -> Option<&DocumentElement> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    /// Hands out a fresh `el-<n>` id that is not used by any element.
    pub fn allocate_id(&mut self) -> ElementId {
        loop {
            self.next_id = self.next_id.saturating_add(1);
            let candidate = ElementId::allocated(self.next_id);
            if !self.elements.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn tree(&self, container_id: &ElementId) -> Option<&TreeContainer> {
        self.elements.get(container_id).and_then(DocumentElement::as_tree)
    }

    /// Container owning `shape_id`, if the shape is a tree node.
    pub fn tree_of(&self, shape_id: &ElementId) -> Option<&ElementId> {
        self.elements.get(shape_id)?.as_shape()?.tree.as_ref()
    }

    /// Container whose root node is `shape_id`.
    pub fn tree_rooted_at(&self, shape_id: &ElementId) -> Option<&ElementId> {
        let container_id = self.tree_of(shape_id)?;
        let tree = self.tree(container_id)?;
        (tree.root() == shape_id).then_some(container_id)
    }

    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.elements.values().filter(|element| element.kind() == kind).count()
    }

    pub fn ids_of_kind(&self, kind: ElementKind) -> Vec<ElementId> {
        self.elements
            .values()
            .filter(|element| element.kind() == kind)
            .map(|element| element.id().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::model::{DocumentElement, ElementBody, ElementId, ElementKind, Rect, TreeContainer};

    #[test]
    fn allocate_id_skips_ids_already_in_use() {
        let mut doc = Document::new();
        let taken = ElementId::new("el-1").expect("id");
        doc.elements_mut()
            .insert(taken.clone(), DocumentElement::text_block(taken, Rect::default()));

        assert_eq!(doc.allocate_id().as_str(), "el-2");
        assert_eq!(doc.allocate_id().as_str(), "el-3");
    }

    #[test]
    fn tree_rooted_at_only_matches_root_shapes() {
        let mut doc = Document::new();
        let container = ElementId::new("tree").expect("id");
        let root = ElementId::new("root").expect("id");
        let child = ElementId::new("child").expect("id");
        let mut tree = TreeContainer::new(root.clone());
        tree.attach(child.clone(), &root).expect("attach");

        doc.elements_mut().insert(
            container.clone(),
            DocumentElement::new(container.clone(), Rect::default(), ElementBody::TreeContainer(tree)),
        );
        for id in [&root, &child] {
            doc.elements_mut().insert(
                id.clone(),
                DocumentElement::shape(id.clone(), Rect::default(), "n", Some(container.clone())),
            );
        }

        assert_eq!(doc.tree_rooted_at(&root), Some(&container));
        assert_eq!(doc.tree_rooted_at(&child), None);
        assert_eq!(doc.tree_of(&child), Some(&container));
        assert_eq!(doc.count_kind(ElementKind::Shape), 2);
    }
}
