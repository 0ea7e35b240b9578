// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tree merge engine.
//!
//! Grafts AI-proposed `TreeNode` payloads into existing tree containers (expand) or
//! builds a fresh container from them (create). The engine only plans: it appends ops
//! to the caller's transaction and defers the final layout until after commit, when
//! every fitted size and branch extent is visible in the store.

use std::collections::BTreeMap;

use crate::config::MindmapConfig;
use crate::layout::{layout_tree, measure_branches, GeometryResolver};
use crate::model::{
    Document, DocumentElement, ElementBody, ElementId, Point, Rect, SelectionRegion,
    TreeContainer, TreeError, TreeNode,
};
use crate::ops::{Op, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("element {element_id} not found")]
    MissingElement { element_id: ElementId },
    #[error("element {element_id} is not a node of any tree")]
    NotATreeNode { element_id: ElementId },
    /// The store handed out an id the tree already links.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// What a merge planned into the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub container: ElementId,
    pub root: ElementId,
    /// New shapes in payload pre-order.
    pub created: Vec<ElementId>,
    /// Container deleted because the new tree replaced it.
    pub replaced: Option<ElementId>,
}

#[derive(Debug, Clone)]
pub struct TreeMergeEngine {
    config: MindmapConfig,
    geometry: GeometryResolver,
}

/// Local working copy of a tree while new nodes are grafted.
struct Plan {
    container: ElementId,
    tree: TreeContainer,
    origin: Point,
    new_texts: BTreeMap<ElementId, String>,
    created: Vec<ElementId>,
}

impl TreeMergeEngine {
    pub fn new(config: MindmapConfig, geometry: GeometryResolver) -> Self {
        Self { config, geometry }
    }

    /// Attaches the payload's children (and their subtrees) under `target`.
    ///
    /// The payload's own root stands for `target` and is not inserted. Returns `None`
    /// without touching the transaction when the payload has no children.
    pub fn expand(
        &self,
        txn: &mut Transaction<'_>,
        target: &ElementId,
        payload: &TreeNode,
    ) -> Result<Option<MergeOutcome>, MergeError> {
        if payload.children.is_empty() {
            tracing::debug!(target = %target, "expand payload has no children");
            return Ok(None);
        }

        let document = txn.store().snapshot();
        let target_element = document
            .element(target)
            .ok_or_else(|| MergeError::MissingElement { element_id: target.clone() })?;
        let container = document
            .tree_of(target)
            .cloned()
            .ok_or_else(|| MergeError::NotATreeNode { element_id: target.clone() })?;
        let tree = document
            .tree(&container)
            .cloned()
            .ok_or_else(|| MergeError::MissingElement { element_id: container.clone() })?;

        let mut plan = Plan {
            container,
            tree,
            origin: target_element.bounds().origin(),
            new_texts: BTreeMap::new(),
            created: Vec::new(),
        };
        for child in &payload.children {
            self.graft(txn, &mut plan, target, child)?;
        }
        self.fit(txn, &document, &plan);
        self.defer_layout(txn, &plan.container);

        tracing::info!(
            container = %plan.container,
            target = %target,
            created = plan.created.len(),
            "mind map expanded"
        );
        Ok(Some(MergeOutcome {
            root: plan.tree.root().clone(),
            container: plan.container,
            created: plan.created,
            replaced: None,
        }))
    }

    /// Builds a new tree container with `payload` as its root.
    ///
    /// When `replace` is the root shape of an existing tree, that tree is deleted in the
    /// same transaction and the new root takes over its position. Otherwise the root is
    /// anchored at the selection, or at the margin-offset origin without one.
    pub fn create(
        &self,
        txn: &mut Transaction<'_>,
        payload: &TreeNode,
        selection: Option<&SelectionRegion>,
        replace: Option<&ElementId>,
    ) -> Result<Option<MergeOutcome>, MergeError> {
        if payload.is_blank() {
            tracing::debug!("create payload is blank");
            return Ok(None);
        }

        let document = txn.store().snapshot();
        let replaced = replace.and_then(|shape_id| {
            let container = document.tree_rooted_at(shape_id)?.clone();
            let bounds = document.element(shape_id)?.bounds();
            Some((container, bounds))
        });

        let mut origin = self.geometry.anchor(selection);
        if let Some((old_container, old_root_bounds)) = &replaced {
            txn.push(Op::Remove { id: old_container.clone() });
            if !old_root_bounds.is_empty() {
                origin = old_root_bounds.origin();
            }
        }

        let store = txn.store();
        let container = store.allocate_id();
        let root = store.allocate_id();
        let tree = TreeContainer::new(root.clone());
        txn.push(Op::create(DocumentElement::new(
            container.clone(),
            Rect::from_origin_size(origin, self.config.min_node),
            ElementBody::TreeContainer(tree.clone()),
        )));
        txn.push(Op::create(DocumentElement::shape(
            root.clone(),
            Rect::from_origin_size(origin, self.config.min_node),
            payload.text.clone(),
            Some(container.clone()),
        )));

        let mut plan = Plan {
            container,
            tree,
            origin,
            new_texts: BTreeMap::from([(root.clone(), payload.text.clone())]),
            created: vec![root.clone()],
        };
        for child in &payload.children {
            self.graft(txn, &mut plan, &root, child)?;
        }
        self.fit(txn, &document, &plan);
        self.defer_layout(txn, &plan.container);

        tracing::info!(
            container = %plan.container,
            nodes = plan.created.len(),
            replaced = replaced.is_some(),
            "mind map created"
        );
        Ok(Some(MergeOutcome {
            container: plan.container,
            root,
            created: plan.created,
            replaced: replaced.map(|(container, _)| container),
        }))
    }

    /// Creates and links `node` and its subtree under `parent`, in payload order.
    fn graft(
        &self,
        txn: &mut Transaction<'_>,
        plan: &mut Plan,
        parent: &ElementId,
        node: &TreeNode,
    ) -> Result<(), MergeError> {
        let mut stack = vec![(parent.clone(), node)];
        while let Some((parent_id, node)) = stack.pop() {
            let node_id = txn.store().allocate_id();
            txn.push(Op::create(DocumentElement::shape(
                node_id.clone(),
                Rect::from_origin_size(plan.origin, self.config.min_node),
                node.text.clone(),
                Some(plan.container.clone()),
            )));
            txn.push(Op::AttachNode {
                container: plan.container.clone(),
                node: node_id.clone(),
                parent: parent_id.clone(),
            });
            plan.tree.attach(node_id.clone(), &parent_id)?;
            plan.new_texts.insert(node_id.clone(), node.text.clone());
            plan.created.push(node_id.clone());

            for child in node.children.iter().rev() {
                stack.push((node_id.clone(), child));
            }
        }
        Ok(())
    }

    /// Post-order fit: every new shape is sized from its text and every branch extent is
    /// recomputed from already-fitted children.
    fn fit(&self, txn: &mut Transaction<'_>, document: &Document, plan: &Plan) {
        let fits = measure_branches(&self.config, &plan.tree, plan.tree.root(), |node_id| {
            match plan.new_texts.get(node_id) {
                Some(text) => crate::layout::fit_shape(&self.config, text),
                None => document
                    .element(node_id)
                    .map(|element| element.bounds().size())
                    .unwrap_or(self.config.min_node),
            }
        });

        for fit in fits {
            if plan.new_texts.contains_key(&fit.node_id) {
                txn.push(Op::UpdateBounds {
                    id: fit.node_id.clone(),
                    bounds: Rect::from_origin_size(plan.origin, fit.own),
                });
            }
            let stored = plan.tree.link(&fit.node_id).map(|link| link.extent());
            if stored != Some(fit.extent) {
                txn.push(Op::SetExtent {
                    container: plan.container.clone(),
                    node: fit.node_id,
                    extent: fit.extent,
                });
            }
        }
    }

    fn defer_layout(&self, txn: &mut Transaction<'_>, container: &ElementId) {
        let config = self.config.clone();
        let container = container.clone();
        txn.defer("layout-mindmap", move |store| {
            let ops = layout_tree(&config, &store.snapshot(), &container)?;
            store.transact(&ops)?;
            Ok(())
        });
    }
}
