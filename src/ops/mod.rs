// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural mutations of the document.
//!
//! Ops are applied with optimistic concurrency (revision checks) against a copy of the
//! element table; the copy replaces the live table only when every op succeeded, so a
//! batch is never partially visible.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    AssetId, Block, Document, DocumentElement, ElementBody, ElementId, ElementKind, Point, Rect,
    Size, TreeError,
};

pub mod transaction;

pub use transaction::{CommitOutcome, Deferred, DeferredError, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Create {
        element: DocumentElement,
    },
    UpdateBounds {
        id: ElementId,
        bounds: Rect,
    },
    /// Moves an element's origin. Moving a tree container translates every node it owns.
    Move {
        id: ElementId,
        to: Point,
    },
    /// Links an already created shape as the last child of `parent`.
    AttachNode {
        container: ElementId,
        node: ElementId,
        parent: ElementId,
    },
    Reparent {
        container: ElementId,
        node: ElementId,
        parent: ElementId,
        index: usize,
    },
    SetExtent {
        container: ElementId,
        node: ElementId,
        extent: Size,
    },
    SetText {
        id: ElementId,
        text: String,
    },
    SetBlocks {
        id: ElementId,
        blocks: Vec<Block>,
    },
    /// Removes an element. Containers take their shapes along; a tree shape takes its
    /// subtree along, and removing a root shape removes the whole tree.
    Remove {
        id: ElementId,
    },
}

impl Op {
    pub fn create(element: DocumentElement) -> Self {
        Self::Create { element }
    }
}

/// Answers whether an asset's bytes are available to the document.
pub trait AssetLookup {
    fn is_bound(&self, asset_id: &AssetId) -> bool;
}

impl AssetLookup for BTreeSet<AssetId> {
    fn is_bound(&self, asset_id: &AssetId) -> bool {
        self.contains(asset_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which elements changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementId>,
    pub removed: Vec<ElementId>,
    pub updated: Vec<ElementId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ElementId>,
    removed: BTreeSet<ElementId>,
    updated: BTreeSet<ElementId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, id: ElementId) {
        self.updated.remove(&id);
        if !self.removed.remove(&id) {
            self.added.insert(id);
        } else {
            self.updated.insert(id);
        }
    }

    fn record_removed(&mut self, id: ElementId) {
        self.updated.remove(&id);
        if !self.added.remove(&id) {
            self.removed.insert(id);
        }
    }

    fn record_updated(&mut self, id: ElementId) {
        if self.added.contains(&id) || self.removed.contains(&id) {
            return;
        }
        self.updated.insert(id);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyError {
    #[error("stale base_rev (base_rev={base_rev}, current_rev={current_rev})")]
    Conflict { base_rev: u64, current_rev: u64 },
    #[error("element already exists (id={element_id})")]
    AlreadyExists { element_id: ElementId },
    #[error("element not found (id={element_id})")]
    NotFound { element_id: ElementId },
    #[error("element {element_id} is a {found}, expected a {expected}")]
    KindMismatch { element_id: ElementId, expected: ElementKind, found: ElementKind },
    #[error("image references asset {asset_id} before it was bound")]
    UnboundAsset { asset_id: AssetId },
    #[error("tree {container_id}: {source}")]
    Tree { container_id: ElementId, source: TreeError },
    #[error("shape {node_id} does not belong to tree {container_id}")]
    NotInTree { container_id: ElementId, node_id: ElementId },
    #[error("tree {container_id} links node {node_id} without a matching shape")]
    DanglingTreeNode { container_id: ElementId, node_id: ElementId },
}

pub fn apply_ops(
    document: &mut Document,
    base_rev: u64,
    ops: &[Op],
    assets: &dyn AssetLookup,
) -> Result<ApplyResult, ApplyError> {
    let current_rev = document.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    if ops.is_empty() {
        return Ok(ApplyResult { new_rev: current_rev, applied: 0, delta: Delta::default() });
    }

    let mut elements = document.elements().clone();
    let mut delta = DeltaBuilder::default();
    let mut touched_trees = BTreeSet::new();

    for op in ops {
        apply_op(&mut elements, op, assets, &mut delta, &mut touched_trees)?;
    }
    validate_trees(&elements, &touched_trees)?;

    document.replace_elements(elements);
    document.bump_rev();

    Ok(ApplyResult { new_rev: document.rev(), applied: ops.len(), delta: delta.finish() })
}

// Extracted op-application implementation for element/tree mutations.
include!("ops_impl.rs");
