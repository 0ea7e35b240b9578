// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fit-sizing and placement for mind-map trees.
//!
//! Branch extents are derived bottom-up: a node's extent covers its own shape plus the
//! column of child branches to its right, so it can only be computed once every child
//! extent is known. Placement then walks top-down using those extents.

use std::collections::BTreeMap;

use crate::config::MindmapConfig;
use crate::model::{Document, ElementId, ElementKind, Point, Rect, Size, TreeContainer};
use crate::ops::Op;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MindmapLayoutError {
    #[error("tree container {container_id} not found")]
    MissingTree { container_id: ElementId },
    #[error("tree {container_id} links node {node_id} that has no shape")]
    MissingNode { container_id: ElementId, node_id: ElementId },
}

/// Size of a node shape holding `text`.
///
/// Lines wider than the maximum node width wrap; the result never drops below the
/// configured minimum.
pub fn fit_shape(config: &MindmapConfig, text: &str) -> Size {
    let available = (config.max_node_width - 2.0 * config.padding_x).max(config.char_width);
    let mut widest = 0.0_f64;
    let mut line_count = 0usize;
    for line in text.lines().chain(text.is_empty().then_some("")) {
        let width = line.trim_end().chars().count() as f64 * config.char_width;
        let wraps = (width / available).ceil().max(1.0);
        widest = widest.max(width.min(available));
        line_count += wraps as usize;
    }

    let w = (widest + 2.0 * config.padding_x).clamp(config.min_node.w, config.max_node_width);
    let h = (line_count as f64 * config.line_height + 2.0 * config.padding_y).max(config.min_node.h);
    Size::new(w, h)
}

/// Extent of a branch whose root shape is `own` and whose children have `child_extents`.
pub fn branch_extent(config: &MindmapConfig, own: Size, child_extents: &[Size]) -> Size {
    if child_extents.is_empty() {
        return own;
    }
    let widest = child_extents.iter().map(|extent| extent.w).fold(0.0, f64::max);
    let column = child_column_height(config, child_extents);
    Size::new(own.w + config.h_gap + widest, own.h.max(column))
}

fn child_column_height(config: &MindmapConfig, child_extents: &[Size]) -> f64 {
    let total: f64 = child_extents.iter().map(|extent| extent.h).sum();
    total + config.v_gap * child_extents.len().saturating_sub(1) as f64
}

/// Fitted geometry of one tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchFit {
    pub node_id: ElementId,
    /// The node's own shape size.
    pub own: Size,
    /// The branch extent: own shape plus every child branch.
    pub extent: Size,
}

/// Fits every node under `from` in post-order, children before their parent.
///
/// `node_size` is asked for each node's own shape size in that same order, so a
/// parent is always measured after all of its descendants.
pub fn measure_branches(
    config: &MindmapConfig,
    tree: &TreeContainer,
    from: &ElementId,
    mut node_size: impl FnMut(&ElementId) -> Size,
) -> Vec<BranchFit> {
    let mut extents = BTreeMap::<ElementId, Size>::new();
    let mut fits = Vec::with_capacity(tree.len());
    for node_id in tree.post_order(from) {
        let own = node_size(&node_id);
        let child_extents = tree
            .children(&node_id)
            .iter()
            .filter_map(|child| extents.get(child).copied())
            .collect::<Vec<Size>>();
        let extent = branch_extent(config, own, &child_extents);
        extents.insert(node_id.clone(), extent);
        fits.push(BranchFit { node_id, own, extent });
    }
    fits
}

/// Ops placing every node of a committed tree around its root's current position.
///
/// Children sit in a column to the right of their parent, vertically centred on it;
/// the container's bounds become the root branch's extent.
pub fn layout_tree(
    config: &MindmapConfig,
    document: &Document,
    container_id: &ElementId,
) -> Result<Vec<Op>, MindmapLayoutError> {
    let tree = document
        .tree(container_id)
        .ok_or_else(|| MindmapLayoutError::MissingTree { container_id: container_id.clone() })?;

    let bounds_of = |node_id: &ElementId| -> Result<Rect, MindmapLayoutError> {
        document
            .element(node_id)
            .filter(|element| element.kind() == ElementKind::Shape)
            .map(|element| element.bounds())
            .ok_or_else(|| MindmapLayoutError::MissingNode {
                container_id: container_id.clone(),
                node_id: node_id.clone(),
            })
    };
    let extent_of = |node_id: &ElementId, own: Size| {
        tree.link(node_id).map(|link| link.extent()).filter(|extent| extent.h > 0.0).unwrap_or(own)
    };

    let root = tree.root().clone();
    let root_bounds = bounds_of(&root)?;
    let root_extent = extent_of(&root, root_bounds.size());
    let branch_top = root_bounds.y - (root_extent.h - root_bounds.h) / 2.0;

    let mut ops = Vec::new();
    let mut stack = vec![(root, root_bounds.x, branch_top)];
    while let Some((node_id, x, top)) = stack.pop() {
        let bounds = bounds_of(&node_id)?;
        let extent = extent_of(&node_id, bounds.size());
        let origin = Point::new(x, top + (extent.h - bounds.h) / 2.0);
        if bounds.origin() != origin {
            ops.push(Op::Move { id: node_id.clone(), to: origin });
        }

        let children = tree.children(&node_id);
        let child_extents = children
            .iter()
            .map(|child| -> Result<Size, MindmapLayoutError> {
                Ok(extent_of(child, bounds_of(child)?.size()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let column = child_column_height(config, &child_extents);
        let child_x = x + bounds.w + config.h_gap;
        let mut child_top = top + (extent.h - column) / 2.0;
        let mut placed = Vec::with_capacity(children.len());
        for (child, child_extent) in children.iter().zip(&child_extents) {
            placed.push((child.clone(), child_x, child_top));
            child_top += child_extent.h + config.v_gap;
        }
        // Reverse so siblings pop in rank order.
        stack.extend(placed.into_iter().rev());
    }

    ops.push(Op::UpdateBounds {
        id: container_id.clone(),
        bounds: Rect::new(root_bounds.x, branch_top, root_extent.w, root_extent.h),
    });
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::{branch_extent, fit_shape, layout_tree, measure_branches};
    use crate::config::MindmapConfig;
    use crate::model::{
        Document, DocumentElement, ElementBody, ElementId, Rect, Size, TreeContainer,
    };
    use crate::ops::{apply_ops, Op};

    fn id(raw: &str) -> ElementId {
        ElementId::new(raw).expect("element id")
    }

    fn config() -> MindmapConfig {
        MindmapConfig {
            char_width: 10.0,
            line_height: 20.0,
            padding_x: 5.0,
            padding_y: 5.0,
            min_node: Size::new(40.0, 30.0),
            max_node_width: 200.0,
            h_gap: 50.0,
            v_gap: 10.0,
        }
    }

    #[test]
    fn fit_shape_respects_minimum_and_wraps_long_lines() {
        let config = config();
        assert_eq!(fit_shape(&config, ""), Size::new(40.0, 30.0));
        assert_eq!(fit_shape(&config, "hello"), Size::new(60.0, 30.0));
        assert_eq!(fit_shape(&config, "a\nb"), Size::new(40.0, 50.0));
        // 30 chars = 300 units > 190 available -> two wrapped lines at max width.
        assert_eq!(fit_shape(&config, &"x".repeat(30)), Size::new(200.0, 50.0));
    }

    #[test]
    fn branch_extent_stacks_children() {
        let config = config();
        let extent = branch_extent(
            &config,
            Size::new(40.0, 30.0),
            &[Size::new(60.0, 30.0), Size::new(80.0, 50.0)],
        );
        assert_eq!(extent, Size::new(40.0 + 50.0 + 80.0, 30.0 + 10.0 + 50.0));
    }

    #[test]
    fn measure_branches_uses_fitted_grandchildren() {
        let config = config();
        let mut tree = TreeContainer::new(id("r"));
        tree.attach(id("a"), &id("r")).expect("attach");
        tree.attach(id("a1"), &id("a")).expect("attach");
        tree.attach(id("a2"), &id("a")).expect("attach");

        let fits = measure_branches(&config, &tree, &id("r"), |_| Size::new(40.0, 30.0));
        let order = fits.iter().map(|fit| fit.node_id.clone()).collect::<Vec<_>>();
        assert_eq!(order, vec![id("a1"), id("a2"), id("a"), id("r")]);
        assert_eq!(fits[2].extent, Size::new(130.0, 70.0));
        assert_eq!(fits[3].extent, Size::new(220.0, 70.0));
    }

    #[test]
    fn layout_centres_children_on_parent() {
        let config = config();
        let mut tree = TreeContainer::new(id("r"));
        tree.attach(id("a"), &id("r")).expect("attach");
        tree.attach(id("b"), &id("r")).expect("attach");
        let own = BTreeMap::from([
            (id("r"), Size::new(40.0, 30.0)),
            (id("a"), Size::new(40.0, 30.0)),
            (id("b"), Size::new(40.0, 30.0)),
        ]);
        let fits = measure_branches(&config, &tree, &id("r"), |node| own[node]);

        let mut doc = Document::new();
        let mut ops = vec![Op::create(DocumentElement::new(
            id("t"),
            Rect::default(),
            ElementBody::TreeContainer(tree),
        ))];
        for (node, size) in &own {
            ops.push(Op::create(DocumentElement::shape(
                node.clone(),
                Rect::new(100.0, 100.0, size.w, size.h),
                node.as_str(),
                Some(id("t")),
            )));
        }
        for fit in &fits {
            ops.push(Op::SetExtent { container: id("t"), node: fit.node_id.clone(), extent: fit.extent });
        }
        apply_ops(&mut doc, 0, &ops, &BTreeSet::new()).expect("seed");

        let layout = layout_tree(&config, &doc, &id("t")).expect("layout");
        apply_ops(&mut doc, 1, &layout, &BTreeSet::new()).expect("layout apply");

        // Root extent: 40 + 50 + 40 wide, 30 + 10 + 30 tall, centred on the root.
        let container = doc.element(&id("t")).expect("container").bounds();
        assert_eq!(container, Rect::new(100.0, 80.0, 130.0, 70.0));
        assert_eq!(doc.element(&id("r")).expect("r").bounds(), Rect::new(100.0, 100.0, 40.0, 30.0));
        assert_eq!(doc.element(&id("a")).expect("a").bounds(), Rect::new(190.0, 80.0, 40.0, 30.0));
        assert_eq!(doc.element(&id("b")).expect("b").bounds(), Rect::new(190.0, 120.0, 40.0, 30.0));
    }
}
