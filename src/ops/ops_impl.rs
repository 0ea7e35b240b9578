// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Element/tree mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
type ElementTable = BTreeMap<ElementId, DocumentElement>;

fn apply_op(
    elements: &mut ElementTable,
    op: &Op,
    assets: &dyn AssetLookup,
    delta: &mut DeltaBuilder,
    touched_trees: &mut BTreeSet<ElementId>,
) -> Result<(), ApplyError> {
    match op {
        Op::Create { element } => {
            let element_id = element.id().clone();
            if elements.contains_key(&element_id) {
                return Err(ApplyError::AlreadyExists { element_id });
            }
            match element.body() {
                ElementBody::Image(image) => {
                    if !assets.is_bound(&image.asset_id) {
                        return Err(ApplyError::UnboundAsset { asset_id: image.asset_id.clone() });
                    }
                }
                ElementBody::Shape(shape) => {
                    if let Some(container_id) = &shape.tree {
                        expect_kind(elements, container_id, ElementKind::TreeContainer)?;
                        touched_trees.insert(container_id.clone());
                    }
                }
                ElementBody::TreeContainer(_) => {
                    touched_trees.insert(element_id.clone());
                }
                ElementBody::Embed(_) | ElementBody::Text(_) => {}
            }
            elements.insert(element_id.clone(), element.clone());
            delta.record_added(element_id);
            Ok(())
        }
        Op::UpdateBounds { id, bounds } => {
            let element = element_mut(elements, id)?;
            element.set_bounds(*bounds);
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::Move { id, to } => {
            let element = element_mut(elements, id)?;
            let from = element.bounds().origin();
            element.set_bounds(element.bounds().with_origin(*to));
            delta.record_updated(id.clone());

            let owned = element
                .as_tree()
                .map(|tree| tree.links().keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            let (dx, dy) = (to.x - from.x, to.y - from.y);
            for node_id in owned {
                let node = element_mut(elements, &node_id)?;
                let bounds = node.bounds();
                node.set_bounds(bounds.with_origin(Point::new(bounds.x + dx, bounds.y + dy)));
                delta.record_updated(node_id);
            }
            Ok(())
        }
        Op::AttachNode { container, node, parent } => {
            expect_tree_shape(elements, container, node)?;
            tree_mut(elements, container)?
                .attach(node.clone(), parent)
                .map_err(|source| ApplyError::Tree { container_id: container.clone(), source })?;
            touched_trees.insert(container.clone());
            delta.record_updated(container.clone());
            Ok(())
        }
        Op::Reparent { container, node, parent, index } => {
            tree_mut(elements, container)?
                .reparent(node, parent, *index)
                .map_err(|source| ApplyError::Tree { container_id: container.clone(), source })?;
            touched_trees.insert(container.clone());
            delta.record_updated(container.clone());
            Ok(())
        }
        Op::SetExtent { container, node, extent } => {
            tree_mut(elements, container)?
                .set_extent(node, *extent)
                .map_err(|source| ApplyError::Tree { container_id: container.clone(), source })?;
            delta.record_updated(container.clone());
            Ok(())
        }
        Op::SetText { id, text } => {
            let element = element_mut(elements, id)?;
            let found = element.kind();
            let ElementBody::Shape(shape) = element.body_mut() else {
                return Err(ApplyError::KindMismatch {
                    element_id: id.clone(),
                    expected: ElementKind::Shape,
                    found,
                });
            };
            shape.text = text.clone();
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::SetBlocks { id, blocks } => {
            let element = element_mut(elements, id)?;
            let found = element.kind();
            let ElementBody::Text(text) = element.body_mut() else {
                return Err(ApplyError::KindMismatch {
                    element_id: id.clone(),
                    expected: ElementKind::Text,
                    found,
                });
            };
            text.blocks = blocks.clone();
            delta.record_updated(id.clone());
            Ok(())
        }
        Op::Remove { id } => remove_element(elements, id, delta, touched_trees),
    }
}

fn remove_element(
    elements: &mut ElementTable,
    id: &ElementId,
    delta: &mut DeltaBuilder,
    touched_trees: &mut BTreeSet<ElementId>,
) -> Result<(), ApplyError> {
    let Some(element) = elements.get(id) else {
        return Err(ApplyError::NotFound { element_id: id.clone() });
    };

    if let Some(tree) = element.as_tree() {
        let owned = tree.links().keys().cloned().collect::<Vec<_>>();
        elements.remove(id);
        delta.record_removed(id.clone());
        for node_id in owned {
            if elements.remove(&node_id).is_some() {
                delta.record_removed(node_id);
            }
        }
        touched_trees.remove(id);
        return Ok(());
    }

    let container_id = element.as_shape().and_then(|shape| shape.tree.clone());
    let Some(container_id) = container_id else {
        elements.remove(id);
        delta.record_removed(id.clone());
        return Ok(());
    };

    let is_root = elements
        .get(&container_id)
        .and_then(DocumentElement::as_tree)
        .is_some_and(|tree| tree.root() == id);
    if is_root {
        return remove_element(elements, &container_id, delta, touched_trees);
    }

    let subtree = tree_mut(elements, &container_id)?
        .detach(id)
        .map_err(|source| ApplyError::Tree { container_id: container_id.clone(), source })?;
    for node_id in subtree {
        if elements.remove(&node_id).is_some() {
            delta.record_removed(node_id);
        }
    }
    touched_trees.insert(container_id.clone());
    delta.record_updated(container_id);
    Ok(())
}

/// Every link must name a shape of the same tree, and every tree shape must be linked.
fn validate_trees(elements: &ElementTable, touched: &BTreeSet<ElementId>) -> Result<(), ApplyError> {
    for container_id in touched {
        let Some(tree) = elements.get(container_id).and_then(DocumentElement::as_tree) else {
            continue;
        };
        for node_id in tree.links().keys() {
            let owner = elements
                .get(node_id)
                .and_then(DocumentElement::as_shape)
                .and_then(|shape| shape.tree.as_ref());
            if owner != Some(container_id) {
                return Err(ApplyError::DanglingTreeNode {
                    container_id: container_id.clone(),
                    node_id: node_id.clone(),
                });
            }
        }
    }

    for element in elements.values() {
        let Some(container_id) = element.as_shape().and_then(|shape| shape.tree.as_ref()) else {
            continue;
        };
        if !touched.contains(container_id) {
            continue;
        }
        let linked = elements
            .get(container_id)
            .and_then(DocumentElement::as_tree)
            .is_some_and(|tree| tree.contains(element.id()));
        if !linked {
            return Err(ApplyError::NotInTree {
                container_id: container_id.clone(),
                node_id: element.id().clone(),
            });
        }
    }
    Ok(())
}

fn element_mut<'a>(
    elements: &'a mut ElementTable,
    id: &ElementId,
) -> Result<&'a mut DocumentElement, ApplyError> {
    elements.get_mut(id).ok_or_else(|| ApplyError::NotFound { element_id: id.clone() })
}

fn tree_mut<'a>(
    elements: &'a mut ElementTable,
    container_id: &ElementId,
) -> Result<&'a mut crate::model::TreeContainer, ApplyError> {
    let element = element_mut(elements, container_id)?;
    let found = element.kind();
    element.as_tree_mut().ok_or_else(|| ApplyError::KindMismatch {
        element_id: container_id.clone(),
        expected: ElementKind::TreeContainer,
        found,
    })
}

fn expect_kind(
    elements: &ElementTable,
    id: &ElementId,
    expected: ElementKind,
) -> Result<(), ApplyError> {
    let Some(element) = elements.get(id) else {
        return Err(ApplyError::NotFound { element_id: id.clone() });
    };
    if element.kind() != expected {
        return Err(ApplyError::KindMismatch {
            element_id: id.clone(),
            expected,
            found: element.kind(),
        });
    }
    Ok(())
}

fn expect_tree_shape(
    elements: &ElementTable,
    container_id: &ElementId,
    node_id: &ElementId,
) -> Result<(), ApplyError> {
    expect_kind(elements, node_id, ElementKind::Shape)?;
    let owner = elements
        .get(node_id)
        .and_then(DocumentElement::as_shape)
        .and_then(|shape| shape.tree.as_ref());
    if owner != Some(container_id) {
        return Err(ApplyError::NotInTree {
            container_id: container_id.clone(),
            node_id: node_id.clone(),
        });
    }
    Ok(())
}
