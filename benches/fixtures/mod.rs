// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Deterministic mind-map payloads (no RNG).

use mindweave::model::TreeNode;

/// A full tree with `breadth` children per node, `depth` levels below the root.
pub fn balanced(breadth: usize, depth: usize) -> TreeNode {
    fn grow(label: String, breadth: usize, depth: usize) -> TreeNode {
        let children = if depth == 0 {
            Vec::new()
        } else {
            (0..breadth).map(|index| grow(format!("{label}.{index}"), breadth, depth - 1)).collect()
        };
        TreeNode::with_children(label, children)
    }
    grow("topic".to_owned(), breadth, depth)
}

/// A single chain of `len` nodes whose labels grow with depth.
pub fn chain(len: usize) -> TreeNode {
    let mut node = TreeNode::new("x".repeat(len));
    for level in (0..len.saturating_sub(1)).rev() {
        node = TreeNode::with_children("x".repeat(level + 1), vec![node]);
    }
    node
}
