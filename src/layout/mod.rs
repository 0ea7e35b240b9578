// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Geometry for inserted content.
//!
//! `placement` anchors new elements to the user's selection; `mindmap` fit-sizes and
//! arranges tree nodes.

pub mod mindmap;
pub mod placement;

pub use mindmap::{
    branch_extent, fit_shape, layout_tree, measure_branches, BranchFit, MindmapLayoutError,
};
pub use placement::GeometryResolver;
