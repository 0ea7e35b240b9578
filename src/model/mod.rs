// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A document is a flat, id-indexed table of elements. Tree containers keep their
//! hierarchy as an arena of links keyed by the shapes they own, so every traversal
//! goes through ids rather than object references.

pub mod document;
pub mod element;
pub mod geometry;
pub mod ids;
pub mod tree;

pub use document::Document;
pub use element::{
    Block, DocumentElement, ElementBody, ElementKind, EmbeddedContent, ImageNode, ShapeNode,
    TextBlock,
};
pub use geometry::{Point, Rect, SelectionRegion, Size};
pub use ids::{AssetId, ElementId, Id, IdError};
pub use tree::{ChildIds, TreeContainer, TreeError, TreeLink, TreeNode};
