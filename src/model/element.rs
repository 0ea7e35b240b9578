// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::ids::{AssetId, ElementId};
use super::tree::TreeContainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    TreeContainer,
    Shape,
    Image,
    Embed,
    Text,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TreeContainer => "tree_container",
            Self::Shape => "shape",
            Self::Image => "image",
            Self::Embed => "embed",
            Self::Text => "text",
        })
    }
}

/// A shape node; mind-map nodes are shapes owned by a tree container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeNode {
    pub text: String,
    pub tree: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageNode {
    pub asset_id: AssetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmbeddedContent {
    pub html: String,
}

/// One structured block produced by converting the assistant's text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    ListItem { text: String },
    Code { language: Option<String>, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementBody {
    TreeContainer(TreeContainer),
    Shape(ShapeNode),
    Image(ImageNode),
    Embed(EmbeddedContent),
    Text(TextBlock),
}

impl ElementBody {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::TreeContainer(_) => ElementKind::TreeContainer,
            Self::Shape(_) => ElementKind::Shape,
            Self::Image(_) => ElementKind::Image,
            Self::Embed(_) => ElementKind::Embed,
            Self::Text(_) => ElementKind::Text,
        }
    }
}

/// A document-owned element: unique id, bounding rect and variant body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentElement {
    id: ElementId,
    bounds: Rect,
    body: ElementBody,
}

impl DocumentElement {
    pub fn new(id: ElementId, bounds: Rect, body: ElementBody) -> Self {
        Self { id, bounds, body }
    }

    pub fn shape(id: ElementId, bounds: Rect, text: impl Into<String>, tree: Option<ElementId>) -> Self {
        Self::new(id, bounds, ElementBody::Shape(ShapeNode { text: text.into(), tree }))
    }

    pub fn text_block(id: ElementId, bounds: Rect) -> Self {
        Self::new(id, bounds, ElementBody::Text(TextBlock::default()))
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ElementBody {
        &mut self.body
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn as_tree(&self) -> Option<&TreeContainer> {
        match &self.body {
            ElementBody::TreeContainer(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut TreeContainer> {
        match &mut self.body {
            ElementBody::TreeContainer(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeNode> {
        match &self.body {
            ElementBody::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match &self.body {
            ElementBody::Text(text) => Some(text),
            _ => None,
        }
    }
}
