// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::config::PlacementConfig;
use crate::host::{ViewPoint, Viewport};
use crate::model::{Point, Rect, SelectionRegion, Size};

/// Computes model-space rectangles for new content relative to the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryResolver {
    config: PlacementConfig,
}

impl Default for GeometryResolver {
    fn default() -> Self {
        Self::new(PlacementConfig::default())
    }
}

impl GeometryResolver {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Document origin offset by the configured margin.
    pub fn origin(&self) -> Point {
        Point::new(self.config.origin_margin, self.config.origin_margin)
    }

    /// Top-left corner of the selection, or the margin-offset origin without one.
    pub fn anchor(&self, selection: Option<&SelectionRegion>) -> Point {
        selection.map_or_else(|| self.origin(), |region| Point::new(region.x, region.y))
    }

    /// `size` placed directly below the selection, separated by the configured gap.
    pub fn below(&self, selection: Option<&SelectionRegion>, size: Size) -> Rect {
        let origin = match selection {
            Some(region) => Point::new(region.x, region.y + region.height + self.config.gap),
            None => self.origin(),
        };
        Rect::from_origin_size(origin, size)
    }

    pub fn text_block(&self, selection: Option<&SelectionRegion>, size: Option<Size>) -> Rect {
        self.below(selection, size.unwrap_or(self.config.text_block))
    }

    pub fn embed(&self, selection: Option<&SelectionRegion>, size: Option<Size>) -> Rect {
        self.below(selection, size.unwrap_or(self.config.embed))
    }

    /// The `index`-th image of a row placed below the selection.
    pub fn image(&self, selection: Option<&SelectionRegion>, index: usize, size: Option<Size>) -> Rect {
        let size = size.unwrap_or(self.config.image);
        let first = self.below(selection, size);
        let step = size.w + self.config.image_spacing;
        first.with_origin(Point::new(first.x + step * index as f64, first.y))
    }

    pub fn to_view(&self, viewport: &dyn Viewport, point: Point) -> ViewPoint {
        viewport.to_view_coord(point)
    }
}
