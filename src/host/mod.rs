// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Collaborator seams owned by the host editor.
//!
//! The engine never looks these up ad hoc; they are handed to the dispatcher and the
//! components that need them.

pub mod headless;

use std::error::Error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{AssetId, ElementId, Point, SelectionRegion};

pub use headless::{CollectingReporter, HeadlessChat, HeadlessPanel, PanelEvent, StaticViewport};

/// The transient surface showing the assistant's answer.
pub trait OverlayPanel: Send + Sync {
    fn show(&self);

    fn hide(&self);

    /// Drops the current proposal; `on_discarded` runs once the panel let go of it.
    fn discard(&self, on_discarded: Box<dyn FnOnce() + Send>);

    /// Requests a fresh answer for the same prompt.
    fn generate(&self);

    fn answer(&self) -> Option<String>;
}

/// A point in the viewport's own coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub trait Viewport: Send + Sync {
    fn selection_region(&self) -> Option<SelectionRegion>;

    fn selected_ids(&self) -> Vec<ElementId>;

    fn to_view_coord(&self, point: Point) -> ViewPoint;

    fn to_model_coord(&self, point: ViewPoint) -> Point;

    fn select(&self, ids: &[ElementId], editing: bool);
}

/// Re-opens the conversation that produced the current answer.
pub trait ChatBridge: Send + Sync {
    fn continue_in_chat(&self, action: &str);
}

/// Process-wide sink for failures of background stages.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, stage: &'static str, error: &(dyn Error + Send + Sync + 'static));
}

/// Logs reported failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, stage: &'static str, error: &(dyn Error + Send + Sync + 'static)) {
        tracing::error!(stage, error = %error, "background stage failed");
    }
}

/// An image whose bytes are already bound and may be dropped onto the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundImage {
    pub asset_id: AssetId,
    pub len: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageDropError {
    #[error("no images to drop")]
    Empty,
    #[error(transparent)]
    Mutation(#[from] crate::ops::ApplyError),
}

/// The host's "insert images at a view position" operation.
#[async_trait]
pub trait ImageDropTarget: Send + Sync {
    async fn drop_images(
        &self,
        images: Vec<BoundImage>,
        at: ViewPoint,
    ) -> Result<Vec<ElementId>, ImageDropError>;
}
