// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-process collaborators for running the engine without an editor attached
//! (the replay binary, tests).

use std::error::Error;
use std::sync::{Mutex, PoisonError};

use crate::model::{ElementId, Point, SelectionRegion};

use super::{ChatBridge, ErrorReporter, OverlayPanel, ViewPoint, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Show,
    Hide,
    Discard,
    Generate,
}

/// An overlay panel that only remembers what was asked of it.
#[derive(Debug, Default)]
pub struct HeadlessPanel {
    answer: Mutex<Option<String>>,
    events: Mutex<Vec<PanelEvent>>,
}

impl HeadlessPanel {
    pub fn new(answer: Option<String>) -> Self {
        Self { answer: Mutex::new(answer), events: Mutex::new(Vec::new()) }
    }

    pub fn set_answer(&self, answer: Option<String>) {
        *self.answer.lock().unwrap_or_else(PoisonError::into_inner) = answer;
    }

    pub fn events(&self) -> Vec<PanelEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, event: PanelEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl OverlayPanel for HeadlessPanel {
    fn show(&self) {
        self.record(PanelEvent::Show);
    }

    fn hide(&self) {
        self.record(PanelEvent::Hide);
    }

    fn discard(&self, on_discarded: Box<dyn FnOnce() + Send>) {
        self.record(PanelEvent::Discard);
        on_discarded();
    }

    fn generate(&self) {
        self.record(PanelEvent::Generate);
    }

    fn answer(&self) -> Option<String> {
        self.answer.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// A viewport with a fixed selection and a scale + offset view transform.
#[derive(Debug)]
pub struct StaticViewport {
    selection: Mutex<Option<SelectionRegion>>,
    selected_ids: Mutex<Vec<ElementId>>,
    last_select: Mutex<Option<(Vec<ElementId>, bool)>>,
    zoom: f64,
    offset: Point,
}

impl Default for StaticViewport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StaticViewport {
    pub fn new(selection: Option<SelectionRegion>) -> Self {
        Self {
            selection: Mutex::new(selection),
            selected_ids: Mutex::new(Vec::new()),
            last_select: Mutex::new(None),
            zoom: 1.0,
            offset: Point::default(),
        }
    }

    /// View coordinates are `(model - offset) * zoom`.
    pub fn with_transform(mut self, zoom: f64, offset: Point) -> Self {
        self.zoom = if zoom > 0.0 { zoom } else { 1.0 };
        self.offset = offset;
        self
    }

    pub fn set_selection(&self, selection: Option<SelectionRegion>, ids: Vec<ElementId>) {
        *self.selection.lock().unwrap_or_else(PoisonError::into_inner) = selection;
        *self.selected_ids.lock().unwrap_or_else(PoisonError::into_inner) = ids;
    }

    /// The ids and editing flag of the most recent `select` call.
    pub fn last_select(&self) -> Option<(Vec<ElementId>, bool)> {
        self.last_select.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Viewport for StaticViewport {
    fn selection_region(&self) -> Option<SelectionRegion> {
        *self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn selected_ids(&self) -> Vec<ElementId> {
        self.selected_ids.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn to_view_coord(&self, point: Point) -> ViewPoint {
        ViewPoint::new((point.x - self.offset.x) * self.zoom, (point.y - self.offset.y) * self.zoom)
    }

    fn to_model_coord(&self, point: ViewPoint) -> Point {
        Point::new(point.x / self.zoom + self.offset.x, point.y / self.zoom + self.offset.y)
    }

    fn select(&self, ids: &[ElementId], editing: bool) {
        *self.selected_ids.lock().unwrap_or_else(PoisonError::into_inner) = ids.to_vec();
        *self.last_select.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((ids.to_vec(), editing));
    }
}

#[derive(Debug, Default)]
pub struct HeadlessChat {
    continued: Mutex<Vec<String>>,
}

impl HeadlessChat {
    pub fn continued(&self) -> Vec<String> {
        self.continued.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ChatBridge for HeadlessChat {
    fn continue_in_chat(&self, action: &str) {
        tracing::info!(action, "continue in chat requested");
        self.continued.lock().unwrap_or_else(PoisonError::into_inner).push(action.to_owned());
    }
}

/// Keeps reported failures (stage + message) and forwards them to `tracing`.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<(&'static str, String)>>,
}

impl CollectingReporter {
    pub fn reports(&self) -> Vec<(&'static str, String)> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, stage: &'static str, error: &(dyn Error + Send + Sync + 'static)) {
        tracing::error!(stage, error = %error, "background stage failed");
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).push((stage, error.to_string()));
    }
}
