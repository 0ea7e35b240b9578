// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Replaying recorded action scripts against a headless document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::RoutingFetcher;
use crate::config::EngineConfig;
use crate::context::{ActionContext, ActionKind, ActionPayload};
use crate::dispatch::{DispatchError, Dispatcher, Headless, MenuCommand};
use crate::host::Viewport;
use crate::model::{Document, ElementId, SelectionRegion};
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    /// Selection in effect before the first step.
    #[serde(default)]
    pub selection: Option<SelectionRegion>,
    /// Panel answer read by the default handler when a step carries no payload.
    #[serde(default)]
    pub answer: Option<String>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub action: ActionKind,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    /// Replaces the selection region for this and later steps.
    #[serde(default)]
    pub selection: Option<SelectionRegion>,
    #[serde(default)]
    pub selected: Vec<ElementId>,
    /// Result menu commands run after the action settled.
    #[serde(default)]
    pub menu: Vec<MenuCommand>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid script json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {step} ({action}): invalid payload: {source}")]
    Payload { step: usize, action: ActionKind, source: serde_json::Error },
    #[error("step {step} ({action}): {source}")]
    Dispatch { step: usize, action: ActionKind, source: DispatchError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    pub message: String,
}

/// Final document plus every background failure reported along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub steps: usize,
    pub document: Document,
    pub reports: Vec<StageReport>,
}

impl Script {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ScriptError::Io { path: path.to_path_buf(), source })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Runs every step in order, waiting for each step's background work before the next.
///
/// `file://` asset urls resolve against `asset_dir`.
pub async fn replay(
    script: &Script,
    config: EngineConfig,
    asset_dir: Option<PathBuf>,
) -> Result<ReplaySummary, ScriptError> {
    let headless = Headless::new(script.selection);
    headless.panel.set_answer(script.answer.clone());
    let fetcher = Arc::new(RoutingFetcher::with_defaults(asset_dir));
    let dispatcher = Dispatcher::new(headless.services(config, fetcher));

    for (step, entry) in script.steps.iter().enumerate() {
        if entry.selection.is_some() || !entry.selected.is_empty() {
            let selection = entry.selection.or_else(|| headless.viewport.selection_region());
            headless.viewport.set_selection(selection, entry.selected.clone());
        }

        let mut ctx = ActionContext::new();
        if let Some(raw) = &entry.payload {
            let payload = ActionPayload::from_json(&entry.action, raw.clone()).map_err(|source| {
                ScriptError::Payload { step, action: entry.action.clone(), source }
            })?;
            ctx.set(entry.action.clone(), payload);
        }

        let dispatch_err =
            |source| ScriptError::Dispatch { step, action: entry.action.clone(), source };
        let mut dispatched = dispatcher.dispatch(entry.action.clone(), ctx).map_err(dispatch_err)?;
        dispatched.outcome.settle().await;
        for command in &entry.menu {
            dispatched.menu.run(*command).map_err(dispatch_err)?;
        }
        dispatched.menu.settle().await;
        tracing::info!(step, action = %entry.action, rev = headless.store.rev(), "step replayed");
    }

    let reports = headless
        .reporter
        .reports()
        .into_iter()
        .map(|(stage, message)| StageReport { stage, message })
        .collect();
    Ok(ReplaySummary { steps: script.steps.len(), document: headless.store.snapshot(), reports })
}
