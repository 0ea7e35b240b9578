// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in action handlers.

use std::sync::Arc;

use crate::assets::{AssetPipeline, AssetResolver, DocumentSlideInstantiator};
use crate::context::{ActionContext, ActionKind, ActionPayload};
use crate::model::{DocumentElement, ElementBody, EmbeddedContent, ElementId};
use crate::ops::{Op, Transaction};

use super::{ActionHandler, DispatchError, HandlerOutcome, Services};

/// The payload stored under `action`, unless it is absent or has nothing to insert.
fn payload<'c>(action: &ActionKind, ctx: &'c ActionContext) -> Option<&'c ActionPayload> {
    let payload = ctx.get(action).filter(|payload| !payload.is_empty());
    if payload.is_none() {
        tracing::debug!(action = %action, "empty payload, nothing to do");
    }
    payload
}

/// Grafts the proposed children under an existing mind-map node.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandMindmapHandler;

impl ActionHandler for ExpandMindmapHandler {
    fn name(&self) -> &'static str {
        "expand-mindmap"
    }

    fn handle(
        &self,
        services: &Services,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<HandlerOutcome, DispatchError> {
        let Some(ActionPayload::ExpandMindmap { target, tree }) = payload(action, ctx) else {
            return Ok(HandlerOutcome::noop());
        };

        let mut txn = Transaction::open(services.store.as_ref(), "expand-mindmap");
        let Some(merged) = services.merge_engine().expand(&mut txn, target, tree)? else {
            return Ok(HandlerOutcome::noop());
        };
        let commit = services.commit(txn)?;
        Ok(HandlerOutcome {
            created: merged.created,
            rev: Some(commit.result.new_rev),
            background: None,
        })
    }
}

/// Builds a new mind map, replacing the selected one when its root is selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrainstormMindmapHandler;

impl ActionHandler for BrainstormMindmapHandler {
    fn name(&self) -> &'static str {
        "brainstorm-mindmap"
    }

    fn handle(
        &self,
        services: &Services,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<HandlerOutcome, DispatchError> {
        let Some(ActionPayload::BrainstormMindmap { tree }) = payload(action, ctx) else {
            return Ok(HandlerOutcome::noop());
        };

        let selection = services.viewport.selection_region();
        let selected = services.viewport.selected_ids();
        let replace = match selected.as_slice() {
            [single] => Some(single),
            _ => None,
        };

        let mut txn = Transaction::open(services.store.as_ref(), "brainstorm-mindmap");
        let Some(merged) = services.merge_engine().create(&mut txn, tree, selection.as_ref(), replace)? else {
            return Ok(HandlerOutcome::noop());
        };
        let viewport = services.viewport.clone();
        let root = merged.root.clone();
        txn.defer("select-root", move |_| {
            viewport.select(&[root], false);
            Ok(())
        });
        let commit = services.commit(txn)?;

        let mut created = vec![merged.container];
        created.extend(merged.created);
        Ok(HandlerOutcome { created, rev: Some(commit.result.new_rev), background: None })
    }
}

/// Runs the slide pipeline in the background below the selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateSlidesHandler;

impl ActionHandler for CreateSlidesHandler {
    fn name(&self) -> &'static str {
        "create-slides"
    }

    fn handle(
        &self,
        services: &Services,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<HandlerOutcome, DispatchError> {
        let Some(ActionPayload::CreateSlides { slides }) = payload(action, ctx) else {
            return Ok(HandlerOutcome::noop());
        };

        let selection = services.viewport.selection_region();
        let origin = services.geometry().below(selection.as_ref(), services.config.slides.size).origin();
        let instantiator =
            DocumentSlideInstantiator::new(services.store.clone(), services.config.slides.clone(), origin);
        let pipeline = AssetPipeline::new(
            AssetResolver::new(services.fetcher.clone(), services.assets.clone()),
            Arc::new(instantiator),
            services.reporter.clone(),
        );

        let slides = slides.clone();
        tracing::info!(slides = slides.len(), "slide pipeline scheduled");
        let background = services.spawn(async move {
            let report = pipeline.run(&slides).await;
            tracing::info!(inserted = report.slides.len(), complete = report.is_complete(), "slide pipeline finished");
        })?;
        Ok(HandlerOutcome { background: Some(background), ..HandlerOutcome::default() })
    }
}

/// Fetches images concurrently, then drops them below the selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateImageHandler;

impl ActionHandler for CreateImageHandler {
    fn name(&self) -> &'static str {
        "create-image"
    }

    fn handle(
        &self,
        services: &Services,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<HandlerOutcome, DispatchError> {
        let Some(ActionPayload::CreateImage { images }) = payload(action, ctx) else {
            return Ok(HandlerOutcome::noop());
        };

        let selection = services.viewport.selection_region();
        let anchor = services.geometry().image(selection.as_ref(), 0, None).origin();
        let at = services.geometry().to_view(services.viewport.as_ref(), anchor);

        let resolver = AssetResolver::new(services.fetcher.clone(), services.assets.clone());
        let target = services.images.clone();
        let reporter = services.reporter.clone();
        let images = images.clone();
        let background = services.spawn(async move {
            let bound = match resolver.resolve(&images).await {
                Ok(bound) => bound,
                Err((asset_id, err)) => {
                    tracing::warn!(asset_id = %asset_id, "image fetch failed");
                    reporter.report("image-fetch", &err);
                    return;
                }
            };
            match target.drop_images(bound, at).await {
                Ok(ids) => tracing::info!(count = ids.len(), "images inserted"),
                Err(err) => reporter.report("image-insert", &err),
            }
        })?;
        Ok(HandlerOutcome { background: Some(background), ..HandlerOutcome::default() })
    }
}

/// Inserts generated markup as an embed below the selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeItRealHandler;

impl ActionHandler for MakeItRealHandler {
    fn name(&self) -> &'static str {
        "make-it-real"
    }

    fn handle(
        &self,
        services: &Services,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<HandlerOutcome, DispatchError> {
        let Some(ActionPayload::MakeItReal { html }) = payload(action, ctx) else {
            return Ok(HandlerOutcome::noop());
        };

        let selection = services.viewport.selection_region();
        let bounds = services.geometry().embed(selection.as_ref(), None);
        let embed_id = services.store.allocate_id();

        let mut txn = Transaction::open(services.store.as_ref(), "make-it-real");
        txn.push(Op::create(DocumentElement::new(
            embed_id.clone(),
            bounds,
            ElementBody::Embed(EmbeddedContent { html: html.clone() }),
        )));
        defer_select(&mut txn, services, embed_id.clone(), false);
        let commit = services.commit(txn)?;
        Ok(HandlerOutcome { created: vec![embed_id], rev: Some(commit.result.new_rev), background: None })
    }
}

/// Default handler: an empty text block below the selection, filled once the
/// answer is converted.
///
/// The block is committed and focused first. A failed conversion is reported and
/// leaves the block empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHandler;

impl ActionHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn handle(
        &self,
        services: &Services,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<HandlerOutcome, DispatchError> {
        let answer = match ctx.get(action) {
            Some(ActionPayload::Text { answer }) => Some(answer.clone()),
            _ => services.panel.answer(),
        };
        let Some(answer) = answer.filter(|answer| !answer.trim().is_empty()) else {
            tracing::debug!(action = %action, "no answer to insert");
            return Ok(HandlerOutcome::noop());
        };
        let runtime = services.runtime()?;

        let selection = services.viewport.selection_region();
        let bounds = services.geometry().text_block(selection.as_ref(), None);
        let block_id = services.store.allocate_id();

        let mut txn = Transaction::open(services.store.as_ref(), "text-block");
        txn.push(Op::create(DocumentElement::text_block(block_id.clone(), bounds)));
        defer_select(&mut txn, services, block_id.clone(), true);
        let commit = services.commit(txn)?;

        let store = services.store.clone();
        let converter = services.converter.clone();
        let reporter = services.reporter.clone();
        let id = block_id.clone();
        let background = runtime.spawn(async move {
            let blocks = match converter.convert(&answer).await {
                Ok(blocks) => blocks,
                Err(err) => {
                    tracing::warn!(block = %id, "answer conversion failed, block left empty");
                    reporter.report("text-conversion", &err);
                    return;
                }
            };
            let mut txn = Transaction::open(store.as_ref(), "text-blocks");
            txn.push(Op::SetBlocks { id, blocks });
            if let Err(err) = txn.commit() {
                reporter.report("text-conversion", &err);
            }
        });

        Ok(HandlerOutcome {
            created: vec![block_id],
            rev: Some(commit.result.new_rev),
            background: Some(background),
        })
    }
}

fn defer_select(txn: &mut Transaction<'_>, services: &Services, id: ElementId, editing: bool) {
    let viewport = services.viewport.clone();
    txn.defer("select", move |_| {
        viewport.select(&[id], editing);
        Ok(())
    });
}
