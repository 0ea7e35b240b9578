// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Slide decks: sequential slides, concurrent assets within a slide.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::config::SlideConfig;
use crate::host::{BoundImage, ErrorReporter};
use crate::model::{
    AssetId, Block, DocumentElement, ElementBody, ElementId, ImageNode, Point, Rect, TextBlock,
};
use crate::ops::{ApplyError, Op, Transaction};
use crate::store::DocumentStore;

use super::binding::AssetBinding;
use super::fetch::{AssetError, AssetFetcher};

/// One `(asset id, url)` reference of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSource {
    pub asset_id: AssetId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlideTemplate {
    pub title: String,
    #[serde(default)]
    pub body: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub template: SlideTemplate,
    #[serde(default)]
    pub assets: Vec<AssetSource>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("slide {slide}: asset {asset_id} could not be resolved: {source}")]
    Asset { slide: usize, asset_id: AssetId, source: AssetError },
    #[error("slide {slide}: template instantiation failed: {source}")]
    Instantiate { slide: usize, source: ApplyError },
}

/// Materializes one slide in the document once its assets are bound.
#[async_trait]
pub trait TemplateInstantiator: Send + Sync {
    async fn instantiate(&self, index: usize, slide: &SlideSpec) -> Result<Vec<ElementId>, ApplyError>;
}

/// Fetches asset sources concurrently and binds each as soon as it arrives.
#[derive(Clone)]
pub struct AssetResolver {
    fetcher: Arc<dyn AssetFetcher>,
    binding: AssetBinding,
}

impl AssetResolver {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, binding: AssetBinding) -> Self {
        Self { fetcher, binding }
    }

    pub fn binding(&self) -> &AssetBinding {
        &self.binding
    }

    /// Resolves every source; the first failure wins and drops the fetches still pending.
    ///
    /// Assets bound before the failure stay bound.
    pub async fn resolve(
        &self,
        sources: &[AssetSource],
    ) -> Result<Vec<BoundImage>, (AssetId, AssetError)> {
        let fetches = sources.iter().map(|source| async move {
            let bytes = self
                .fetcher
                .fetch(&source.url)
                .await
                .map_err(|err| (source.asset_id.clone(), err))?;
            let len = bytes.len();
            self.binding.bind(source.asset_id.clone(), bytes);
            Ok::<_, (AssetId, AssetError)>(BoundImage { asset_id: source.asset_id.clone(), len })
        });
        try_join_all(fetches).await
    }
}

impl std::fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetResolver").field("bound", &self.binding.len()).finish()
    }
}

/// What a pipeline run managed to do before finishing or failing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineReport {
    /// Elements inserted per completed slide, in slide order.
    pub slides: Vec<Vec<ElementId>>,
    pub bound: Vec<AssetId>,
    pub failure: Option<PipelineError>,
}

impl PipelineReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Clone)]
pub struct AssetPipeline {
    resolver: AssetResolver,
    instantiator: Arc<dyn TemplateInstantiator>,
    reporter: Arc<dyn ErrorReporter>,
}

impl AssetPipeline {
    pub fn new(
        resolver: AssetResolver,
        instantiator: Arc<dyn TemplateInstantiator>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self { resolver, instantiator, reporter }
    }

    /// Processes `slides` strictly in order.
    ///
    /// A slide is instantiated only after all of its assets are bound. The first
    /// failure stops the run and goes to the error reporter; earlier slides and
    /// bindings are left in place.
    pub async fn run(&self, slides: &[SlideSpec]) -> PipelineReport {
        let mut report = PipelineReport::default();
        for (index, slide) in slides.iter().enumerate() {
            match self.run_slide(index, slide).await {
                Ok((bound, inserted)) => {
                    tracing::info!(slide = index, assets = bound.len(), elements = inserted.len(), "slide inserted");
                    report.bound.extend(bound.into_iter().map(|image| image.asset_id));
                    report.slides.push(inserted);
                }
                Err(err) => {
                    tracing::warn!(slide = index, remaining = slides.len() - index, "slide pipeline aborted");
                    self.reporter.report("asset-pipeline", &err);
                    report.failure = Some(err);
                    break;
                }
            }
        }
        report
    }

    async fn run_slide(
        &self,
        index: usize,
        slide: &SlideSpec,
    ) -> Result<(Vec<BoundImage>, Vec<ElementId>), PipelineError> {
        let bound = self
            .resolver
            .resolve(&slide.assets)
            .await
            .map_err(|(asset_id, source)| PipelineError::Asset { slide: index, asset_id, source })?;
        let inserted = self
            .instantiator
            .instantiate(index, slide)
            .await
            .map_err(|source| PipelineError::Instantiate { slide: index, source })?;
        Ok((bound, inserted))
    }
}

impl std::fmt::Debug for AssetPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetPipeline").field("resolver", &self.resolver).finish()
    }
}

/// Inserts a slide as a title shape, a body text block and a row of images.
///
/// Slides stack downwards from `origin`, one slide height plus gap apart.
pub struct DocumentSlideInstantiator {
    store: Arc<dyn DocumentStore>,
    config: SlideConfig,
    origin: Point,
}

impl DocumentSlideInstantiator {
    pub fn new(store: Arc<dyn DocumentStore>, config: SlideConfig, origin: Point) -> Self {
        Self { store, config, origin }
    }

    pub fn slide_frame(&self, index: usize) -> Rect {
        let top = self.origin.y + index as f64 * (self.config.size.h + self.config.gap);
        Rect::from_origin_size(Point::new(self.origin.x, top), self.config.size)
    }
}

#[async_trait]
impl TemplateInstantiator for DocumentSlideInstantiator {
    async fn instantiate(&self, index: usize, slide: &SlideSpec) -> Result<Vec<ElementId>, ApplyError> {
        let frame = self.slide_frame(index);
        let image = self.config.image;
        let body_height = (frame.h - self.config.title_height - image.h).max(0.0);

        let mut txn = Transaction::open(self.store.as_ref(), "slide");
        let title_id = self.store.allocate_id();
        txn.push(Op::create(DocumentElement::shape(
            title_id.clone(),
            Rect::new(frame.x, frame.y, frame.w, self.config.title_height),
            slide.template.title.clone(),
            None,
        )));
        let body_id = self.store.allocate_id();
        txn.push(Op::create(DocumentElement::new(
            body_id.clone(),
            Rect::new(frame.x, frame.y + self.config.title_height, frame.w, body_height),
            ElementBody::Text(TextBlock { blocks: slide.template.body.clone() }),
        )));

        let mut created = vec![title_id, body_id];
        let image_top = frame.bottom() - image.h;
        for (column, source) in slide.assets.iter().enumerate() {
            let image_id = self.store.allocate_id();
            let x = frame.x + column as f64 * (image.w + self.config.gap);
            txn.push(Op::create(DocumentElement::new(
                image_id.clone(),
                Rect::new(x, image_top, image.w, image.h),
                ElementBody::Image(ImageNode { asset_id: source.asset_id.clone() }),
            )));
            created.push(image_id);
        }
        txn.commit()?;
        Ok(created)
    }
}
