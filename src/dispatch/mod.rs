// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Action dispatch.
//!
//! An action identifier selects a registered handler (or the default text handler),
//! the handler runs once, and the dispatcher hands back a result menu wired to the
//! same handler and context.

pub mod handlers;
pub mod menu;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::assets::{AssetBinding, AssetFetcher, DocumentImageDrop};
use crate::config::EngineConfig;
use crate::context::{ActionContext, ActionKind};
use crate::convert::{BlockConverter, MarkdownConverter};
use crate::host::{
    ChatBridge, CollectingReporter, ErrorReporter, HeadlessChat, HeadlessPanel, ImageDropTarget,
    OverlayPanel, StaticViewport, Viewport,
};
use crate::layout::GeometryResolver;
use crate::merge::{MergeError, TreeMergeEngine};
use crate::model::{ElementId, SelectionRegion};
use crate::ops::{ApplyError, CommitOutcome, Transaction};
use crate::store::{DocumentStore, SharedDocument};

pub use handlers::{
    BrainstormMindmapHandler, CreateImageHandler, CreateSlidesHandler, ExpandMindmapHandler,
    MakeItRealHandler, TextHandler,
};
pub use menu::{MenuCommand, MenuHandler, MenuItem, ResultMenu};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Mutation(#[from] ApplyError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("background work requires a running tokio runtime")]
    NoRuntime,
}

/// Collaborators injected into the dispatcher and every handler.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DocumentStore>,
    pub assets: AssetBinding,
    pub panel: Arc<dyn OverlayPanel>,
    pub viewport: Arc<dyn Viewport>,
    pub chat: Arc<dyn ChatBridge>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub images: Arc<dyn ImageDropTarget>,
    pub fetcher: Arc<dyn AssetFetcher>,
    pub converter: Arc<dyn BlockConverter>,
    pub config: EngineConfig,
}

impl Services {
    pub fn geometry(&self) -> GeometryResolver {
        GeometryResolver::new(self.config.placement.clone())
    }

    pub fn merge_engine(&self) -> TreeMergeEngine {
        TreeMergeEngine::new(self.config.mindmap.clone(), self.geometry())
    }

    /// Commits `txn`, routing deferred failures to the error reporter.
    pub fn commit(&self, txn: Transaction<'_>) -> Result<CommitOutcome, DispatchError> {
        let outcome = txn.commit()?;
        for failure in &outcome.deferred_failures {
            self.reporter.report("deferred", failure);
        }
        Ok(outcome)
    }

    /// The runtime background work is spawned on.
    pub fn runtime(&self) -> Result<tokio::runtime::Handle, DispatchError> {
        tokio::runtime::Handle::try_current().map_err(|_| DispatchError::NoRuntime)
    }

    /// Spawns `task` on the current tokio runtime.
    pub fn spawn<F>(&self, task: F) -> Result<JoinHandle<()>, DispatchError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Ok(self.runtime()?.spawn(task))
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").field("rev", &self.store.rev()).field("config", &self.config).finish()
    }
}

/// In-process collaborators, kept typed so callers can inspect them.
#[derive(Debug, Clone)]
pub struct Headless {
    pub store: Arc<SharedDocument>,
    pub panel: Arc<HeadlessPanel>,
    pub viewport: Arc<StaticViewport>,
    pub chat: Arc<HeadlessChat>,
    pub reporter: Arc<CollectingReporter>,
}

impl Headless {
    pub fn new(selection: Option<SelectionRegion>) -> Self {
        Self {
            store: Arc::new(SharedDocument::new(AssetBinding::new())),
            panel: Arc::new(HeadlessPanel::default()),
            viewport: Arc::new(StaticViewport::new(selection)),
            chat: Arc::new(HeadlessChat::default()),
            reporter: Arc::new(CollectingReporter::default()),
        }
    }

    pub fn services(&self, config: EngineConfig, fetcher: Arc<dyn AssetFetcher>) -> Services {
        let images = DocumentImageDrop::new(
            self.store.clone(),
            self.viewport.clone(),
            GeometryResolver::new(config.placement.clone()),
        );
        Services {
            store: self.store.clone(),
            assets: self.store.assets().clone(),
            panel: self.panel.clone(),
            viewport: self.viewport.clone(),
            chat: self.chat.clone(),
            reporter: self.reporter.clone(),
            images: Arc::new(images),
            fetcher,
            converter: Arc::new(MarkdownConverter),
            config,
        }
    }
}

/// What a handler did.
#[derive(Debug, Default)]
pub struct HandlerOutcome {
    /// Elements created synchronously, in creation order.
    pub created: Vec<ElementId>,
    /// Revision after the handler's commit, if it committed anything.
    pub rev: Option<u64>,
    /// Work still running after the handler returned.
    pub background: Option<JoinHandle<()>>,
}

impl HandlerOutcome {
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.rev.is_none() && self.background.is_none()
    }

    /// Waits for background work, if any.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.background.take() {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "background task did not finish");
            }
        }
    }
}

pub trait ActionHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(
        &self,
        services: &Services,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<HandlerOutcome, DispatchError>;
}

/// The handler's outcome plus the follow-up menu.
#[derive(Debug)]
pub struct Dispatched {
    pub outcome: HandlerOutcome,
    pub menu: ResultMenu,
}

#[derive(Clone)]
pub struct Dispatcher {
    services: Arc<Services>,
    handlers: BTreeMap<ActionKind, Arc<dyn ActionHandler>>,
    fallback: Arc<dyn ActionHandler>,
}

impl Dispatcher {
    /// A dispatcher with every built-in handler registered.
    pub fn new(services: Services) -> Self {
        let mut dispatcher = Self {
            services: Arc::new(services),
            handlers: BTreeMap::new(),
            fallback: Arc::new(TextHandler),
        };
        dispatcher.register(ActionKind::ExpandMindmap, Arc::new(ExpandMindmapHandler));
        dispatcher.register(ActionKind::BrainstormMindmap, Arc::new(BrainstormMindmapHandler));
        dispatcher.register(ActionKind::CreateSlides, Arc::new(CreateSlidesHandler));
        dispatcher.register(ActionKind::CreateImage, Arc::new(CreateImageHandler));
        dispatcher.register(ActionKind::MakeItReal, Arc::new(MakeItRealHandler));
        dispatcher
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn register(&mut self, action: ActionKind, handler: Arc<dyn ActionHandler>) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.insert(action, handler)
    }

    pub fn set_fallback(&mut self, handler: Arc<dyn ActionHandler>) {
        self.fallback = handler;
    }

    pub fn handler_for(&self, action: &ActionKind) -> Arc<dyn ActionHandler> {
        self.handlers.get(action).cloned().unwrap_or_else(|| self.fallback.clone())
    }

    pub fn dispatch(&self, action: ActionKind, ctx: ActionContext) -> Result<Dispatched, DispatchError> {
        self.dispatch_with_cleanup(action, ctx, || {})
    }

    /// Runs the handler for `action` once, then shows the panel with its result menu.
    ///
    /// `on_discard` runs when the menu's discard command is used.
    pub fn dispatch_with_cleanup(
        &self,
        action: ActionKind,
        ctx: ActionContext,
        on_discard: impl FnOnce() + Send + 'static,
    ) -> Result<Dispatched, DispatchError> {
        let handler = self.handler_for(&action);
        tracing::info!(action = %action, handler = handler.name(), "dispatching action");

        let outcome = handler.handle(&self.services, &action, &ctx).map_err(|err| {
            tracing::warn!(action = %action, error = %err, "action handler failed");
            err
        })?;
        tracing::debug!(
            action = %action,
            created = outcome.created.len(),
            background = outcome.background.is_some(),
            "action handled"
        );

        let menu = ResultMenu::build(
            self.services.clone(),
            action,
            Arc::new(ctx),
            handler,
            Box::new(on_discard),
        );
        self.services.panel.show();
        Ok(Dispatched { outcome, menu })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
