// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mindweave::assets::{AssetError, AssetFetcher, AssetSource, SlideSpec, SlideTemplate};
use mindweave::config::EngineConfig;
use mindweave::context::{ActionContext, ActionKind, ActionPayload};
use mindweave::dispatch::{Dispatcher, Headless, MenuCommand};
use mindweave::host::PanelEvent;
use mindweave::model::{AssetId, Document, ElementId, ElementKind, Rect, SelectionRegion, TreeNode};
use mindweave::store::{Commit, DocumentStore};

type EventLog = Arc<Mutex<Vec<String>>>;

/// Logs each fetch start and each successful finish; urls containing `slow` take a
/// while to answer.
struct ScriptedFetcher {
    log: EventLog,
}

#[async_trait]
impl AssetFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.log.lock().unwrap().push(format!("fetch {url}"));
        if url.contains("slow") {
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        if url.contains("broken") {
            return Err(AssetError::Fetch { url: url.to_owned(), reason: "refused".into() });
        }
        self.log.lock().unwrap().push(format!("done {url}"));
        Ok(url.as_bytes().to_vec())
    }
}

fn selection() -> SelectionRegion {
    SelectionRegion::new(40.0, 40.0, 200.0, 60.0)
}

fn setup(log: &EventLog) -> (Headless, Dispatcher) {
    let headless = Headless::new(Some(selection()));
    let fetcher = Arc::new(ScriptedFetcher { log: log.clone() });
    let dispatcher = Dispatcher::new(headless.services(EngineConfig::default(), fetcher));
    (headless, dispatcher)
}

fn record_commits(headless: &Headless, log: &EventLog) {
    let log = log.clone();
    headless.store.subscribe(Arc::new(move |commit: &Commit<'_>| {
        log.lock().unwrap().push(format!("commit {}", commit.result.new_rev));
    }));
}

fn slides(urls: &[[&str; 2]]) -> ActionContext {
    let slides = urls
        .iter()
        .enumerate()
        .map(|(index, pair)| SlideSpec {
            template: SlideTemplate { title: format!("slide {index}"), body: Vec::new() },
            assets: pair
                .iter()
                .map(|url| AssetSource {
                    asset_id: AssetId::new(url.replace("mem://", "")).expect("asset id"),
                    url: (*url).to_owned(),
                })
                .collect(),
        })
        .collect();
    ActionContext::new().with(ActionKind::CreateSlides, ActionPayload::CreateSlides { slides })
}

fn position(log: &[String], entry: &str) -> usize {
    log.iter().position(|line| line == entry).unwrap_or_else(|| panic!("missing `{entry}` in {log:?}"))
}

#[tokio::test]
async fn empty_payload_dispatch_commits_nothing() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);
    record_commits(&headless, &log);

    let ctx = ActionContext::new().with(
        ActionKind::ExpandMindmap,
        ActionPayload::ExpandMindmap {
            target: ElementId::new("el-1").expect("id"),
            tree: TreeNode::new("no children"),
        },
    );
    let mut dispatched = dispatcher.dispatch(ActionKind::ExpandMindmap, ctx).expect("dispatch");
    dispatched.outcome.settle().await;

    assert!(dispatched.outcome.is_noop());
    assert_eq!(headless.store.rev(), 0);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn observers_never_see_a_partial_mindmap() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);
    let seen = Arc::new(Mutex::new(Vec::<Document>::new()));
    {
        let seen = seen.clone();
        headless.store.subscribe(Arc::new(move |commit: &Commit<'_>| {
            seen.lock().unwrap().push(commit.document.clone());
        }));
    }

    let tree = TreeNode::with_children(
        "plan",
        vec![
            TreeNode::with_children("research", vec![TreeNode::new("papers"), TreeNode::new("people")]),
            TreeNode::new("build"),
        ],
    );
    let ctx = ActionContext::new().with(ActionKind::BrainstormMindmap, ActionPayload::BrainstormMindmap { tree });
    dispatcher.dispatch(ActionKind::BrainstormMindmap, ctx).expect("dispatch");

    let seen = seen.lock().unwrap();
    // The merge batch and the deferred layout batch.
    assert_eq!(seen.len(), 2);
    for document in seen.iter() {
        assert_eq!(document.count_kind(ElementKind::TreeContainer), 1);
        assert_eq!(document.count_kind(ElementKind::Shape), 5);
        let container = &document.ids_of_kind(ElementKind::TreeContainer)[0];
        let linked = document.tree(container).expect("tree").links().keys().cloned().collect::<BTreeSet<_>>();
        assert_eq!(linked, document.ids_of_kind(ElementKind::Shape).into_iter().collect::<BTreeSet<_>>());
    }
}

#[tokio::test]
async fn deferred_layout_sees_fitted_children() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);
    let config = EngineConfig::default().mindmap;

    let tree = TreeNode::with_children("root", vec![TreeNode::new("left"), TreeNode::new("a much longer child")]);
    let ctx = ActionContext::new().with(ActionKind::BrainstormMindmap, ActionPayload::BrainstormMindmap { tree });
    let dispatched = dispatcher.dispatch(ActionKind::BrainstormMindmap, ctx).expect("dispatch");

    let created = &dispatched.outcome.created;
    let bounds = |index: usize| headless.store.element(&created[index]).expect("element").bounds();
    let (container, root, first, second) = (bounds(0), bounds(1), bounds(2), bounds(3));

    let widest_child = first.w.max(second.w);
    assert_eq!(container.w, root.w + config.h_gap + widest_child);
    assert_eq!(container.h, first.h + config.v_gap + second.h);
    assert_eq!(first.x, root.x + root.w + config.h_gap);
    assert_eq!(second.y, first.y + first.h + config.v_gap);
    assert_eq!(container.y, first.y);
    assert!(second.w > first.w);
}

#[tokio::test]
async fn expand_fits_children_before_parents() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);
    let config = EngineConfig::default().mindmap;

    let root_only = TreeNode::new("root");
    let ctx = ActionContext::new()
        .with(ActionKind::BrainstormMindmap, ActionPayload::BrainstormMindmap { tree: root_only });
    let created = dispatcher.dispatch(ActionKind::BrainstormMindmap, ctx).expect("create").outcome.created;
    let (container_id, root_id) = (created[0].clone(), created[1].clone());

    let long = "x".repeat(30);
    let payload = TreeNode::with_children("root", vec![TreeNode::with_children("p", vec![TreeNode::new(long)])]);
    let ctx = ActionContext::new().with(
        ActionKind::ExpandMindmap,
        ActionPayload::ExpandMindmap { target: root_id.clone(), tree: payload },
    );
    let added = dispatcher.dispatch(ActionKind::ExpandMindmap, ctx).expect("expand").outcome.created;

    let document = headless.store.snapshot();
    let tree = document.tree(&container_id).expect("tree");
    let parent = document.element(&added[0]).expect("parent").bounds();
    let leaf = document.element(&added[1]).expect("leaf").bounds();
    let parent_extent = tree.link(&added[0]).expect("parent link").extent();

    assert!(leaf.w > config.min_node.w);
    assert_eq!(parent_extent.w, parent.w + config.h_gap + leaf.w);
    assert_eq!(
        document.element(&container_id).expect("container").bounds().w,
        document.element(&root_id).expect("root").bounds().w + config.h_gap + parent_extent.w
    );
}

#[tokio::test]
async fn slides_run_in_order_with_concurrent_assets() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);
    record_commits(&headless, &log);

    let ctx = slides(&[
        ["mem://s1a", "mem://s1b"],
        ["mem://s2a-slow", "mem://s2b"],
        ["mem://s3a", "mem://s3b"],
    ]);
    let mut dispatched = dispatcher.dispatch(ActionKind::CreateSlides, ctx).expect("dispatch");
    dispatched.outcome.settle().await;

    let log = log.lock().unwrap().clone();
    assert_eq!(log.len(), 15, "{log:?}");
    let commit_1 = position(&log, "commit 1");
    let commit_2 = position(&log, "commit 2");
    assert!(position(&log, "fetch mem://s1a") < commit_1);
    assert!(position(&log, "fetch mem://s1b") < commit_1);
    assert!(commit_1 < position(&log, "fetch mem://s2a-slow"));
    assert!(position(&log, "fetch mem://s2a-slow") < commit_2);
    assert!(position(&log, "fetch mem://s2b") < commit_2);
    // Both fetches of slide 2 are in flight together: the fast one starts and
    // finishes while the slow one is still pending.
    assert!(position(&log, "fetch mem://s2b") < position(&log, "done mem://s2a-slow"));
    assert!(position(&log, "done mem://s2b") < position(&log, "done mem://s2a-slow"));
    assert!(position(&log, "done mem://s2a-slow") < commit_2);
    assert!(commit_2 < position(&log, "fetch mem://s3a"));
    assert_eq!(log.last().map(String::as_str), Some("commit 3"));

    let document = headless.store.snapshot();
    assert_eq!(document.count_kind(ElementKind::Image), 6);
    assert_eq!(headless.store.assets().len(), 6);
    assert!(headless.reporter.reports().is_empty());
}

#[tokio::test]
async fn failed_asset_stops_later_slides_but_keeps_earlier_ones() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);

    let ctx = slides(&[["mem://a1", "mem://a2"], ["mem://b1", "mem://broken"], ["mem://c1", "mem://c2"]]);
    let mut dispatched = dispatcher.dispatch(ActionKind::CreateSlides, ctx).expect("dispatch");
    dispatched.outcome.settle().await;

    assert_eq!(headless.store.snapshot().count_kind(ElementKind::Image), 2);
    assert!(!log.lock().unwrap().iter().any(|line| line.starts_with("fetch mem://c")));
    let reports = headless.reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "asset-pipeline");
}

#[tokio::test]
async fn discard_does_not_abort_the_pipeline() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);

    let ctx = slides(&[["mem://one-slow", "mem://two"], ["mem://three-slow", "mem://four"]]);
    let mut dispatched = dispatcher.dispatch(ActionKind::CreateSlides, ctx).expect("dispatch");
    tokio::task::yield_now().await;
    dispatched.menu.run(MenuCommand::Discard).expect("discard");

    assert_eq!(headless.panel.events(), vec![PanelEvent::Show, PanelEvent::Discard, PanelEvent::Hide]);
    dispatched.outcome.settle().await;
    assert_eq!(headless.store.snapshot().count_kind(ElementKind::Image), 4);
}

#[tokio::test]
async fn images_land_in_a_row_below_the_selection() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);
    let images = ["mem://cat", "mem://dog-slow"]
        .into_iter()
        .map(|url| AssetSource { asset_id: AssetId::new(&url[6..]).expect("id"), url: url.to_owned() })
        .collect();
    let ctx = ActionContext::new().with(ActionKind::CreateImage, ActionPayload::CreateImage { images });

    let mut dispatched = dispatcher.dispatch(ActionKind::CreateImage, ctx).expect("dispatch");
    dispatched.outcome.settle().await;

    let document = headless.store.snapshot();
    let mut rects = document
        .ids_of_kind(ElementKind::Image)
        .iter()
        .filter_map(|id| document.element(id).map(|element| element.bounds()))
        .collect::<Vec<_>>();
    rects.sort_by(|a, b| a.x.total_cmp(&b.x));
    assert_eq!(rects, vec![Rect::new(40.0, 120.0, 400.0, 400.0), Rect::new(460.0, 120.0, 400.0, 400.0)]);
}

#[tokio::test]
async fn actions_interleave_at_transaction_granularity() {
    let log = EventLog::default();
    let (headless, dispatcher) = setup(&log);

    let mut slides = dispatcher
        .dispatch(ActionKind::CreateSlides, slides(&[["mem://x-slow", "mem://y"]]))
        .expect("slides");
    let embed = ActionContext::new()
        .with(ActionKind::MakeItReal, ActionPayload::MakeItReal { html: "<i>ok</i>".into() });
    let embedded = dispatcher.dispatch(ActionKind::MakeItReal, embed).expect("embed");
    assert_eq!(embedded.outcome.rev, Some(1));

    slides.outcome.settle().await;
    assert_eq!(headless.store.rev(), 2);
    let document = headless.store.snapshot();
    assert_eq!(document.count_kind(ElementKind::Embed), 1);
    assert_eq!(document.count_kind(ElementKind::Image), 2);
}
