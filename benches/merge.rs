// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use mindweave::assets::AssetBinding;
use mindweave::config::EngineConfig;
use mindweave::layout::GeometryResolver;
use mindweave::merge::TreeMergeEngine;
use mindweave::model::{SelectionRegion, TreeNode};
use mindweave::ops::Transaction;
use mindweave::store::{DocumentStore, SharedDocument};

mod fixtures;
mod profiler;

// Group `merge.create` / `merge.expand`; keep case ids stable so runs stay comparable.

fn engine() -> TreeMergeEngine {
    let config = EngineConfig::default();
    TreeMergeEngine::new(config.mindmap, GeometryResolver::new(config.placement))
}

fn create_once(engine: &TreeMergeEngine, payload: &TreeNode) -> u64 {
    let store = SharedDocument::new(AssetBinding::new());
    let selection = SelectionRegion::new(0.0, 0.0, 100.0, 40.0);
    let mut txn = Transaction::open(&store, "bench");
    engine.create(&mut txn, payload, Some(&selection), None).expect("plan");
    txn.commit().expect("commit").result.new_rev
}

fn benches_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge.create");
    let engine = engine();

    for (case, payload) in [
        ("balanced_3x3", fixtures::balanced(3, 3)),
        ("balanced_4x4", fixtures::balanced(4, 4)),
        ("chain_64", fixtures::chain(64)),
    ] {
        group.throughput(Throughput::Elements(payload.len() as u64));
        group.bench_function(case, |b| b.iter(|| black_box(create_once(&engine, black_box(&payload)))));
    }
    group.finish();
}

fn benches_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge.expand");
    let engine = engine();

    let seed = SharedDocument::new(AssetBinding::new());
    let mut txn = Transaction::open(&seed, "seed");
    let planned = engine.create(&mut txn, &fixtures::balanced(4, 3), None, None).expect("seed plan");
    txn.commit().expect("seed commit");
    let planned = planned.expect("seed outcome");
    let target = planned.created.last().cloned().expect("leaf");
    let template = seed.snapshot();

    for (case, payload) in [("leaf_fanout_8", fixtures::balanced(8, 1)), ("leaf_subtree_3x3", fixtures::balanced(3, 3))] {
        group.throughput(Throughput::Elements(payload.len() as u64 - 1));
        group.bench_function(case, |b| {
            b.iter_batched(
                || SharedDocument::with_document(template.clone(), AssetBinding::new()),
                |store| {
                    let mut txn = Transaction::open(&store, "bench");
                    engine.expand(&mut txn, &target, &payload).expect("plan");
                    black_box(txn.commit().expect("commit").result.new_rev)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_create, benches_expand
}
criterion_main!(benches);
