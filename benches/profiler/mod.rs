// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr + PartialOrd>(name: &str, default: T, min: T, max: T) -> T {
    let value = std::env::var(name).ok().and_then(|raw| raw.trim().parse::<T>().ok()).unwrap_or(default);
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Criterion tuned through `MINDWEAVE_BENCH_*` variables, with flamegraphs from pprof.
pub fn criterion() -> Criterion {
    let frequency = env_or("MINDWEAVE_PROFILE_FREQ", 100_i32, 1, 1000);
    let samples = env_or("MINDWEAVE_BENCH_SAMPLES", 50_usize, 10, 200);
    let warm_up = env_or("MINDWEAVE_BENCH_WARMUP_SECS", 2_u64, 1, 60);
    let measure = env_or("MINDWEAVE_BENCH_MEASURE_SECS", 5_u64, 1, 120);

    Criterion::default()
        .sample_size(samples)
        .warm_up_time(Duration::from_secs(warm_up))
        .measurement_time(Duration::from_secs(measure))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
