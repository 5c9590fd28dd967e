// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<T>().ok()).unwrap_or(default)
}

/// Criterion configured from `BENCH_*` env vars, sampling a flamegraph at `PROFILE_FREQ` Hz.
pub fn criterion() -> Criterion {
    let frequency = env_or::<i32>("PROFILE_FREQ", 100).clamp(1, 1000);
    let sample_size = env_or::<usize>("BENCH_SAMPLE_SIZE", 60).clamp(10, 200);
    let warmup = Duration::from_secs(env_or::<u64>("BENCH_WARMUP_SECS", 3).clamp(1, 60));
    let measurement = Duration::from_secs(env_or::<u64>("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120));

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(warmup)
        .measurement_time(measurement)
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
