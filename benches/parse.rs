// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fqltour::format::tour::{extract_fql, parse_tour_with_diagnostics};

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `format.parse_tour`, `format.extract_fql`
// - Case IDs (`small`, `medium`, `large_long_code`) must remain stable so results stay
//   comparable over time.
fn benches_parse(c: &mut Criterion) {
    let cases = [fixtures::Case::Small, fixtures::Case::Medium, fixtures::Case::LargeLongCode];

    {
        let mut group = c.benchmark_group("format.parse_tour");
        for case in cases {
            let source = fixtures::tour_source(case);
            group.throughput(Throughput::Bytes(source.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let (tour, diagnostics) = parse_tour_with_diagnostics(black_box(&source));
                    black_box(fixtures::checksum_tour(black_box(&tour)) + diagnostics.len() as u64)
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.extract_fql");
        for case in cases {
            let source = fixtures::tour_source(case);
            group.throughput(Throughput::Bytes(source.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| black_box(extract_fql(black_box(&source)).len()))
            });
        }
        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_parse
}
criterion_main!(benches);
