//! Viewer throughput benchmarks.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rl_tui::Viewer;

fn build_log(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            if i % 10 == 0 {
                format!("\x1b[31merror\x1b[0m: request {i} failed\tretrying\n")
            } else {
                format!("INFO handled request {i} in {}ms\n", i % 97)
            }
        })
        .collect()
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewer_append");

    for lines in [1_000, 10_000] {
        let log = build_log(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &log, |b, log| {
            b.iter(|| {
                let mut viewer = Viewer::new(120, 40);
                for chunk in log.as_bytes().chunks(4096) {
                    viewer.append(black_box(&String::from_utf8_lossy(chunk)));
                }
                viewer
            });
        });
    }

    group.finish();
}

fn bench_filter_and_search(c: &mut Criterion) {
    let mut viewer = Viewer::new(120, 40);
    viewer.append(&build_log(10_000));

    c.bench_function("viewer_filter", |b| {
        b.iter(|| {
            viewer.set_filter(black_box("error|request 9"));
            viewer.set_filter("");
        });
    });

    c.bench_function("viewer_search", |b| {
        b.iter(|| {
            viewer.set_search(black_box("request \\d+"));
            viewer.set_search("");
        });
    });
}

criterion_group!(benches, bench_append, bench_filter_and_search);
criterion_main!(benches);
