//! Routing benchmark: tokenize, route, colorize and admit.
//!
//! Target: a full 200-lane steady-state pipeline keeps up with 10k lines/s
//! with plenty of headroom.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lanescope::cluster::{jaccard_history, tokenize};
use lanescope::{Colorizer, LaneRouter, LaneStore, Pipeline, RouterConfig};

/// A repeating mix of strace, HTTP and SQL lines.
fn sample_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("read({}, \"...\", 4096) = {}", i % 9, i % 4096),
            1 => format!("stat(\"/data/code/app/mod{}.py\", {{...}}) = 0", i % 13),
            2 => format!("10.0.0.{} - - \"GET /api/items/{} HTTP/1.1\" 200 512", i % 255, i % 50),
            _ => format!("SELECT * FROM portal_user_session_{} WHERE id = {i}", i % 7),
        })
        .collect()
}

fn pipeline(lanes: usize) -> Pipeline {
    Pipeline::new(
        LaneRouter::seeded(RouterConfig::default(), 42),
        Colorizer::with_default_rules().expect("default rules compile"),
        LaneStore::new(lanes, 1024),
    )
}

fn bench_tokenize(c: &mut Criterion) {
    let line = "openat(AT_FDCWD, \"/data/code/app/views.py\", O_RDONLY|O_CLOEXEC) = 3 read 4096 bytes";
    c.bench_function("tokenize_strace_line", |b| b.iter(|| tokenize(black_box(line))));
}

fn bench_jaccard_history(c: &mut Criterion) {
    let history: Vec<_> = sample_lines(5).iter().map(|l| tokenize(l)).collect();
    let current = tokenize("GET api items 200 512 HTTP");
    c.bench_function("jaccard_history_5", |b| {
        b.iter(|| jaccard_history(black_box(&history), black_box(&current)));
    });
}

fn bench_steady_state(c: &mut Criterion) {
    let lines = sample_lines(1000);
    let mut group = c.benchmark_group("pipeline_steady_state");
    group.throughput(Throughput::Elements(lines.len() as u64));

    for lanes in [40usize, 120, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(lanes), &lanes, |b, &lanes| {
            let mut warm = pipeline(lanes);
            // Past warm-up, with every lane holding some history.
            for line in sample_lines(lanes * 6) {
                warm.ingest(&line);
            }
            b.iter_batched(
                || warm.clone(),
                |mut pipeline| {
                    pipeline.ingest_batch(black_box(&lines));
                    pipeline
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_colorize(c: &mut Criterion) {
    let colorizer = Colorizer::with_default_rules().expect("default rules compile");
    let line = "10.0.0.7 - - \"GET /portal_user_session_log HTTP/1.1\" 200 512";
    c.bench_function("colorize_default_rules", |b| {
        b.iter(|| colorizer.colorize(black_box(line)));
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_jaccard_history,
    bench_steady_state,
    bench_colorize
);
criterion_main!(benches);
