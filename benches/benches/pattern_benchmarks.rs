use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use panelbus::{MatchMode, Pattern, TopicMatcher};

const TOPIC: &str = "Sequencer|Transport|Play";

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_compile");
    for pattern in ["Transport", "Sequencer|Transport|%w+", "^(%w+)|(%w+)|%f[%w]%a+$"] {
        group.bench_with_input(BenchmarkId::from_parameter(pattern), pattern, |b, p| {
            b.iter(|| Pattern::new(black_box(p)).unwrap())
        });
    }
    group.finish();
}

fn bench_match_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("topic_match");
    for (pattern, mode) in [
        ("Play", MatchMode::Partial),
        ("Sequencer|Transport|%w", MatchMode::Partial),
        ("Sequencer|Transport|%a+", MatchMode::Anchored),
        ("Sequencer|Transport|*", MatchMode::Glob),
    ] {
        let matcher = TopicMatcher::compile(pattern, mode).unwrap();
        group.bench_function(format!("{mode}:{pattern}"), |b| {
            b.iter(|| matcher.matches(black_box(TOPIC)).unwrap())
        });
    }
    group.finish();
}

fn bench_backtracking(c: &mut Criterion) {
    let pattern = Pattern::new("a.-b.-c.-d").unwrap();
    let topic = "a".repeat(64) + "bcd";
    c.bench_function("lazy_backtracking", |b| {
        b.iter(|| pattern.is_match(black_box(&topic)).unwrap())
    });
}

criterion_group!(benches, bench_compile, bench_match_modes, bench_backtracking);
criterion_main!(benches);
