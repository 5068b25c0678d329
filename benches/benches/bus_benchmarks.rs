use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use panelbus::{subscriber_fn, Bus, SubscriberRef};

fn noop() -> SubscriberRef {
    subscriber_fn("noop", |_, payload| {
        black_box(payload);
        Ok(())
    })
}

fn bench_register(c: &mut Criterion) {
    let sub = noop();
    c.bench_function("register", |b| {
        b.iter_batched(
            Bus::new,
            |bus| {
                for _ in 0..100 {
                    black_box(bus.register("Sequencer|Transport|%w", &sub));
                }
                bus
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_publish_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_fanout");
    let payload = json!({"beat": 4, "bar": 12});
    for count in [1usize, 10, 100] {
        let bus = Bus::new();
        let subs: Vec<_> = (0..count).map(|_| noop()).collect();
        for (i, sub) in subs.iter().enumerate() {
            let pattern = if i % 2 == 0 { "Transport" } else { "Sequencer|Transport|%w+" };
            bus.register(pattern, sub);
        }
        // Прогрев кэша скомпилированных шаблонов.
        bus.publish("Sequencer|Transport|Play", &payload);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| bus.publish(black_box("Sequencer|Transport|Play"), &payload))
        });
    }
    group.finish();
}

fn bench_publish_no_match(c: &mut Criterion) {
    let bus = Bus::new();
    let subs: Vec<_> = (0..100).map(|_| noop()).collect();
    for sub in &subs {
        bus.register("Mixer|Channel|%d+", sub);
    }
    c.bench_function("publish_100_no_match", |b| {
        b.iter(|| bus.publish(black_box("Sequencer|Transport|Play"), &serde_json::Value::Null))
    });
}

criterion_group!(
    benches,
    bench_register,
    bench_publish_fanout,
    bench_publish_no_match
);
criterion_main!(benches);
