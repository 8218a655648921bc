#[macro_use]
extern crate criterion;

use std::sync::Arc;
use std::time::Duration;

use criterion::Criterion;

use larm_core::prelude::*;

fn build_catalog(events: u16) -> Arc<Catalog<(), ()>> {
    let mut builder = Catalog::<(), ()>::builder();
    for i in 0..events {
        let text = format!("Fault {i}");
        builder
            .define(format!("fault{i}"))
            .on(Category::SoftDisable, Alert::soft_disable(text.clone()))
            .on(Category::NoEntry, Alert::no_entry(text.clone()))
            .on(Category::Permanent, Alert::normal_permanent(text, "Contact Support"));
    }
    Arc::new(builder.build().expect("bench catalog"))
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("arbiter_resolve");

    for active in [4u16, 32, 128] {
        group.throughput(criterion::Throughput::Elements(active as u64));
        group.bench_function(format!("active_{}", active), |b| {
            let arbiter = Arbiter::new(build_catalog(256), Duration::from_millis(10)).unwrap();
            let mut log = arbiter.new_log();
            for i in 0..active {
                log.raise(EventId::new(i * 2), true).unwrap();
            }
            log.retire();
            b.iter(|| {
                arbiter.resolve(&log, &Category::ALL, &(), &(), UnitSystem::Metric)
            });
        });
    }
    group.finish();
}

fn bench_retire(c: &mut Criterion) {
    c.bench_function("event_log_retire", |b| {
        let mut log = EventLog::new(512);
        for i in 0..64 {
            log.raise(EventId::new(i * 8), i % 2 == 0).unwrap();
        }
        b.iter(|| log.retire());
    });
}

criterion_group!(benches, bench_resolve, bench_retire);
criterion_main!(benches);
