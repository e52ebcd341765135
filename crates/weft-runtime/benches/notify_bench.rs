//! Benchmarks for mounting and notify fan-out.
//!
//! Run with: cargo bench -p weft-runtime --bench notify_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::rc::Rc;
use weft_dom::Document;
use weft_runtime::{MountOptions, ViewModel};

/// A document with `rows` rows, each holding one interpolation and one
/// `v-text` element bound to the same key.
fn make_doc(rows: usize, keys: usize) -> Document {
    let doc = Document::new();
    for i in 0..rows {
        let key = format!("k{}", i % keys);
        let row = doc
            .append_element(doc.root(), "li", &[])
            .expect("append row");
        doc.append_text(row, &format!("row {i}: {{{{ {key} }}}}"))
            .expect("append text");
        doc.append_element(row, "span", &[("v-text", key.as_str())])
            .expect("append span");
    }
    doc
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount");

    for rows in [10, 100, 1000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, &rows| {
            b.iter_batched(
                || Rc::new(make_doc(rows, 8)),
                |doc| {
                    let root = doc.root();
                    black_box(ViewModel::new(doc, MountOptions::node(root)).expect("mount"))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_notify_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify/fan_out");

    for rows in [10, 100, 1000] {
        // Every row is bound to the same key.
        let doc = Rc::new(make_doc(rows, 1));
        let vm = ViewModel::new(Rc::clone(&doc), MountOptions::node(doc.root())).expect("mount");
        group.throughput(Throughput::Elements(2 * rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &(), |b, _| {
            let mut n = 0u32;
            b.iter(|| {
                n = n.wrapping_add(1);
                black_box(vm.set("k0", n))
            });
        });
    }

    group.finish();
}

fn bench_notify_unknown_key(c: &mut Criterion) {
    let doc = Rc::new(make_doc(100, 8));
    let vm = ViewModel::new(Rc::clone(&doc), MountOptions::node(doc.root())).expect("mount");
    c.bench_function("notify/unknown_key", |b| {
        b.iter(|| black_box(vm.notify(black_box("missing"))));
    });
}

criterion_group!(
    benches,
    bench_mount,
    bench_notify_fan_out,
    bench_notify_unknown_key,
);
criterion_main!(benches);
