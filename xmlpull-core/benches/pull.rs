//! Pull-engine benchmarks: deep nesting and wide sibling runs.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use xmlpull_core::{Element, PullEvents, QName, Value};

fn deep_tree(depth: usize) -> Element {
    let mut el = Element::new(QName::new("leaf"));
    for _ in 0..depth {
        el = Element::new(QName::new("n")).child(el);
    }
    el
}

fn wide_tree(width: usize) -> Element {
    let mut el = Element::new(QName::new("row"));
    for n in 0..width as i64 {
        el = el.child(Element::new(QName::new("cell")).child(Value::Int(n)));
    }
    el
}

fn bench_pull(c: &mut Criterion) {
    c.bench_function("pull_deep_10k", |b| {
        b.iter_batched(
            || deep_tree(10_000),
            |tree| black_box(PullEvents::new(tree).count()),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("pull_wide_10k", |b| {
        b.iter_batched(
            || wide_tree(10_000),
            |tree| black_box(PullEvents::new(tree).count()),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_pull);
criterion_main!(benches);
