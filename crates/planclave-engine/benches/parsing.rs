use criterion::{Criterion, criterion_group, criterion_main};
use planclave_engine::{parse, render::render_document};
use pulldown_cmark::Parser;
use std::collections::BTreeSet;
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_plan(100);
    group.bench_function("planclave_parse", |b| {
        b.iter(|| std::hint::black_box(parse(std::hint::black_box(&content))));
    });
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = Parser::new(std::hint::black_box(&content));
            let events: Vec<_> = parser.collect();
            std::hint::black_box(events);
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let content = common::generate_plan(100);
    let blocks = parse(&content);
    let open = BTreeSet::new();
    c.bench_function("render_document", |b| {
        b.iter(|| std::hint::black_box(render_document(std::hint::black_box(&blocks), &open)));
    });
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
