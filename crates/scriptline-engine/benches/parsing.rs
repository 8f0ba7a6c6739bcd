use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use scriptline_engine::editing::Parser;
use scriptline_engine::parsing::ScreenplayLineClassifier;
mod common;

fn bench_full_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_parse");
    group.sample_size(10);

    for scenes in [10, 100, 1000] {
        let content = common::generate_script(scenes);
        group.bench_with_input(BenchmarkId::from_parameter(scenes), &content, |b, content| {
            b.iter(|| {
                let parser = Parser::new(std::hint::black_box(content));
                std::hint::black_box(parser);
            });
        });
    }

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    group.sample_size(10);

    let content = common::generate_script(100);
    group.bench_function("classify_text", |b| {
        b.iter(|| {
            let lines = ScreenplayLineClassifier.classify_text(std::hint::black_box(&content));
            std::hint::black_box(lines);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_full_parse, bench_classification);
criterion_main!(benches);
