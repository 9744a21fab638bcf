use criterion::{black_box, criterion_group, criterion_main, Criterion};

use interviewbot_core::gateway::{clean_model_output, parse_evaluation};

fn bench_clean_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_model_output");

    let fenced = "```json\n{\"score\": 7, \"strengths\": [\"clear\"], \"weaknesses\": [], \"suggestions\": []}\n```";
    let bare = "{\"score\": 7, \"strengths\": [\"clear\"], \"weaknesses\": [], \"suggestions\": []}";

    group.bench_function("fenced", |b| {
        b.iter(|| clean_model_output(black_box(fenced)))
    });

    group.bench_function("bare", |b| {
        b.iter(|| clean_model_output(black_box(bare)))
    });

    group.finish();
}

fn bench_parse_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_evaluation");

    let small = generate_evaluation_json(3);
    let large = generate_evaluation_json(100);
    let prose = "The candidate gave a solid answer overall. Score: 7/10.";

    group.bench_function("3_items", |b| {
        b.iter(|| parse_evaluation(black_box(&small)))
    });

    group.bench_function("100_items", |b| {
        b.iter(|| parse_evaluation(black_box(&large)))
    });

    group.bench_function("unparsable", |b| {
        b.iter(|| parse_evaluation(black_box(prose)))
    });

    group.finish();
}

fn generate_evaluation_json(n: usize) -> String {
    let items: Vec<String> = (0..n).map(|i| format!("\"point {i}\"")).collect();
    let list = items.join(", ");
    format!(
        "```json\n{{\"score\": 6.5, \"strengths\": [{list}], \"weaknesses\": [{list}], \"suggestions\": [{list}]}}\n```"
    )
}

criterion_group!(benches, bench_clean_output, bench_parse_evaluation);
criterion_main!(benches);
