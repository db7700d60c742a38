//! Performance benchmarks for answer-engine

use answer_engine::{export_text, import_text, merge, AnswerSet, AnswerSnapshot};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Build a local/remote pair where a third of the keys match, a third
/// diverge, and a third exist only remotely.
fn create_answer_sets(size: usize) -> (AnswerSet, AnswerSet) {
    let mut local = AnswerSet::new();
    let mut remote = AnswerSet::new();

    for i in 0..size {
        let id = format!("lesson{}_q{}", i / 10, i % 10);
        match i % 3 {
            0 => {
                local.insert(id.clone(), format!("shared answer {i}"));
                remote.insert(id, format!("shared answer {i}"));
            }
            1 => {
                local.insert(id.clone(), format!("local answer {i}"));
                remote.insert(id, format!("remote answer {i}"));
            }
            _ => {
                remote.insert(id, format!("remote only {i}"));
            }
        }
    }

    (local, remote)
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [10, 100, 1000, 10000] {
        let (local, remote) = create_answer_sets(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| merge(black_box(&local), black_box(&remote)))
        });
    }

    group.finish();
}

fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("formats");
    let (local, _) = create_answer_sets(1000);

    group.bench_function("snapshot_to_json", |b| {
        b.iter(|| AnswerSnapshot::from_set(black_box(&local)).to_json())
    });

    let snapshot = AnswerSnapshot::from_set(&local).to_json().unwrap();
    group.bench_function("snapshot_from_json", |b| {
        b.iter(|| AnswerSnapshot::from_json(black_box(&snapshot)).and_then(|s| s.into_set()))
    });

    group.bench_function("export_text", |b| b.iter(|| export_text(black_box(&local))));

    let exported = export_text(&local).unwrap();
    group.bench_function("import_text", |b| {
        b.iter(|| import_text(black_box(&exported)))
    });

    group.finish();
}

criterion_group!(benches, bench_merge, bench_formats);
criterion_main!(benches);
