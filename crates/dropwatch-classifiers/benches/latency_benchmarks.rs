//! Latency benchmarks for the prediction path
//!
//! Covers the per-request work only: validation, standardization, and tree
//! evaluation. One-time loading is excluded.
//!
//! Run with: cargo bench -p dropwatch-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[path = "../tests/mock_classifiers.rs"]
mod mock_classifiers;

use dropwatch_classifiers::{
    PredictionPipeline, PredictionService, ScalerSource, StaticModelLoader, Standardizer,
};
use dropwatch_core::FeatureSchema;
use mock_classifiers::{default_student, reference_rows, struggling_student, test_model};

fn benchmark_standardizer(c: &mut Criterion) {
    let rows = reference_rows(200);

    let mut group = c.benchmark_group("Standardizer");
    group.bench_function("fit_200_rows", |b| {
        b.iter(|| Standardizer::fit(FeatureSchema::student(), black_box(&rows)).unwrap())
    });

    let scaler = Standardizer::fit(FeatureSchema::student(), &rows).unwrap();
    let vector = default_student();
    group.bench_function("transform", |b| {
        b.iter(|| scaler.transform(black_box(&vector)).unwrap())
    });

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let scaler = Arc::new(Standardizer::fit(FeatureSchema::student(), &reference_rows(200)).unwrap());
    let pipeline = PredictionPipeline::new(scaler, test_model()).unwrap();

    let cases = vec![
        ("default_student", default_student()),
        ("struggling_student", struggling_student()),
    ];

    let mut group = c.benchmark_group("PredictionPipeline");
    group.sample_size(100);

    for (name, vector) in &cases {
        group.bench_with_input(BenchmarkId::new("predict", name), vector, |b, vector| {
            b.iter(|| pipeline.predict(black_box(vector)).unwrap())
        });
    }

    group.finish();
}

/// Service overhead once initialized: a cell read on top of the pipeline
fn benchmark_service(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let scaler = Standardizer::fit(FeatureSchema::student(), &reference_rows(200)).unwrap();
    let service = PredictionService::new(
        Arc::new(StaticModelLoader::new(test_model())),
        ScalerSource::Fitted(scaler.parameters().clone()),
    );
    rt.block_on(service.initialize()).unwrap();

    let vector = struggling_student();
    c.bench_function("service_predict_warm", |b| {
        b.iter(|| rt.block_on(async { service.predict(black_box(&vector)).await.unwrap() }))
    });
}

criterion_group!(benches, benchmark_standardizer, benchmark_pipeline, benchmark_service);
criterion_main!(benches);
