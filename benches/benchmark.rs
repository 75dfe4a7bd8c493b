// Lookup benchmarks over synthetic catalogs and dense similarity matrices
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use simrec_core::{Catalog, DenseMatrix, Product, ProductId, Recommender, SimilarityMatrix};
use simrec_storage::{encode_matrix, MatrixFormat, MatrixLoader};

fn generate_recommender(size: usize, seed: u64) -> Recommender {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids: Vec<ProductId> = (0..size).map(|i| ProductId::from(format!("P{i}"))).collect();

    let catalog: Catalog = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            Product::new(id, format!("product {i}"), format!("brand {}", i % 50), rng.random_range(5.0..200.0))
                .with_category(format!("category {}", i % 8))
        })
        .collect();

    let data = (0..size)
        .map(|row| {
            (0..size)
                .map(|col| Some(if row == col { 1.0 } else { rng.random_range(0.0..1.0) }))
                .collect()
        })
        .collect();

    let matrix = SimilarityMatrix::from_dense(DenseMatrix {
        index: ids.clone(),
        columns: ids,
        data,
    })
    .unwrap();

    Recommender::new(catalog, matrix)
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for size in [100, 1000, 2500].iter() {
        let recommender = generate_recommender(*size, 42);
        let query = ProductId::from(format!("P{}", size / 2));

        group.bench_with_input(BenchmarkId::new("top5", size), size, |b, _| {
            b.iter(|| black_box(recommender.recommend(black_box(&query), 5)));
        });
        group.bench_with_input(BenchmarkId::new("top50", size), size, |b, _| {
            b.iter(|| black_box(recommender.recommend(black_box(&query), 50)));
        });
    }

    group.finish();
}

fn benchmark_unknown(c: &mut Criterion) {
    let recommender = generate_recommender(1000, 7);
    let query = ProductId::from("not-a-product");

    c.bench_function("recommend_unknown", |b| {
        b.iter(|| black_box(recommender.recommend(black_box(&query), 5)));
    });
}

fn benchmark_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_matrix");
    group.sample_size(10);

    let recommender = generate_recommender(1000, 3);
    for format in [MatrixFormat::Json, MatrixFormat::GzipJson, MatrixFormat::Bincode] {
        let bytes = encode_matrix(recommender.matrix(), format).unwrap();
        group.bench_with_input(BenchmarkId::new(format!("{:?}", format), 1000), &bytes, |b, bytes| {
            b.iter(|| MatrixLoader::new().load_bytes(black_box(bytes), format).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_recommend, benchmark_unknown, benchmark_load);
criterion_main!(benches);
