use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use rockc::{build_links, sweep, Dataset, GroundTruth, Rock};

/// `n` baskets drawn from `segments` disjoint-ish item pools, with some noise items.
fn synthetic(n: usize, segments: usize, rng: &mut StdRng) -> (Dataset, GroundTruth) {
    let mut transactions = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let seg = i % segments;
        let size = rng.random_range(3..7);
        let items: Vec<String> = (0..size)
            .map(|_| {
                if rng.random::<f32>() < 0.1 {
                    format!("noise{}", rng.random_range(0..20))
                } else {
                    format!("s{seg}_{}", rng.random_range(0..10))
                }
            })
            .collect();
        transactions.push((format!("t{i}"), items));
        labels.push(seg);
    }
    let data = Dataset::from_transactions(transactions).unwrap();
    (data, GroundTruth::from_labels(labels))
}

fn bench_rock(c: &mut Criterion) {
    let mut group = c.benchmark_group("rock");
    let mut rng = StdRng::seed_from_u64(42);
    let (data, truth) = synthetic(300, 4, &mut rng);

    group.bench_function("links_n300", |b| {
        b.iter(|| build_links(black_box(&data), 0.3).unwrap());
    });

    group.bench_function("fit_n300_k4", |b| {
        b.iter(|| Rock::new(0.3, 4).fit(black_box(&data)).unwrap());
    });

    group.bench_function("sweep_n300_5_thetas", |b| {
        b.iter(|| sweep(black_box(&data), &truth, &[0.1, 0.2, 0.3, 0.4, 0.5], 4).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_rock);
criterion_main!(benches);
