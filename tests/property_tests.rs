use proptest::prelude::*;
use rockc::cluster::agglomerate;
use rockc::metrics::{evaluate, pair_confusion};
use rockc::{
    sweep, ClusteringResult, Dataset, GroundTruth, LinkMatrix, NeighborMode, Rock,
    SimilarityMatrix,
};

fn dataset(baskets: &[Vec<u8>]) -> Dataset {
    Dataset::from_transactions(baskets.iter().enumerate().map(|(i, b)| {
        let items: Vec<String> = b.iter().map(|x| format!("item{x}")).collect();
        (format!("r{i}"), items)
    }))
    .unwrap()
}

fn baskets() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(
        prop::collection::btree_set(0u8..8, 0..5).prop_map(|s| s.into_iter().collect()),
        1..14,
    )
}

fn modes() -> impl Strategy<Value = NeighborMode> {
    prop_oneof![Just(NeighborMode::IncludeSelf), Just(NeighborMode::ExcludeEndpoints)]
}

proptest! {
    #[test]
    fn prop_similarity_symmetric_and_bounded(data in baskets()) {
        let ds = dataset(&data);
        let sim = SimilarityMatrix::compute(&ds);
        let n = ds.len();
        prop_assert_eq!(sim.as_condensed().len(), n * n.saturating_sub(1) / 2);
        for i in 0..n {
            prop_assert_eq!(sim.get(i, i), None);
            for j in 0..n {
                if i != j {
                    let s = sim.get(i, j).unwrap();
                    prop_assert!((0.0..=1.0).contains(&s));
                    prop_assert_eq!(Some(s), sim.get(j, i));
                }
            }
        }
    }

    #[test]
    fn prop_links_non_increasing_in_theta(
        data in baskets(),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
        mode in modes(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let ds = dataset(&data);
        let sim = SimilarityMatrix::compute(&ds);
        let low = LinkMatrix::from_similarity(&sim, lo, mode).unwrap();
        let high = LinkMatrix::from_similarity(&sim, hi, mode).unwrap();
        for i in 0..ds.len() {
            for j in (i + 1)..ds.len() {
                prop_assert!(high.get(i, j) <= low.get(i, j));
            }
        }
    }

    #[test]
    fn prop_agglomeration_keeps_a_partition(
        data in baskets(),
        theta in 0.0f64..=1.0,
        k_frac in 0.0f64..1.0,
        mode in modes(),
    ) {
        let ds = dataset(&data);
        let n = ds.len();
        let k = 1 + ((n - 1) as f64 * k_frac) as usize;
        let sim = SimilarityMatrix::compute(&ds);
        let links = LinkMatrix::from_similarity(&sim, theta, mode).unwrap();
        let fit = agglomerate(&links, k).unwrap();

        prop_assert!(fit.history.len() <= n - 1);
        prop_assert!(fit.n_clusters() >= k);
        prop_assert_eq!(fit.n_clusters(), n - fit.history.len());

        // Final clusters are disjoint and cover every record.
        let groups = fit.result.clusters().iter().map(|c| c.members().to_vec()).collect();
        prop_assert!(ClusteringResult::from_clusters(n, groups).is_ok());

        // Every intermediate step is a partition with one cluster fewer.
        let mut prev = n + 1;
        for step in 0..=fit.history.len() {
            let p = fit.history.partition_after(step);
            prop_assert_eq!(p.sizes().iter().sum::<usize>(), n);
            prop_assert_eq!(p.n_clusters(), n - step);
            prop_assert!(p.n_clusters() < prev);
            prev = p.n_clusters();
        }
        let replayed = fit.history.partition_after(fit.history.len());
        prop_assert_eq!(replayed.labels(), fit.result.labels());

        for event in fit.history.iter() {
            prop_assert!(event.links > 0);
            prop_assert!(event.goodness > 0.0 && event.goodness.is_finite());
            prop_assert!(event.left < event.right);
        }
    }

    #[test]
    fn prop_metrics_bounded_and_idempotent(
        pred in prop::collection::vec(0usize..4, 1..30),
        seed_truth in prop::collection::vec(0usize..4, 30),
    ) {
        let truth = GroundTruth::from_labels(seed_truth[..pred.len()].to_vec());
        let result = ClusteringResult::from_labels(&pred);
        let e1 = evaluate(&result, &truth).unwrap();
        let e2 = evaluate(&result, &truth).unwrap();
        prop_assert_eq!(e1, e2);
        for v in [e1.precision, e1.recall, e1.f1] {
            prop_assert!((0.0..=1.0).contains(&v));
        }
        if e1.precision == 0.0 && e1.recall == 0.0 {
            prop_assert_eq!(e1.f1, 0.0);
        }

        let c = pair_confusion(&result, &truth).unwrap();
        let n = pred.len() as u64;
        prop_assert_eq!(
            c.true_positives + c.false_positives + c.false_negatives + c.true_negatives,
            n * (n - 1) / 2
        );
    }

    #[test]
    fn prop_identical_partition_scores_one(labels in prop::collection::vec(0usize..5, 1..30)) {
        let result = ClusteringResult::from_labels(&labels);
        let truth = GroundTruth::from_labels(labels.clone());
        let e = evaluate(&result, &truth).unwrap();
        prop_assert_eq!(e.precision, 1.0);
        prop_assert_eq!(e.recall, 1.0);
        prop_assert_eq!(e.f1, 1.0);
    }

    #[test]
    fn prop_sweep_preserves_theta_order(
        data in baskets(),
        thetas in prop::collection::vec(0.0f64..=1.0, 0..6),
    ) {
        let ds = dataset(&data);
        let truth = GroundTruth::from_labels((0..ds.len()).map(|i| i % 2).collect());
        let samples = sweep(&ds, &truth, &thetas, 1).unwrap();
        prop_assert_eq!(samples.len(), thetas.len());
        for (s, t) in samples.iter().zip(&thetas) {
            prop_assert_eq!(s.theta, *t);
        }
    }

    #[test]
    fn prop_rock_deterministic(data in baskets(), theta in 0.0f64..=1.0) {
        let ds = dataset(&data);
        let a = Rock::new(theta, 1).fit(&ds).unwrap();
        let b = Rock::new(theta, 1).fit(&ds).unwrap();
        prop_assert_eq!(a.result, b.result);
        prop_assert_eq!(a.history, b.history);
    }
}
