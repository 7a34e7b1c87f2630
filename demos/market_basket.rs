//! ROCK vs linkage baselines on a small market-basket dataset, with a theta sweep.
//!
//! Run with `RUST_LOG=rockc=debug` to see the pipeline stages.

use rockc::cluster::{Clustering, Linkage, LinkageBaseline, Rock};
use rockc::{compare, Dataset, GroundTruth, Sweep};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Three shopper segments. "milk" and "bread" show up across segments and
    // are exactly the kind of item that makes distance-based linkage chain.
    let baskets = [
        ("b1", vec!["bread", "butter", "jam"], "breakfast"),
        ("b2", vec!["bread", "butter", "milk"], "breakfast"),
        ("b3", vec!["bread", "jam", "milk", "honey"], "breakfast"),
        ("b4", vec!["butter", "jam", "bread", "honey"], "breakfast"),
        ("g1", vec!["charcoal", "sausages", "buns"], "grill"),
        ("g2", vec!["charcoal", "sausages", "bread"], "grill"),
        ("g3", vec!["sausages", "buns", "ketchup"], "grill"),
        ("g4", vec!["charcoal", "buns", "ketchup", "sausages"], "grill"),
        ("p1", vec!["diapers", "wipes", "milk"], "baby"),
        ("p2", vec!["diapers", "wipes", "formula"], "baby"),
        ("p3", vec!["formula", "milk", "wipes"], "baby"),
        ("p4", vec!["diapers", "formula", "wipes", "milk"], "baby"),
    ];

    let records = baskets.iter().map(|(id, items, _)| (*id, items.clone()));
    let data = Dataset::from_transactions(records)?;
    let truth = GroundTruth::new(&data, baskets.iter().map(|(id, _, label)| (*id, *label)))?;

    let fit = Rock::new(0.4, 3).fit(&data)?;
    println!("=== ROCK (theta=0.4, k=3): {:?} ===", fit.termination);
    for (c, ids) in fit.result.record_ids(&data)?.iter().enumerate() {
        println!("  cluster {c}: {ids:?}");
    }
    println!("  merge goodness: {:.3?}", fit.history.goodness_series());

    let rock = Rock::new(0.4, 3);
    let single = LinkageBaseline::new(3).with_linkage(Linkage::Single);
    let average = LinkageBaseline::new(3).with_linkage(Linkage::Average);
    let complete = LinkageBaseline::new(3).with_linkage(Linkage::Complete);
    let strategies: [&dyn Clustering; 4] = [&rock, &single, &average, &complete];

    println!("\n=== Strategy comparison (k=3) ===");
    println!("  {:<18} {:>9} {:>9} {:>9}", "strategy", "precision", "recall", "f1");
    for report in compare(&strategies, &data, &truth)? {
        println!(
            "  {:<18} {:>9.3} {:>9.3} {:>9.3}",
            report.name, report.evaluation.precision, report.evaluation.recall, report.evaluation.f1
        );
    }

    println!("\n=== Theta sweep (k=3) ===");
    println!(
        "  {:>5} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "theta", "recall", "precision", "f1", "goodness", "clusters"
    );
    for s in Sweep::linspace(0.1, 1.0, 10, 3)?.run(&data, &truth)? {
        println!(
            "  {:>5.2} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9}",
            s.theta, s.recall, s.precision, s.f1, s.goodness, s.n_clusters
        );
    }

    Ok(())
}
