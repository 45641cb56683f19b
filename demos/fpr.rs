use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use rand::{Rng, distr::Alphanumeric};
use scalable_bloom_rs::{BloomFilter, ScalableBloomFilter};
use std::collections::HashSet;

const TEST_SAMPLES: usize = 50_000; // Number of unknown elements to test for FPR
const OVERFILL: f64 = 2.0; // Scalable filter receives twice its initial capacity

fn generate_random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔═══════════════════════════════════════════════════════╗");
    println!("║  Bloom Filter - Measured vs Theoretical FPR Tester    ║");
    println!("╚═══════════════════════════════════════════════════════╝\n");

    let capacities = [1_000, 10_000, 100_000];
    let target_fprs = [0.01, 0.001];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Capacity").set_alignment(CellAlignment::Center),
            Cell::new("Target FPR").set_alignment(CellAlignment::Center),
            Cell::new("m / k").set_alignment(CellAlignment::Center),
            Cell::new("Theoretical").set_alignment(CellAlignment::Center),
            Cell::new("Observed").set_alignment(CellAlignment::Center),
            Cell::new("Scalable Filters").set_alignment(CellAlignment::Center),
            Cell::new("Scalable Theoretical").set_alignment(CellAlignment::Center),
            Cell::new("Scalable Observed").set_alignment(CellAlignment::Center),
        ]);

    for &capacity in &capacities {
        for &target_fpr in &target_fprs {
            print!(
                "Testing capacity={}, target_fpr={:.2}%... ",
                capacity,
                target_fpr * 100.0
            );

            let known: Vec<String> =
                (0..capacity).map(|_| generate_random_string(32)).collect();
            let known_set: HashSet<String> = known.iter().cloned().collect();
            let probes: Vec<String> =
                (0..TEST_SAMPLES).map(|_| generate_random_string(24)).collect();

            let mut filter = BloomFilter::new(target_fpr, capacity)?;
            filter.add(&known);

            let overfill_count = (capacity as f64 * OVERFILL) as usize;
            let overfill: Vec<String> = (0..overfill_count)
                .map(|_| generate_random_string(32))
                .collect();
            let overfill_set: HashSet<String> =
                overfill.iter().cloned().collect();
            let mut scalable =
                ScalableBloomFilter::new(target_fpr, capacity, 0.5)?;
            scalable.add(&overfill)?;

            let missing = known
                .iter()
                .filter(|k| !filter.contains(k.as_bytes()))
                .count();
            assert_eq!(missing, 0, "false negatives in fixed filter");

            println!("Done!");

            table.add_row(vec![
                Cell::new(capacity),
                Cell::new(format!("{:.2}%", target_fpr * 100.0)),
                Cell::new(format!(
                    "{} / {}",
                    filter.bit_vector_size(),
                    filter.num_hashes()
                )),
                Cell::new(format!("{:.4}%", filter.theoretical_fpr() * 100.0)),
                Cell::new(format!(
                    "{:.4}%",
                    filter.measured_fpr(&probes, &known_set) * 100.0
                )),
                Cell::new(scalable.filter_count()),
                Cell::new(format!(
                    "{:.4}%",
                    scalable.scaled_theoretical_fpr() * 100.0
                )),
                Cell::new(format!(
                    "{:.4}%",
                    scalable.measured_fpr(&probes, &overfill_set) * 100.0
                )),
            ]);
        }
    }

    println!("\nResults:");
    println!("{table}");

    Ok(())
}
