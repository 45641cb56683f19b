use clap::{Parser, Subcommand};
use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use scalable_bloom_rs::{
    BloomFilter, BloomParams, EvaluationConfigBuilder, common::bits2hr,
    evaluation::{DEFAULT_SIZE_FACTORS, evaluate},
};
use std::{
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the derived bit vector size and hash count
    Params {
        /// Expected number of elements
        #[arg(short, long, default_value = "1000")]
        capacity: usize,

        /// Target false positive rate (between 0 and 1)
        #[arg(short, long, default_value = "0.01")]
        fpr: f64,
    },

    /// Compare measured and theoretical FPR across size factors
    Evaluate {
        /// Dataset file, one item per line
        #[arg(short, long, conflicts_with = "synthetic")]
        dataset: Option<PathBuf>,

        /// Generate this many synthetic items instead of reading a file
        #[arg(short, long, default_value = "10000")]
        synthetic: usize,

        /// Number of probe items known to be absent
        #[arg(short, long, default_value = "50000")]
        test_items: usize,

        /// Target false positive rate (between 0 and 1)
        #[arg(short, long, default_value = "0.1")]
        fpr: f64,

        /// Size factors applied to the dataset length
        #[arg(long, value_delimiter = ',')]
        size_factors: Option<Vec<f64>>,

        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Insert every line of a file and save the bit dump
    Build {
        /// Input file, one item per line
        #[arg(short, long)]
        input: PathBuf,

        /// Output bit dump
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, default_value = "1000")]
        capacity: usize,

        #[arg(short, long, default_value = "0.01")]
        fpr: f64,
    },

    /// Load a bit dump and check items
    Query {
        /// Bit dump written by `build`
        #[arg(short, long)]
        dump: PathBuf,

        /// Capacity the dump was built with
        #[arg(short, long, default_value = "1000")]
        capacity: usize,

        /// False positive rate the dump was built with
        #[arg(short, long, default_value = "0.01")]
        fpr: f64,

        /// Items to check
        #[arg(required = true)]
        items: Vec<String>,
    },
}

fn read_lines(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Params { capacity, fpr } => {
            let filter = BloomFilter::new(fpr, capacity)?;
            let BloomParams {
                bit_vector_size,
                num_hashes,
            } = *filter.params();

            println!("Capacity (n):        {capacity}");
            println!("Target FPR:          {:.4}%", fpr * 100.0);
            println!("Bit vector size (m): {bit_vector_size}");
            println!("Hash functions (k):  {num_hashes}");
            println!("Bits per item:       {:.2}", filter.bits_per_item());
            println!("Memory:              {}", bits2hr(bit_vector_size));
            println!(
                "Theoretical FPR:     {:.4}%",
                filter.theoretical_fpr() * 100.0
            );
        }

        Commands::Evaluate {
            dataset,
            synthetic,
            test_items,
            fpr,
            size_factors,
            json,
        } => {
            let dataset = match dataset {
                Some(path) => {
                    let lines = read_lines(&path)?;
                    info!(items = lines.len(), path = %path.display(), "Loaded dataset");
                    lines
                }
                None => (0..synthetic).map(|i| format!("item_{i}")).collect(),
            };
            let test_set: Vec<String> =
                (0..test_items).map(|i| format!("test_{i}")).collect();

            let config = EvaluationConfigBuilder::default()
                .false_positive_rate(fpr)
                .size_factors(
                    size_factors.unwrap_or_else(|| DEFAULT_SIZE_FACTORS.to_vec()),
                )
                .build()?;
            let rows = evaluate(&dataset, &test_set, &config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(
                    [
                        "Size Factor",
                        "Capacity",
                        "Inserted",
                        "Actual FPR",
                        "Theoretical FPR",
                        "Memory (KB)",
                        "False Negatives",
                        "Scalable FPR",
                        "Scalable Theoretical",
                        "Filters",
                    ]
                    .map(|h| Cell::new(h).set_alignment(CellAlignment::Center)),
                );

            for row in &rows {
                table.add_row(vec![
                    Cell::new(format!("{:.2}", row.size_factor)),
                    Cell::new(row.capacity),
                    Cell::new(row.inserted_items),
                    Cell::new(format!("{:.4}%", row.actual_fpr * 100.0)),
                    Cell::new(format!("{:.4}%", row.theoretical_fpr * 100.0)),
                    Cell::new(format!(
                        "{:.2} / {:.2}",
                        row.theoretical_memory_kb, row.actual_memory_kb
                    )),
                    Cell::new(row.false_negatives),
                    Cell::new(format!("{:.4}%", row.scalable_actual_fpr * 100.0)),
                    Cell::new(format!(
                        "{:.4}%",
                        row.scalable_theoretical_fpr * 100.0
                    )),
                    Cell::new(row.scalable_filter_count),
                ]);
            }

            println!("{table}");
        }

        Commands::Build {
            input,
            output,
            capacity,
            fpr,
        } => {
            let items = read_lines(&input)?;
            let mut filter = BloomFilter::new(fpr, capacity)?;
            filter.add(&items);
            filter.save(&output)?;

            println!(
                "Inserted {} items, {} of {} bits set, saved to {}",
                items.len(),
                filter.count_ones(),
                filter.bit_vector_size(),
                output.display()
            );
        }

        Commands::Query {
            dump,
            capacity,
            fpr,
            items,
        } => {
            let mut filter = BloomFilter::new(fpr, capacity)?;
            filter.load(&dump)?;

            for item in &items {
                let verdict = if filter.contains(item.as_bytes()) {
                    "possibly present"
                } else {
                    "absent"
                };
                println!("{item}: {verdict}");
            }
        }
    }

    Ok(())
}
