//! Size-factor sweep comparing measured and theoretical false positive
//! rates for the fixed and scalable filters.
//!
//! Each row sizes both filters for `len(dataset) * size_factor` items,
//! inserts the whole dataset, and probes with a disjoint test set. Factors
//! below 1.0 deliberately overload the fixed filter.
use crate::bloom::{BloomFilter, BloomFilterStats};
use crate::error::{BloomError, BloomResult};
use crate::scalable::{ScalableBloomFilter, ScalableBloomFilterConfigBuilder};
use derive_builder::Builder;
use serde::Serialize;
use tracing::{error, info};

pub const DEFAULT_SIZE_FACTORS: [f64; 6] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5];

#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct EvaluationConfig {
    /// Target FPR for the fixed filter and the first scalable filter
    #[builder(default = "0.1")]
    pub false_positive_rate: f64,

    /// Multipliers applied to the dataset length to get the capacity
    #[builder(default = "DEFAULT_SIZE_FACTORS.to_vec()")]
    pub size_factors: Vec<f64>,

    #[builder(default = "0.5")]
    pub tightening_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRow {
    pub size_factor: f64,
    pub capacity: usize,
    pub inserted_items: usize,
    pub test_items: usize,
    pub actual_fpr: f64,
    pub theoretical_fpr: f64,
    pub theoretical_memory_kb: f64,
    pub actual_memory_kb: f64,
    pub false_negatives: usize,
    pub scalable_actual_fpr: f64,
    pub scalable_theoretical_fpr: f64,
    pub scalable_filter_count: usize,
}

/// Fraction of `test_set` that `contains` accepts. The test set is
/// assumed disjoint from the dataset.
fn positive_rate<T: AsRef<[u8]>>(
    contains: impl Fn(&[u8]) -> bool,
    test_set: &[T],
) -> f64 {
    if test_set.is_empty() {
        return 0.0;
    }
    let hits = test_set.iter().filter(|t| contains(t.as_ref())).count();
    hits as f64 / test_set.len() as f64
}

pub fn evaluate<T: AsRef<[u8]>>(
    dataset: &[T],
    test_set: &[T],
    config: &EvaluationConfig,
) -> BloomResult<Vec<EvaluationRow>> {
    let mut rows = Vec::with_capacity(config.size_factors.len());

    for &size_factor in &config.size_factors {
        let capacity = ((dataset.len() as f64 * size_factor) as usize).max(1);

        let mut filter =
            BloomFilter::new(config.false_positive_rate, capacity)?;
        let scalable_config = ScalableBloomFilterConfigBuilder::default()
            .initial_fpr(config.false_positive_rate)
            .initial_capacity(capacity)
            .tightening_ratio(config.tightening_ratio)
            .build()
            .map_err(|e| BloomError::InvalidParameter(e.to_string()))?;
        let mut scalable = ScalableBloomFilter::with_config(scalable_config)?;

        filter.add(dataset);
        scalable.add(dataset)?;

        let false_negatives = dataset
            .iter()
            .filter(|item| !filter.contains(item.as_ref()))
            .count();
        if false_negatives > 0 {
            error!(size_factor, false_negatives, "False negatives detected");
        }

        let actual_bytes = std::mem::size_of::<BloomFilter>()
            + filter.approx_memory_bits().div_ceil(8);

        let row = EvaluationRow {
            size_factor,
            capacity,
            inserted_items: filter.insert_count(),
            test_items: test_set.len(),
            actual_fpr: positive_rate(|item| filter.contains(item), test_set),
            theoretical_fpr: filter.theoretical_fpr(),
            theoretical_memory_kb: filter.bit_vector_size() as f64
                / 8.0
                / 1024.0,
            actual_memory_kb: actual_bytes as f64 / 1024.0,
            false_negatives,
            scalable_actual_fpr: positive_rate(
                |item| scalable.contains(item),
                test_set,
            ),
            scalable_theoretical_fpr: scalable.scaled_theoretical_fpr(),
            scalable_filter_count: scalable.filter_count(),
        };

        info!(
            size_factor,
            capacity,
            actual_fpr = row.actual_fpr,
            theoretical_fpr = row.theoretical_fpr,
            scalable_filters = row.scalable_filter_count,
            "Evaluated size factor"
        );
        rows.push(row);
    }

    Ok(rows)
}
