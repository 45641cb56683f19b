use super::{ScalableBloomFilterConfig, ScalableBloomFilterConfigBuilder};
use crate::bloom::{
    BloomFilter, BloomFilterConfigBuilder, BloomFilterOps, BloomFilterStats,
};
use crate::error::{BloomError, BloomResult};
use crate::fpr::measure_false_positive_rate;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::info;

/// Append-only chain of [`BloomFilter`]s.
///
/// Only the last filter receives insertions. Once its load factor passes
/// `max_load_factor` a new filter is appended with the same capacity and
/// the FPR multiplied by `tightening_ratio`, so the compound FPR
/// `1 - Π(1 - fpr_i)` converges however long the chain gets.
pub struct ScalableBloomFilter {
    config: ScalableBloomFilterConfig,
    filters: Vec<BloomFilter>,
    next_fpr: f64,
    next_capacity: usize,
}

impl ScalableBloomFilter {
    pub fn new(
        initial_fpr: f64,
        initial_n: usize,
        tightening_ratio: f64,
    ) -> BloomResult<Self> {
        let config = ScalableBloomFilterConfigBuilder::default()
            .initial_fpr(initial_fpr)
            .initial_capacity(initial_n)
            .tightening_ratio(tightening_ratio)
            .build()
            .map_err(|e| BloomError::InvalidParameter(e.to_string()))?;
        Self::with_config(config)
    }

    pub fn with_config(config: ScalableBloomFilterConfig) -> BloomResult<Self> {
        config.validate()?;

        let mut filter = Self {
            next_fpr: config.initial_fpr,
            next_capacity: config.initial_capacity,
            config,
            filters: Vec::new(),
        };
        filter.add_filter()?;
        Ok(filter)
    }

    pub fn config(&self) -> &ScalableBloomFilterConfig {
        &self.config
    }

    /// Appends a filter sized for `(next_capacity, next_fpr)` and tightens
    /// the FPR for the following step. On error nothing changes.
    pub fn add_filter(&mut self) -> BloomResult<()> {
        let config = BloomFilterConfigBuilder::default()
            .capacity(self.next_capacity)
            .false_positive_rate(self.next_fpr)
            .hash_function(self.config.hash_function)
            .build()
            .map_err(|e| BloomError::InvalidParameter(e.to_string()))?;
        let filter = BloomFilter::with_config(config)?;

        info!(
            index = self.filters.len(),
            fpr = self.next_fpr,
            capacity = self.next_capacity,
            m = filter.bit_vector_size(),
            k = filter.num_hashes(),
            "Appended filter to scalable chain"
        );

        self.filters.push(filter);
        self.next_fpr *= self.config.tightening_ratio;
        Ok(())
    }

    /// Inserts into the active filter, then grows the chain if that
    /// filter is now full. The check runs after every item.
    ///
    /// An `Err` comes only from the growth step. The item itself has
    /// already been recorded in the active filter by then, and `contains`
    /// reports it, so retrying the insert is unnecessary.
    pub fn insert(&mut self, item: &[u8]) -> BloomResult<()> {
        let active = self.active_filter_mut();
        active.insert(item);
        if self.is_full(self.active_filter()) {
            self.add_filter()?;
        }
        Ok(())
    }

    pub fn add<I, T>(&mut self, items: I) -> BloomResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for item in items {
            self.insert(item.as_ref())?;
        }
        Ok(())
    }

    pub fn contains(&self, item: &[u8]) -> bool {
        self.filters.iter().any(|filter| filter.contains(item))
    }

    fn is_full(&self, filter: &BloomFilter) -> bool {
        filter.load_factor() > self.config.max_load_factor
    }

    pub fn filters(&self) -> &[BloomFilter] {
        &self.filters
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn active_filter(&self) -> &BloomFilter {
        // The chain is seeded with one filter at construction and only grows.
        &self.filters[self.filters.len() - 1]
    }

    fn active_filter_mut(&mut self) -> &mut BloomFilter {
        let last = self.filters.len() - 1;
        &mut self.filters[last]
    }

    /// FPR the next appended filter will be sized for.
    pub fn next_fpr(&self) -> f64 {
        self.next_fpr
    }

    pub fn next_capacity(&self) -> usize {
        self.next_capacity
    }

    /// `1 - Π(1 - fpr_i)` over all chained filters.
    pub fn scaled_theoretical_fpr(&self) -> f64 {
        let pass_all: f64 = self
            .filters
            .iter()
            .map(|filter| 1.0 - filter.theoretical_fpr())
            .product();
        1.0 - pass_all
    }

    pub fn measured_fpr<T>(
        &self,
        test_items: &[T],
        actual_items: &HashSet<T>,
    ) -> f64
    where
        T: AsRef<[u8]> + Eq + Hash,
    {
        measure_false_positive_rate(
            |item| self.contains(item),
            test_items,
            actual_items,
        )
    }

    pub fn approx_memory_bits(&self) -> usize {
        self.filters.iter().map(BloomFilter::approx_memory_bits).sum()
    }
}

impl BloomFilterOps for ScalableBloomFilter {
    fn insert(&mut self, item: &[u8]) -> BloomResult<()> {
        ScalableBloomFilter::insert(self, item)
    }

    fn contains(&self, item: &[u8]) -> bool {
        ScalableBloomFilter::contains(self, item)
    }
}

impl BloomFilterStats for ScalableBloomFilter {
    /// Sum of the capacities of all chained filters.
    fn capacity(&self) -> usize {
        self.filters.iter().map(BloomFilterStats::capacity).sum()
    }

    fn false_positive_rate(&self) -> f64 {
        self.config.initial_fpr
    }

    fn insert_count(&self) -> usize {
        self.filters.iter().map(BloomFilterStats::insert_count).sum()
    }
}

impl std::fmt::Debug for ScalableBloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ScalableBloomFilter {{ filters: {}, initial_fpr: {}, capacity_per_filter: {}, tightening_ratio: {}, next_fpr: {} }}",
            self.filters.len(),
            self.config.initial_fpr,
            self.next_capacity,
            self.config.tightening_ratio,
            self.next_fpr
        )
    }
}
