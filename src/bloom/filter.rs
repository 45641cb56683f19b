use super::{
    BloomFilterConfig, BloomFilterConfigBuilder, BloomFilterOps,
    BloomFilterStats, BloomParams,
};
use crate::error::{BloomError, BloomResult};
use crate::fpr::measure_false_positive_rate;
use crate::hash::probe_indices;
use bitvec::{bitvec, order::Lsb0, vec::BitVec};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// A single bit vector of `m` bits probed at `k` positions per item.
///
/// Bits only ever go from 0 to 1; there is no removal.
pub struct BloomFilter {
    config: BloomFilterConfig,
    params: BloomParams,
    bits: BitVec<usize, Lsb0>,
    insert_count: usize,
}

impl BloomFilter {
    /// Sizes a filter for `n` items at `target_fpr` with the default hash.
    pub fn new(target_fpr: f64, n: usize) -> BloomResult<Self> {
        let config = BloomFilterConfigBuilder::default()
            .capacity(n)
            .false_positive_rate(target_fpr)
            .build()
            .map_err(|e| BloomError::InvalidParameter(e.to_string()))?;
        Self::with_config(config)
    }

    pub fn with_config(config: BloomFilterConfig) -> BloomResult<Self> {
        let params = BloomParams::try_from(&config)?;
        let bits = bitvec![usize, Lsb0; 0; params.bit_vector_size];

        debug!(
            m = params.bit_vector_size,
            k = params.num_hashes,
            n = config.capacity,
            fpr = config.false_positive_rate,
            "Initialized BloomFilter"
        );

        Ok(Self {
            config,
            params,
            bits,
            insert_count: 0,
        })
    }

    pub fn config(&self) -> &BloomFilterConfig {
        &self.config
    }

    pub fn params(&self) -> &BloomParams {
        &self.params
    }

    pub fn bits(&self) -> &BitVec<usize, Lsb0> {
        &self.bits
    }

    /// `m`
    pub fn bit_vector_size(&self) -> usize {
        self.params.bit_vector_size
    }

    /// `k`
    pub fn num_hashes(&self) -> usize {
        self.params.num_hashes
    }

    pub fn probe_indices(&self, item: &[u8]) -> Vec<usize> {
        let (h1, h2) = (self.config.hash_function)(item);
        probe_indices(
            h1,
            h2,
            self.params.num_hashes,
            self.params.bit_vector_size,
        )
    }

    pub fn insert(&mut self, item: &[u8]) {
        for idx in self.probe_indices(item) {
            self.bits.set(idx, true);
        }
        self.insert_count += 1;
    }

    pub fn add<I, T>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for item in items {
            self.insert(item.as_ref());
        }
    }

    pub fn contains(&self, item: &[u8]) -> bool {
        self.probe_indices(item).into_iter().all(|idx| self.bits[idx])
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits currently set.
    pub fn load_factor(&self) -> f64 {
        self.count_ones() as f64 / self.params.bit_vector_size as f64
    }

    /// `(1 - e^(-k*n/m))^k`, assuming exactly `capacity` insertions.
    pub fn theoretical_fpr(&self) -> f64 {
        let k = self.params.num_hashes as f64;
        let n = self.config.capacity as f64;
        let m = self.params.bit_vector_size as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// FPR implied by the current fill: `load_factor^k`.
    pub fn estimated_fpr(&self) -> f64 {
        self.load_factor().powi(self.params.num_hashes as i32)
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
        self.bits.capacity()
    }

    pub fn bits_per_item(&self) -> f64 {
        self.params.bit_vector_size as f64 / self.config.capacity as f64
    }

    /// Swaps in a bit vector that has already been validated against `m`.
    pub(crate) fn replace_bits(&mut self, bits: BitVec<usize, Lsb0>) {
        debug_assert_eq!(bits.len(), self.params.bit_vector_size);
        self.bits = bits;
    }
}

impl BloomFilterOps for BloomFilter {
    fn insert(&mut self, item: &[u8]) -> BloomResult<()> {
        BloomFilter::insert(self, item);
        Ok(())
    }

    fn contains(&self, item: &[u8]) -> bool {
        BloomFilter::contains(self, item)
    }
}

impl BloomFilterStats for BloomFilter {
    fn capacity(&self) -> usize {
        self.config.capacity
    }

    fn false_positive_rate(&self) -> f64 {
        self.config.false_positive_rate
    }

    fn insert_count(&self) -> usize {
        self.insert_count
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ capacity: {}, false_positive_rate: {}, m: {}, k: {}, ones: {} }}",
            self.config.capacity,
            self.config.false_positive_rate,
            self.params.bit_vector_size,
            self.params.num_hashes,
            self.count_ones()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::murmur_fnv_hash_function;

    #[test]
    fn test_workflow() {
        let mut filter = BloomFilter::new(0.01, 1000).unwrap();

        filter.insert(b"some data");
        filter.insert(b"another data");
        assert!(filter.contains(b"some data"));
        assert!(filter.contains(b"another data"));
        assert!(!filter.contains(b"some"));
        assert!(!filter.contains(b"another"));
    }

    #[test]
    fn test_sizing_matches_formula() {
        let filter = BloomFilter::new(0.01, 1000).unwrap();
        assert_eq!(filter.bit_vector_size(), 9586);
        assert_eq!(filter.num_hashes(), 7);
        assert_eq!(filter.bits().len(), 9586);
        assert_eq!(filter.count_ones(), 0);
    }

    #[test]
    fn test_idempotent_insert() {
        let mut filter = BloomFilter::new(0.01, 100).unwrap();
        filter.insert(b"x");
        let snapshot = filter.bits().clone();
        filter.insert(b"x");
        assert_eq!(filter.bits(), &snapshot);
    }

    #[test]
    fn test_probe_indices_deterministic() {
        let filter = BloomFilter::new(0.01, 1000).unwrap();
        let a = filter.probe_indices(b"item");
        let b = filter.probe_indices(b"item");
        assert_eq!(a, b);
        assert_eq!(a.len(), filter.num_hashes());
    }

    #[test]
    fn test_custom_hash_function() {
        let config = BloomFilterConfigBuilder::default()
            .capacity(500)
            .false_positive_rate(0.05)
            .hash_function(murmur_fnv_hash_function)
            .build()
            .unwrap();
        let mut filter = BloomFilter::with_config(config).unwrap();
        filter.add(["alpha", "beta"]);
        assert!(filter.contains(b"alpha"));
        assert!(filter.contains(b"beta"));
    }

    #[test]
    fn test_estimated_fpr_grows_with_fill() {
        let mut filter = BloomFilter::new(0.01, 100).unwrap();
        assert_eq!(filter.estimated_fpr(), 0.0);
        filter.add((0..50).map(|i| format!("item_{i}")));
        let half = filter.estimated_fpr();
        filter.add((50..100).map(|i| format!("item_{i}")));
        assert!(filter.estimated_fpr() > half);
    }
}
