use crate::error::{BloomError, BloomResult};
use crate::hash::{HashFunction, default_hash_function};
use derive_builder::Builder;

#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct ScalableBloomFilterConfig {
    /// Capacity of every chained filter
    #[builder(default = "1000")]
    pub initial_capacity: usize,

    /// Target false positive rate of the first filter
    #[builder(default = "0.01")]
    pub initial_fpr: f64,

    /// Factor applied to the FPR on each growth step
    #[builder(default = "0.5")]
    pub tightening_ratio: f64,

    /// Load factor above which the active filter counts as full
    #[builder(default = "0.5")]
    pub max_load_factor: f64,

    /// Base hash pair shared by all chained filters
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl Default for ScalableBloomFilterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1000,
            initial_fpr: 0.01,
            tightening_ratio: 0.5,
            max_load_factor: 0.5,
            hash_function: default_hash_function,
        }
    }
}

impl ScalableBloomFilterConfig {
    pub fn validate(&self) -> BloomResult<()> {
        if self.initial_capacity == 0 {
            return Err(BloomError::InvalidParameter(
                "Initial capacity must be > 0".into(),
            ));
        }
        if !(self.initial_fpr > 0.0 && self.initial_fpr < 1.0) {
            return Err(BloomError::InvalidParameter(format!(
                "Initial FPR must be between 0 and 1, got {}",
                self.initial_fpr
            )));
        }
        if !(self.tightening_ratio > 0.0 && self.tightening_ratio < 1.0) {
            return Err(BloomError::InvalidParameter(format!(
                "Tightening ratio must be between 0 and 1, got {}",
                self.tightening_ratio
            )));
        }
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(BloomError::InvalidParameter(format!(
                "Max load factor must be between 0 and 1, got {}",
                self.max_load_factor
            )));
        }
        Ok(())
    }
}
