use crate::error::{BloomError, BloomResult};
use crate::hash::{
    HashFunction, checked_bit_vector_size, default_hash_function,
    optimal_num_hashes,
};
use derive_builder::Builder;

#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct BloomFilterConfig {
    /// Planned number of elements
    #[builder(default = "1000")]
    pub capacity: usize,

    /// Target false positive rate (0.0 to 1.0, exclusive)
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,

    /// Base hash pair used for probe derivation
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl BloomFilterConfig {
    pub fn validate(&self) -> BloomResult<()> {
        if self.capacity == 0 {
            return Err(BloomError::InvalidParameter(
                "Capacity must be > 0".into(),
            ));
        }
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0)
        {
            return Err(BloomError::InvalidParameter(format!(
                "FPR must be between 0 and 1, got {}",
                self.false_positive_rate
            )));
        }
        Ok(())
    }
}

/// Derived parameters calculated from BloomFilterConfig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloomParams {
    pub bit_vector_size: usize,
    pub num_hashes: usize,
}

impl BloomParams {
    pub fn derive(capacity: usize, false_positive_rate: f64) -> BloomResult<Self> {
        let bit_vector_size =
            checked_bit_vector_size(capacity, false_positive_rate)?;
        let num_hashes = optimal_num_hashes(capacity, bit_vector_size);

        Ok(Self {
            bit_vector_size,
            num_hashes,
        })
    }
}

impl TryFrom<&BloomFilterConfig> for BloomParams {
    type Error = BloomError;

    fn try_from(config: &BloomFilterConfig) -> BloomResult<Self> {
        config.validate()?;
        Self::derive(config.capacity, config.false_positive_rate)
    }
}
