use crate::error::BloomResult;

/// Membership operations shared by the fixed and scalable filters, so
/// harness code can drive either one.
pub trait BloomFilterOps {
    fn insert(&mut self, item: &[u8]) -> BloomResult<()>;
    fn contains(&self, item: &[u8]) -> bool;
}

pub trait BloomFilterStats {
    fn capacity(&self) -> usize;
    fn false_positive_rate(&self) -> f64;
    fn insert_count(&self) -> usize;
}
