//! Standard Bloom Filter implementation
pub mod config;
pub mod filter;
pub mod persistence;
pub mod traits;

pub use config::{
    BloomFilterConfig, BloomFilterConfigBuilder, BloomFilterConfigBuilderError,
    BloomParams,
};
pub use filter::BloomFilter;
pub use traits::{BloomFilterOps, BloomFilterStats};
