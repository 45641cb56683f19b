//! Scalable Bloom Filter: a chain of fixed filters with tightening FPRs
pub mod config;
pub mod filter;

pub use config::{
    ScalableBloomFilterConfig, ScalableBloomFilterConfigBuilder,
    ScalableBloomFilterConfigBuilderError,
};
pub use filter::ScalableBloomFilter;
