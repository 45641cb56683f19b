//! Bloom filter sized analytically for a target false positive rate, and a
//! scalable variant built by chaining such filters.
//!
//! HowTo:
//!    * Sizing: for `n` expected items at target rate `p` the bit vector gets
//!      `m = ceil(-n ln p / (ln 2)^2)` bits and `k = round((m / n) ln 2)` probes.
//!    * Probes: two Murmur3 hashes `h1`, `h2` with different seeds give every
//!      probe position as `(h1 + i * h2) mod m` for `i in 0..k`.
//!
//! Insertion:
//!     * Set the `k` probe bits. Bits are never cleared.
//! Query:
//!     * An item is reported present iff all `k` probe bits are set. There
//!       are no false negatives; false positives happen at roughly
//!       `(1 - e^(-kn/m))^k`.
//! Scaling:
//!     * The scalable filter keeps an ordered list of fixed filters and
//!       inserts into the last one only.
//!     * When more than half of the active filter's bits are set a new one
//!       is appended with the same capacity and the target rate multiplied
//!       by the tightening ratio.
//!     * A query succeeds if any filter in the chain reports the item.
//!
//! Obvious problems:
//!     * Neither filter is synchronized. Wrap it in a lock to share it
//!       across threads; `contains` only needs read access.
//!     * Each new chained filter needs more bits than the last, since its
//!       target rate is lower.

pub mod bloom;
pub mod common;
mod error;
pub mod evaluation;
mod fpr;
mod hash;
pub mod scalable;

pub use bloom::{
    BloomFilter, BloomFilterConfig, BloomFilterConfigBuilder, BloomFilterOps,
    BloomFilterStats, BloomParams,
};
pub use error::{BloomError, BloomResult};
pub use evaluation::{EvaluationConfig, EvaluationConfigBuilder, EvaluationRow};
pub use fpr::measure_false_positive_rate;
pub use hash::{
    HashFunction, MAX_BIT_VECTOR_SIZE, checked_bit_vector_size,
    default_hash_function, murmur_fnv_hash_function, optimal_bit_vector_size,
    optimal_num_hashes, probe_indices,
};
pub use scalable::{
    ScalableBloomFilter, ScalableBloomFilterConfig,
    ScalableBloomFilterConfigBuilder,
};
