use crate::error::{BloomError, BloomResult};
use fnv::FnvHasher;
use murmur3::murmur3_32;
use std::hash::Hasher;
use std::io::Cursor;

/// A type alias for the base hash function used by the Bloom filters.
///
/// **Parameters:**
///
/// - `item: &[u8]`
///   - A byte slice representing the item to be hashed.
///
/// **Returns:**
///
/// - `(u32, u32)`
///   - Two independent unsigned base hashes `(h1, h2)`.
///
/// **Usage:**
///
/// The filter never calls the function once per probe. It derives all `k`
/// probe positions from the pair with [`probe_indices`], so any function
/// plugged in here only has to produce two well-mixed values.
pub type HashFunction = fn(&[u8]) -> (u32, u32);

/// Seeds of the two Murmur3 passes in [`default_hash_function`].
pub const PRIMARY_SEED: u32 = 41;
pub const SECONDARY_SEED: u32 = 42;

/// Upper bound on a single bit vector, in bits: 2^36 (8 GiB), or
/// `usize::MAX` where that is smaller.
pub const MAX_BIT_VECTOR_SIZE: usize = if usize::BITS > 36 {
    1 << (36 % usize::BITS)
} else {
    usize::MAX
};

pub(crate) fn hash_murmur32(key: &[u8], seed: u32) -> u32 {
    let mut cursor = Cursor::new(key);
    murmur3_32(&mut cursor, seed).expect("Failed to compute Murmur3 hash")
}

pub(crate) fn hash_fnv32(key: &[u8]) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish() as u32
}

/// Murmur3 x86_32 under two distinct seeds.
pub fn default_hash_function(item: &[u8]) -> (u32, u32) {
    (
        hash_murmur32(item, PRIMARY_SEED),
        hash_murmur32(item, SECONDARY_SEED),
    )
}

/// Murmur3 paired with FNV-1a.
pub fn murmur_fnv_hash_function(item: &[u8]) -> (u32, u32) {
    (hash_murmur32(item, 0), hash_fnv32(item))
}

/// Kirsch-Mitzenmacher double hashing: `index_i = (h1 + i * h2) mod m`.
///
/// The sum is carried out in `u64`, which holds `h1 + i * h2` without
/// wrapping for any `i < 2^32`.
pub fn probe_indices(
    h1: u32,
    h2: u32,
    num_hashes: usize,
    m: usize,
) -> Vec<usize> {
    debug_assert!(m > 0, "bit vector size must be positive");
    let m = m as u64;
    (0..num_hashes as u64)
        .map(|i| ((h1 as u64 + i * h2 as u64) % m) as usize)
        .collect()
}

/// `ceil(-n * ln(fpr) / (ln 2)^2)`
pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as usize
}

/// `round((m / n) * ln 2)`, never less than one.
pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    let k = ((m as f64 / n as f64) * std::f64::consts::LN_2).round() as usize;
    k.max(1)
}

/// Checked variant of [`optimal_bit_vector_size`].
///
/// Rejects sizes that are zero, not finite, or larger than
/// [`MAX_BIT_VECTOR_SIZE`] instead of letting them reach the allocator or
/// the modulo in [`probe_indices`].
pub fn checked_bit_vector_size(n: usize, fpr: f64) -> BloomResult<usize> {
    let ln2 = std::f64::consts::LN_2;
    let raw = (-(n as f64) * fpr.ln()) / (ln2 * ln2);
    if !raw.is_finite() {
        return Err(BloomError::InvalidParameter(format!(
            "bit vector size is not finite for n={n}, fpr={fpr}"
        )));
    }
    let m = raw.ceil();
    if m < 1.0 {
        return Err(BloomError::InvalidParameter(format!(
            "bit vector size rounds to 0 for n={n}, fpr={fpr}"
        )));
    }
    if m > MAX_BIT_VECTOR_SIZE as f64 {
        return Err(BloomError::InvalidParameter(format!(
            "bit vector size {m} exceeds maximum of {MAX_BIT_VECTOR_SIZE} bits"
        )));
    }
    Ok(m as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sizing() {
        let m = optimal_bit_vector_size(1000, 0.01);
        assert_eq!(m, 9586);
        assert_eq!(optimal_num_hashes(1000, m), 7);
    }

    #[test]
    fn test_checked_size_matches_unchecked() {
        for (n, fpr) in [(1, 0.5), (1000, 0.01), (100_000, 0.001)] {
            assert_eq!(
                checked_bit_vector_size(n, fpr).unwrap(),
                optimal_bit_vector_size(n, fpr)
            );
        }
    }

    #[test]
    fn test_checked_size_rejects_degenerate() {
        assert!(checked_bit_vector_size(1000, 0.0).is_err());
        assert!(checked_bit_vector_size(usize::MAX / 2, 1e-10).is_err());
        assert!(checked_bit_vector_size(1000, f64::MIN_POSITIVE).is_ok());
        assert!(checked_bit_vector_size(usize::MAX, 1e-300).is_err());
    }

    #[test]
    fn test_max_bit_vector_size_fits_target() {
        let expected = (1u64 << 36).min(usize::MAX as u64);
        assert_eq!(MAX_BIT_VECTOR_SIZE as u64, expected);
        let m = checked_bit_vector_size(1, 0.5).unwrap();
        assert!(m <= MAX_BIT_VECTOR_SIZE);
    }

    #[test]
    fn test_num_hashes_clamped_to_one() {
        let m = optimal_bit_vector_size(1000, 0.9);
        assert_eq!(optimal_num_hashes(1000, m), 1);
    }

    #[test]
    fn test_probe_indices_in_range() {
        let (h1, h2) = default_hash_function(b"hello");
        let indices = probe_indices(h1, h2, 7, 9586);
        assert_eq!(indices.len(), 7);
        assert!(indices.iter().all(|&i| i < 9586));
    }

    #[test]
    fn test_probe_indices_no_wrap_on_large_hashes() {
        let indices = probe_indices(u32::MAX, u32::MAX, 3, 1000);
        let m = 1000u64;
        let h = u32::MAX as u64;
        assert_eq!(indices[0], (h % m) as usize);
        assert_eq!(indices[1], ((h + h) % m) as usize);
        assert_eq!(indices[2], ((h + 2 * h) % m) as usize);
    }

    #[test]
    fn test_seeds_produce_distinct_hashes() {
        let (h1, h2) = default_hash_function(b"some data");
        assert_ne!(h1, h2);
        assert_eq!(default_hash_function(b"some data"), (h1, h2));
    }

    #[test]
    fn test_murmur_fnv_pair() {
        let (h1, h2) = murmur_fnv_hash_function(b"some data");
        assert_eq!(h1, hash_murmur32(b"some data", 0));
        assert_eq!(h2, hash_fnv32(b"some data"));
    }
}
