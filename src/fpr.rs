//! False positive rate measurement against a ground-truth set.
use std::collections::HashSet;
use std::hash::Hash;

/// Fraction of `test_items` that `probe` reports present while not being
/// in `actual_items`. An empty test set yields `0.0`.
pub fn measure_false_positive_rate<T, F>(
    probe: F,
    test_items: &[T],
    actual_items: &HashSet<T>,
) -> f64
where
    T: AsRef<[u8]> + Eq + Hash,
    F: Fn(&[u8]) -> bool,
{
    if test_items.is_empty() {
        return 0.0;
    }

    let false_positives = test_items
        .iter()
        .filter(|item| probe(item.as_ref()) && !actual_items.contains(*item))
        .count();

    false_positives as f64 / test_items.len() as f64
}
