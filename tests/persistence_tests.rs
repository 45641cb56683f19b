mod common;

use common::test_utils::{TestFile, generate_test_items};
use scalable_bloom_rs::{BloomError, BloomFilter};
use std::fs;

fn populated_filter() -> BloomFilter {
    let mut filter = BloomFilter::new(0.01, 1000).expect("Filter should build");
    filter.add(generate_test_items("saved", 500));
    filter
}

#[test]
fn test_save_load_round_trip() {
    let db = TestFile::new("round_trip");
    let source = populated_filter();
    source.save(db.path()).expect("Save should succeed");

    let mut restored = BloomFilter::new(0.01, 1000).expect("Filter should build");
    restored.load(db.path()).expect("Load should succeed");

    assert_eq!(restored.bits(), source.bits());
    for probe in generate_test_items("saved", 500)
        .into_iter()
        .chain(generate_test_items("unseen", 5000))
    {
        assert_eq!(
            restored.contains(probe.as_bytes()),
            source.contains(probe.as_bytes()),
            "Membership differs for {probe}"
        );
    }
}

#[test]
fn test_saved_file_has_one_bit_per_line() {
    let db = TestFile::new("format");
    let filter = populated_filter();
    filter.save(db.path()).expect("Save should succeed");

    let text = fs::read_to_string(db.path()).expect("Dump should be readable");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), filter.bit_vector_size());
    assert_eq!(
        lines.iter().filter(|l| **l == "1").count(),
        filter.count_ones()
    );
    assert!(lines.iter().all(|l| *l == "0" || *l == "1"));
}

#[test]
fn test_load_wrong_length_is_corrupt() {
    let db = TestFile::new("wrong_length");
    BloomFilter::new(0.01, 10)
        .expect("Filter should build")
        .save(db.path())
        .expect("Save should succeed");

    let mut filter = populated_filter();
    let before = filter.bits().clone();
    let err = filter.load(db.path()).expect_err("Length mismatch must fail");

    assert!(matches!(err, BloomError::CorruptData(_)));
    assert_eq!(filter.bits(), &before, "Failed load must not touch bits");
}

#[test]
fn test_load_bad_token_is_corrupt() {
    let db = TestFile::new("bad_token");
    let mut filter = populated_filter();
    let mut dump = "0\n".repeat(filter.bit_vector_size());
    dump.replace_range(0..1, "x");
    fs::write(db.path(), dump).expect("Write should succeed");

    let before = filter.bits().clone();
    assert!(matches!(
        filter.load(db.path()),
        Err(BloomError::CorruptData(_))
    ));
    assert_eq!(filter.bits(), &before);
    assert!(filter.contains(b"saved_000000"));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let db = TestFile::new("missing");
    let mut filter = populated_filter();
    assert!(matches!(filter.load(db.path()), Err(BloomError::Io(_))));
}
