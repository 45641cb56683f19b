use std::{fs, path::PathBuf};

/// Temporary bit-dump file that is removed when dropped
pub struct TestFile {
    path: PathBuf,
}

impl TestFile {
    /// Create a dump path named after the test, under the system temp dir
    pub fn new(test_name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "scalable_bloom_{}_{}.bits",
            test_name,
            std::process::id()
        ));
        Self { path }
    }

    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Deterministic, distinct keys
pub fn generate_test_items(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}_{i:06}")).collect()
}
