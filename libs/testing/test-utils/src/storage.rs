use std::path::Path;
use tempfile::TempDir;

/// Temporary directory for file-backed store tests
///
/// The directory and everything written under it is deleted when this value
/// is dropped, so keep it alive for the whole test.
pub struct TestStorageDir {
    dir: TempDir,
}

impl TestStorageDir {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("local-storage-test-")
            .tempdir()
            .expect("Failed to create temporary storage directory");
        tracing::debug!(path = %dir.path().display(), "Created test storage directory");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestStorageDir {
    fn default() -> Self {
        Self::new()
    }
}
