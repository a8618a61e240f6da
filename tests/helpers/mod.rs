use std::path::PathBuf;

use tempfile::TempDir;

use rag_runner::ResultStore;

/// Temporary working directory with helpers for building integration tests.
pub struct TempWorkspace {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp working dir");
        let path = dir.path().to_path_buf();
        Self { dir, path }
    }

    /// Write a file relative to the working directory.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let full = self.path.join(rel);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&full, content).expect("write test file");
        full
    }

    /// Read the raw result-log file contents.
    pub fn read_log(&self) -> String {
        std::fs::read_to_string(self.path.join("query_data.json")).expect("read result log")
    }

    /// Build a `ResultStore` over this workspace.
    pub fn store(&self) -> ResultStore {
        ResultStore::new(&self.path)
    }
}
