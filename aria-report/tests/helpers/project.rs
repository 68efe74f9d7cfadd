//! Temporary project trees laid out like a real materials root

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use aria_report::PipelinePaths;

pub struct TestProject {
    dir: TempDir,
    paths: PipelinePaths,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let paths = PipelinePaths::from_base(dir.path());
        std::fs::create_dir_all(&paths.raw).unwrap();
        Self { dir, paths }
    }

    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Write a raw material at `relative` under `materials/raw`
    pub fn add_material(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.paths.raw.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn write_overlay(&self, content: &str) {
        std::fs::create_dir_all(self.paths.revisions.parent().unwrap()).unwrap();
        std::fs::write(&self.paths.revisions, content).unwrap();
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }
}
