use bomscan_core::fs::FileSystem;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The directory a detectable is evaluated against, plus the filesystem it
/// reads through.
#[derive(Clone)]
pub struct DetectableEnvironment {
    directory: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl DetectableEnvironment {
    pub fn new(directory: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self { directory, fs }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.fs.is_file(&self.file(name))
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<String> {
        self.fs.read_to_string(&self.file(name))
    }
}

impl fmt::Debug for DetectableEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectableEnvironment")
            .field("directory", &self.directory)
            .finish()
    }
}
