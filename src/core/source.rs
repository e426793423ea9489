use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Trait defining the filesystem operations required by the engine.
/// This abstraction keeps the scanning logic independent of where the
/// circuit sources actually live.
pub trait SourceTree {
    /// Returns the names of the regular files directly inside the root whose
    /// name contains `filter`, sorted ascending.
    fn list_matching(&self, filter: &str) -> Result<Vec<String>>;

    /// Reads the full content of a file listed by `list_matching`.
    fn read_source(&self, name: &str) -> Result<String>;

    /// Returns the directory being scanned.
    fn root(&self) -> &Path;
}

/// Concrete implementation of `SourceTree` over a local directory.
pub struct FsSourceTree {
    root: PathBuf,
}

impl FsSourceTree {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl SourceTree for FsSourceTree {
    fn list_matching(&self, filter: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read source directory {}", self.root.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("Failed to read entry in {}", self.root.display())
            })?;
            let path = entry.path();

            // `fs::metadata` follows symlinks, so a link to a regular file counts.
            let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!(path = %path.display(), "skipping non UTF-8 file name");
                continue;
            };

            if name.contains(filter) {
                names.push(name);
            }
        }

        names.sort();
        debug!(
            root = %self.root.display(),
            filter,
            matched = names.len(),
            "listed source files"
        );
        Ok(names)
    }

    fn read_source(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
