//! Output directory handling.
//!
//! A run owns every file in the output directory whose name starts with one of its
//! prefixes. Those files are removed before writing so that units dropped from the
//! schema do not leave stale files behind. Other files are left alone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CleanOutputDir {
    dir: PathBuf,
}

impl CleanOutputDir {
    /// Create `dir` if needed and delete the files owned by `prefixes`.
    pub fn prepare(dir: impl AsRef<Path>, prefixes: &[&str]) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if prefixes.iter().any(|p| name.starts_with(p)) {
                tracing::debug!(file = name, "removing stale output");
                fs::remove_file(entry.path())?;
            }
        }
        Ok(CleanOutputDir { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.dir.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
