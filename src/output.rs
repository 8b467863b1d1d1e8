//! Output sinks for generated artifacts.
//!
//! The pipeline never writes files directly; it hands every artifact to
//! an [`ArtifactSink`]. The filesystem sink writes into the configured
//! output directory, the in-memory sink backs tests and dry runs.

use crate::error::{PipelineError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for named text artifacts.
pub trait ArtifactSink {
    /// Persist `contents` under `name`, returning where it went.
    fn write(&mut self, name: &str, contents: &str) -> Result<PathBuf>;
}

/// Writes artifacts into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    dir: PathBuf,
}

impl FsSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for FsSink {
    fn write(&mut self, name: &str, contents: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PipelineError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(name);
        std::fs::write(&path, contents).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {} ({} bytes)", path.display(), contents.len());
        Ok(path)
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub artifacts: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, name: &str, contents: &str) -> Result<PathBuf> {
        self.artifacts.insert(name.to_string(), contents.to_string());
        Ok(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_sink_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(tmp.path().join("nested/out"));

        let path = sink.write("report.md", "# Title\n").unwrap();
        assert_eq!(path, tmp.path().join("nested/out/report.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Title\n");
    }

    #[test]
    fn test_fs_sink_write_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        // A regular file cannot act as the output directory
        let mut sink = FsSink::new(&blocker);
        let err = sink.write("report.md", "x").unwrap_err();
        assert!(matches!(err, PipelineError::Write { .. }));
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::default();
        sink.write("a.svg", "<svg/>").unwrap();
        assert_eq!(sink.get("a.svg"), Some("<svg/>"));
        assert_eq!(sink.get("b.svg"), None);
    }
}
