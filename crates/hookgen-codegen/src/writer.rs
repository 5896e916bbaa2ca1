//! Atomic output writing.
//!
//! Content goes to a temp file next to the destination, is synced, then
//! renamed over the destination. Readers see either the previous file or the
//! complete new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use hookgen_core::{Error, Result};
use tempfile::NamedTempFile;

/// Writes generated source to a single destination path.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    path: PathBuf,
}

impl OutputWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content` atomically, replacing any existing file.
    pub fn write(&self, content: &str) -> Result<()> {
        self.stage(content)?.commit()
    }

    /// Write `content` to a temp file without touching the destination.
    ///
    /// Dropping the returned [`StagedOutput`] discards the temp file.
    pub fn stage(&self, content: &str) -> Result<StagedOutput> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let mut file = tempfile::Builder::new()
            .prefix(".hookgen-")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| self.write_error(e))?;

        file.write_all(content.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;

        Ok(StagedOutput {
            file,
            target: self.path.clone(),
            dir,
        })
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Fully written content waiting to be moved into place.
#[derive(Debug)]
pub struct StagedOutput {
    file: NamedTempFile,
    target: PathBuf,
    dir: PathBuf,
}

impl StagedOutput {
    /// Location of the temp file.
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Rename the temp file over the destination.
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.file.persist(&target).map_err(|e| Error::Write {
            path: target.clone(),
            source: e.error,
        })?;

        // Make the rename itself durable where the platform allows it.
        if let Ok(dir) = std::fs::File::open(&self.dir) {
            let _ = dir.sync_all();
        }

        tracing::debug!(path = %target.display(), "Output committed");
        Ok(())
    }
}
