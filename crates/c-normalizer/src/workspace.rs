use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{NormalizeError, Result};

/// A uniquely named scratch directory owned by one stage invocation.
///
/// The directory and everything in it is removed when the workspace is
/// dropped, so early returns and errors clean up the same way success does.
/// Concurrent invocations never share a directory.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create(label: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("c-normalizer-{label}-"))
            .tempdir()
            .map_err(|error| NormalizeError::io(std::env::temp_dir(), error))?;
        debug!("[workspace] created {}", dir.path().display());
        Ok(Self {
            dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(
        &self,
        name: &str,
    ) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write (or overwrite) `name` inside the workspace.
    pub async fn write(
        &self,
        name: &str,
        contents: &str,
    ) -> Result<PathBuf> {
        let path = self.file(name);
        tokio::fs::write(&path, contents).await.map_err(|error| NormalizeError::io(&path, error))?;
        Ok(path)
    }

    /// Remove the directory now and surface any cleanup failure.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|error| {
            warn!("[workspace] failed to remove {}: {error}", path.display());
            NormalizeError::io(&path, error)
        })?;
        debug!("[workspace] removed {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/src/workspace_tests.rs"]
mod tests;
