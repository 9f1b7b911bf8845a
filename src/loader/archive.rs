//! # Scratch Workspace
//!
//! Transient extraction directory for archive sources. The directory lives
//! only as long as the [`ScratchWorkspace`] value: dropping it on an error
//! path removes it, and [`ScratchWorkspace::purge`] removes it on the success
//! path while reporting any failure.

use super::errors::{LoadError, LoadResult};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const SCRATCH_PREFIX: &str = "runtime_code";

#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Create a fresh scratch directory under `root` (system temp dir when `None`)
    pub fn create(root: Option<&Path>) -> LoadResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);

        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| LoadError::scratch_workspace(format!("failed to create: {e}")))?;

        debug!(path = %dir.path().display(), "📁 Scratch workspace created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Extract every member of the zip archive at `archive_path` into the workspace
    pub fn extract(&self, archive_path: &Path) -> LoadResult<()> {
        let archive_display = archive_path.display().to_string();

        let file = File::open(archive_path).map_err(|e| LoadError::io(&archive_display, e))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| LoadError::archive(&archive_display, e.to_string()))?;

        archive
            .extract(self.dir.path())
            .map_err(|e| LoadError::archive(&archive_display, e.to_string()))?;

        debug!(
            archive = %archive_display,
            members = archive.len(),
            "📦 Archive extracted"
        );
        Ok(())
    }

    /// Resolve an entry file inside the workspace
    pub fn entry_path(&self, entry_file: &str) -> LoadResult<PathBuf> {
        validate_entry_name(entry_file)?;
        Ok(self.dir.path().join(entry_file))
    }

    /// Remove the workspace and everything in it
    pub fn purge(self) -> LoadResult<()> {
        let path = self.dir.path().display().to_string();
        self.dir
            .close()
            .map_err(|e| LoadError::scratch_workspace(format!("failed to purge {path}: {e}")))?;
        debug!(path = %path, "🧹 Scratch workspace purged");
        Ok(())
    }
}

/// Entry names must be relative and stay inside the workspace
pub fn validate_entry_name(entry_file: &str) -> LoadResult<()> {
    if entry_file.trim().is_empty() {
        return Err(LoadError::invalid_entry_path(entry_file, "name cannot be empty"));
    }

    let path = Path::new(entry_file);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(LoadError::invalid_entry_path(
                    entry_file,
                    "parent directory references are not allowed",
                ))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(LoadError::invalid_entry_path(
                    entry_file,
                    "path must be relative to the archive root",
                ))
            }
        }
    }

    Ok(())
}
