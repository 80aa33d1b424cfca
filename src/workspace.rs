//! On-disk layout of a URL run.
//!
//! Each run gets its own directory under a base path:
//!
//! ```text
//! <base>/<run-id>/            downloaded video
//! <base>/<run-id>/Images/     sampled frames
//! ```
//!
//! Nothing is removed on failure; a broken run leaves its directory as-is.

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use crate::error::ExtractorError;

/// Name of the frames subdirectory.
pub const IMAGES_DIR: &str = "Images";

/// Directories for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWorkspace {
    root: PathBuf,
    images: PathBuf,
}

impl RunWorkspace {
    /// Create a fresh run directory under `base` named by [`run_id`].
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::IoError`] if the directories cannot be
    /// created, including when the run directory already exists.
    pub fn create(base: &Path) -> Result<Self, ExtractorError> {
        Self::create_named(base, &run_id())
    }

    /// Create a run directory with an explicit id.
    pub fn create_named(base: &Path, id: &str) -> Result<Self, ExtractorError> {
        fs::create_dir_all(base)?;

        let root = base.join(id);
        fs::create_dir(&root)?;
        let images = root.join(IMAGES_DIR);
        fs::create_dir(&images)?;

        log::debug!("Created run workspace {}", root.display());
        Ok(Self { root, images })
    }

    /// Directory the video is downloaded into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory sampled frames are written to.
    pub fn images(&self) -> &Path {
        &self.images
    }
}

/// Unique-per-process name for a run: local timestamp plus process id.
pub fn run_id() -> String {
    format!(
        "{}-{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S"),
        process::id()
    )
}

#[cfg(test)]
mod tests {
    use super::{IMAGES_DIR, RunWorkspace, run_id};

    #[test]
    fn run_id_embeds_pid() {
        let id = run_id();
        assert!(id.ends_with(&std::process::id().to_string()));
        assert_eq!(id.split('-').count(), 3);
    }

    #[test]
    fn creates_images_subdirectory() {
        let base = tempfile::tempdir().unwrap();
        let workspace = RunWorkspace::create_named(base.path(), "run").unwrap();
        assert!(workspace.root().is_dir());
        assert!(workspace.images().is_dir());
        assert_eq!(workspace.images(), base.path().join("run").join(IMAGES_DIR));
    }

    #[test]
    fn existing_run_directory_is_an_error() {
        let base = tempfile::tempdir().unwrap();
        RunWorkspace::create_named(base.path(), "run").unwrap();
        assert!(RunWorkspace::create_named(base.path(), "run").is_err());
    }
}
