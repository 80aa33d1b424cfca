//! External tool checks.
//!
//! [`DependencyChecker`] looks programs up on PATH so the CLI can tell the
//! user what is missing before a run starts. The sampler itself never
//! consults it.

use std::path::PathBuf;

use crate::{download::YT_DLP_PROGRAM, error::ExtractorError};

/// Name of the transcoding tool `yt-dlp` relies on for merging formats.
pub const FFMPEG_PROGRAM: &str = "ffmpeg";

/// Result of looking up one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub program: String,
    /// Resolved location, or `None` when the program is not on PATH.
    pub location: Option<PathBuf>,
}

impl DependencyStatus {
    pub fn is_installed(&self) -> bool {
        self.location.is_some()
    }

    /// Whether a run cannot proceed without this program.
    ///
    /// Only `yt-dlp` is mandatory: single-file `best`/`worst` formats
    /// download without `ffmpeg`.
    pub fn is_required(&self) -> bool {
        self.program == YT_DLP_PROGRAM
    }

    /// Turn a missing program into an error.
    pub fn require(&self) -> Result<&std::path::Path, ExtractorError> {
        self.location
            .as_deref()
            .ok_or_else(|| ExtractorError::MissingDependency {
                program: self.program.clone(),
            })
    }
}

/// Looks programs up on the system path.
#[derive(Debug, Clone)]
pub struct DependencyChecker {
    programs: Vec<String>,
}

impl Default for DependencyChecker {
    /// Checks `yt-dlp` and `ffmpeg`.
    fn default() -> Self {
        Self::new([YT_DLP_PROGRAM, FFMPEG_PROGRAM])
    }
}

impl DependencyChecker {
    pub fn new<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            programs: programs.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `program` resolves to an executable on PATH.
    pub fn is_installed(program: &str) -> bool {
        Self::locate(program).is_some()
    }

    /// Resolve `program` on PATH.
    pub fn locate(program: &str) -> Option<PathBuf> {
        let found = which::which(program).ok();
        log::debug!("Lookup {program}: {found:?}");
        found
    }

    /// Status of every configured program, in order.
    pub fn check(&self) -> Vec<DependencyStatus> {
        self.programs
            .iter()
            .map(|program| DependencyStatus {
                program: program.clone(),
                location: Self::locate(program),
            })
            .collect()
    }
}

/// One-line install hint for `program` on the current platform.
pub fn install_hint(program: &str) -> String {
    install_hint_for(program, std::env::consts::OS)
}

fn install_hint_for(program: &str, os: &str) -> String {
    match (program, os) {
        (FFMPEG_PROGRAM, "windows") => "install with `winget install ffmpeg`".to_string(),
        (FFMPEG_PROGRAM, "macos") => "install with `brew install ffmpeg`".to_string(),
        (FFMPEG_PROGRAM, "linux") => {
            "install with your package manager, e.g. `sudo apt install ffmpeg`".to_string()
        }
        (YT_DLP_PROGRAM, "windows") => "install with `winget install yt-dlp`".to_string(),
        (YT_DLP_PROGRAM, "macos") => "install with `brew install yt-dlp`".to_string(),
        (YT_DLP_PROGRAM, _) => "install with `pip install yt-dlp`".to_string(),
        _ => format!("install `{program}` and make sure it is on PATH"),
    }
}
