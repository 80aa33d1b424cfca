//! Fetching a video from a URL.
//!
//! [`Downloader`] is the seam the CLI downloads through. [`YtDlp`] implements
//! it by running the external `yt-dlp` program, which owns every protocol
//! and site detail. A download either leaves exactly one finished video file
//! in the target directory or fails; there are no retries.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ytframes::{Downloader, Quality, YtDlp};
//!
//! let video = YtDlp::new().download(
//!     "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!     Quality::Worst,
//!     Path::new("run"),
//! )?;
//! println!("saved {}", video.display());
//! # Ok::<(), ytframes::ExtractorError>(())
//! ```

use std::{
    ffi::OsString,
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    str::FromStr,
};

use crate::{error::ExtractorError, utilities::restrict_to_ascii};

/// Name of the downloader program looked up on PATH.
pub const YT_DLP_PROGRAM: &str = "yt-dlp";

/// Extensions of files a downloader leaves behind while still working.
const INCOMPLETE_EXTENSIONS: &[&str] = &["part", "ytdl", "temp", "tmp"];

/// Which rendition of the video to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// Highest quality single file.
    #[default]
    Best,
    /// Lowest quality single file (smallest download).
    Worst,
}

impl Quality {
    /// Format selector passed to the downloader.
    pub fn as_format(self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::Worst => "worst",
        }
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_format())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "best" => Ok(Quality::Best),
            "worst" | "small" => Ok(Quality::Worst),
            other => Err(format!("unknown quality `{other}` (expected best or worst)")),
        }
    }
}

/// Produces one local video file from a URL.
pub trait Downloader {
    /// Download `url` into `target_dir`, which must exist, and return the path
    /// of the single video file produced.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Download`] on any failure.
    fn download(
        &self,
        url: &str,
        quality: Quality,
        target_dir: &Path,
    ) -> Result<PathBuf, ExtractorError>;
}

/// [`Downloader`] backed by the `yt-dlp` command-line program.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    extra_args: Vec<OsString>,
    quiet: bool,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    /// Use `yt-dlp` from PATH.
    pub fn new() -> Self {
        Self::with_program(YT_DLP_PROGRAM)
    }

    /// Use a specific executable (e.g. a bundled copy or `youtube-dl`).
    pub fn with_program<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            quiet: false,
        }
    }

    /// Append an argument placed before the URL.
    #[must_use]
    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Suppress the program's own progress output.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, url: &str, quality: Quality, target_dir: &Path) -> Command {
        let template = target_dir.join("%(title)s.%(ext)s");

        let mut command = Command::new(&self.program);
        command
            .arg("-f")
            .arg(quality.as_format())
            .arg("-o")
            .arg(template)
            .arg("--no-playlist")
            .stdin(Stdio::null());
        if self.quiet {
            command
                .arg("--quiet")
                .arg("--no-warnings")
                .stdout(Stdio::null());
        }
        command.args(&self.extra_args).arg("--").arg(url);
        command
    }
}

impl Downloader for YtDlp {
    fn download(
        &self,
        url: &str,
        quality: Quality,
        target_dir: &Path,
    ) -> Result<PathBuf, ExtractorError> {
        let failure = |reason: String| ExtractorError::Download {
            url: url.to_string(),
            reason,
        };

        log::info!(
            "Downloading {url} ({quality}) into {} with {}",
            target_dir.display(),
            self.program.display()
        );

        let status = self
            .command(url, quality, target_dir)
            .status()
            .map_err(|error| {
                failure(format!("could not run {}: {error}", self.program.display()))
            })?;

        if !status.success() {
            return Err(failure(format!("{} exited with {status}", self.program.display())));
        }

        let downloaded = find_downloaded_file(target_dir).map_err(failure)?;
        let renamed = restrict_file_name(&downloaded)
            .map_err(|error| failure(format!("could not rename downloaded file: {error}")))?;

        log::debug!("Downloaded video: {}", renamed.display());
        Ok(renamed)
    }
}

/// Locate the single finished file in `dir`.
///
/// Hidden files and in-progress downloads are ignored. Anything other than
/// exactly one remaining file is an error.
pub fn find_downloaded_file(dir: &Path) -> Result<PathBuf, String> {
    let entries = fs::read_dir(dir).map_err(|error| format!("cannot read {}: {error}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| error.to_string())?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        let incomplete = path
            .extension()
            .is_some_and(|ext| {
                INCOMPLETE_EXTENSIONS
                    .iter()
                    .any(|skip| ext.eq_ignore_ascii_case(skip))
            });
        if !hidden && !incomplete {
            files.push(path);
        }
    }

    match files.len() {
        1 => Ok(files.remove(0)),
        0 => Err(format!("no video file was produced in {}", dir.display())),
        count => Err(format!(
            "expected one video file in {}, found {count}",
            dir.display()
        )),
    }
}

/// Rename `path` so its stem only holds ASCII letters, digits, and `_`.
///
/// Returns the new path (unchanged when the name was already clean).
pub fn restrict_file_name(path: &Path) -> std::io::Result<PathBuf> {
    let Some(stem) = path.file_stem() else {
        return Ok(path.to_path_buf());
    };
    let mut name = restrict_to_ascii(&stem.to_string_lossy());
    if let Some(extension) = path.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }

    let renamed = path.with_file_name(name);
    if renamed != path {
        fs::rename(path, &renamed)?;
    }
    Ok(renamed)
}
