//! Pre-flight checks on an opened video.
//!
//! [`VideoFile::validate`](crate::VideoFile::validate) inspects the cached
//! metadata and returns a [`ValidationReport`]. Nothing here stops a run;
//! the CLI logs warnings before sampling and prints the full report for
//! `ytframes info`.
//!
//! # Example
//!
//! ```no_run
//! use ytframes::VideoFile;
//!
//! let video = VideoFile::open("input.mp4")?;
//! let report = video.validate();
//! for warning in &report.warnings {
//!     println!("Warning: {warning}");
//! }
//! # Ok::<(), ytframes::ExtractorError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::metadata::VideoMetadata;

/// Informational notices, warnings, and errors found for one video.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub info: Vec<String>,
    /// Issues that affect progress reporting or output quality.
    pub warnings: Vec<String>,
    /// Issues that will make decoding fail.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

pub(crate) fn validate_metadata(metadata: &VideoMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();

    if metadata.width == 0 || metadata.height == 0 {
        report.errors.push(format!(
            "Invalid video dimensions: {}×{}",
            metadata.width, metadata.height,
        ));
    }

    if metadata.duration == Duration::ZERO {
        report
            .warnings
            .push("Media duration is zero or unknown".to_string());
    }

    if metadata.frames_per_second <= 0.0 {
        report.warnings.push(
            "Video frame rate is zero or negative, frame count cannot be estimated".to_string(),
        );
    } else if metadata.frames_per_second > 240.0 {
        report.warnings.push(format!(
            "Unusually high frame rate ({:.1} fps), sampling may be slow",
            metadata.frames_per_second,
        ));
    }

    if metadata.frame_count == 0 {
        report
            .warnings
            .push("Total frame count is unknown, progress will show `?`".to_string());
    } else if !metadata.frame_count_exact {
        report.info.push(format!(
            "Frame count {} is estimated from duration and frame rate",
            metadata.frame_count,
        ));
    }

    report.info.push(format!(
        "Video: {} {}×{} @ {:.2} fps, ~{} frames [{}]",
        metadata.codec,
        metadata.width,
        metadata.height,
        metadata.frames_per_second,
        metadata.frame_count,
        metadata.format,
    ));

    report
}
