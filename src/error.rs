//! Error types for the `ytframes` crate.
//!
//! This module defines [`ExtractorError`], the unified error type returned by
//! every fallible stage of a run: download, decoder open, per-frame decode,
//! and per-frame write. Nothing is retried; the first error is propagated to
//! the caller unchanged.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `ytframes` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractorError {
    /// The video could not be downloaded.
    #[error("Failed to download {url}: {reason}")]
    Download {
        /// URL handed to the downloader.
        url: String,
        /// Underlying reason the download failed.
        reason: String,
    },

    /// A required external program is not on the system path.
    #[error("Required program `{program}` was not found on PATH")]
    MissingDependency {
        /// Name of the program that was looked up.
        program: String,
    },

    /// The video file could not be opened by the decoder.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// A sampled frame could not be written to disk.
    #[error("Failed to write frame to {path}: {reason}")]
    FrameWrite {
        /// Destination the frame was meant to land at.
        path: PathBuf,
        /// Underlying encoder or filesystem error.
        reason: String,
    },

    /// The sample interval was zero, negative, or not an integer.
    #[error("Invalid sample interval `{0}`: argument must be a positive integer value")]
    InvalidInterval(String),

    /// The requested output image extension has no encoder.
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate during frame conversion.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The run was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for ExtractorError {
    fn from(error: FfmpegError) -> Self {
        ExtractorError::FfmpegError(error.to_string())
    }
}
