//! Sampling configuration.
//!
//! [`SampleOptions`] is a builder that threads progress callbacks,
//! cancellation tokens, and output naming through
//! [`FrameSampler::sample_with_options`](crate::FrameSampler::sample_with_options)
//! without widening its signature.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ytframes::{CancellationToken, ProgressCallback, ProgressInfo, SampleOptions};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{} written", info.written);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = SampleOptions::new()
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone())
//!     .with_extension("png")
//!     .with_batch_size(10);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use image::ImageFormat;

use crate::error::ExtractorError;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Extension used for written frames unless overridden.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// File-name prefix used for written frames unless overridden.
pub const DEFAULT_PREFIX: &str = "frame";

/// Options for a sampling run.
///
/// A default-constructed value writes `frame_<N>.jpg`, reports progress
/// nowhere, and is never cancelled.
#[derive(Clone)]
pub struct SampleOptions {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
    /// Fire the progress callback every N written frames.
    pub(crate) batch_size: u64,
    /// Lower-case extension without the leading dot.
    pub(crate) extension: String,
    pub(crate) prefix: String,
}

impl Debug for SampleOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SampleOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .field("extension", &self.extension)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
            extension: DEFAULT_EXTENSION.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// Once the token is cancelled the sampler stops before its next read or
    /// write and returns [`ExtractorError::Cancelled`].
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires, in written frames.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the output image extension (`jpg`, `png`, ...). A leading dot and
    /// letter case are ignored. The value is checked when the run starts.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self
    }

    /// Set the file-name prefix placed before the frame counter.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve the configured extension to an encoder.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::UnsupportedImageFormat`] for extensions with
    /// no still-image encoder, or for formats this crate does not write.
    pub fn image_format(&self) -> Result<ImageFormat, ExtractorError> {
        let format = ImageFormat::from_extension(&self.extension)
            .ok_or_else(|| ExtractorError::UnsupportedImageFormat(self.extension.clone()))?;
        match format {
            ImageFormat::Jpeg
            | ImageFormat::Png
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::WebP => Ok(format),
            _ => Err(ExtractorError::UnsupportedImageFormat(
                self.extension.clone(),
            )),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
