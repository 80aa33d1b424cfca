//! Progress reporting and cancellation support.
//!
//! This module provides [`ProgressCallback`] for monitoring a sampling run,
//! [`CancellationToken`] for cooperative cancellation, and [`ProgressInfo`]
//! for progress snapshots.
//!
//! # Example
//!
//! ```no_run
//! use std::{path::Path, sync::Arc};
//!
//! use ytframes::{
//!     ExtractorError, FrameSampler, ProgressCallback, ProgressInfo, SampleInterval,
//!     SampleOptions, VideoFile,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{}", info.written, info.total_display());
//!     }
//! }
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! let options = SampleOptions::new().with_progress(Arc::new(PrintProgress));
//! FrameSampler::sample_with_options(
//!     &mut video,
//!     SampleInterval::new(30)?,
//!     Path::new("frames"),
//!     &options,
//! )?;
//! # Ok::<(), ExtractorError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// A snapshot of sampling progress.
///
/// Delivered to [`ProgressCallback::on_progress`] after a frame is written,
/// at a cadence controlled by [`SampleOptions::with_batch_size`](crate::SampleOptions::with_batch_size).
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Zero-based position of the frame that triggered this report.
    pub frame_number: Option<u64>,
    /// How many frames have been decoded so far.
    pub decoded: u64,
    /// How many frames have been written so far.
    pub written: u64,
    /// Total frames the decoder expects, if known.
    ///
    /// A decoder that reports zero frames is treated as unknown.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0) of decoding, if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the run started.
    pub elapsed: Duration,
    /// `true` for the final report emitted when the run completes.
    pub finished: bool,
}

impl ProgressInfo {
    /// The total as shown to users: the number, or `?` when unknown.
    pub fn total_display(&self) -> String {
        match self.total {
            Some(total) => total.to_string(),
            None => "?".to_string(),
        }
    }
}

/// Trait for receiving progress updates during a run.
///
/// Callbacks observe the run but cannot halt it. Use
/// [`CancellationToken`] for that.
pub trait ProgressCallback: Send + Sync {
    /// Called after frames are written and once more when the run completes.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. Default when nothing is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone this token and share it between threads (or a Ctrl-C handler);
/// call [`cancel`](CancellationToken::cancel) to stop the associated run.
/// The sampler checks [`is_cancelled`](CancellationToken::is_cancelled)
/// before each read and before each write.
///
/// # Example
///
/// ```
/// use ytframes::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks counters and timing for one run and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: Option<u64>,
    decoded: u64,
    written: u64,
    batch_size: u64,
    start_time: Instant,
    writes_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: Option<u64>, batch_size: u64) -> Self {
        Self {
            callback,
            total: total.filter(|&t| t > 0),
            decoded: 0,
            written: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            writes_since_last_report: 0,
        }
    }

    /// Record one decoded frame, written or skipped.
    pub(crate) fn decoded(&mut self) {
        self.decoded += 1;
    }

    /// Record one written frame and fire the callback if the batch threshold
    /// is reached.
    pub(crate) fn written(&mut self, frame_number: u64) {
        self.written += 1;
        self.writes_since_last_report += 1;

        if self.writes_since_last_report >= self.batch_size {
            self.report(Some(frame_number), false);
            self.writes_since_last_report = 0;
        }
    }

    /// Emit the completion report.
    pub(crate) fn finish(&mut self) {
        self.report(None, true);
    }

    pub(crate) fn total(&self) -> Option<u64> {
        self.total
    }

    fn report(&self, frame_number: Option<u64>, finished: bool) {
        let percentage = self
            .total
            .map(|t| ((self.decoded as f32 / t as f32) * 100.0).min(100.0));

        let info = ProgressInfo {
            frame_number,
            decoded: self.decoded,
            written: self.written,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
            finished,
        };

        self.callback.on_progress(&info);
    }
}
