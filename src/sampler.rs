//! The frame-sampling loop.
//!
//! [`FrameSampler`] reads a [`FrameSource`] front to back, keeps every Nth
//! frame, and writes each kept frame to `<out_dir>/<prefix>_<counter>.<ext>`.
//! The counter is zero-based, so the first decoded frame is always written.
//!
//! The run is strictly sequential: one read and at most one write per
//! iteration, and nothing is buffered. The first decode or write error ends
//! the run. Frames already on disk are left in place.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ytframes::{FrameSampler, SampleInterval, VideoFile};
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! let summary = FrameSampler::sample(&mut video, SampleInterval::new(30)?, Path::new("frames"))?;
//! println!("wrote {} of {} frames", summary.written, summary.decoded);
//! # Ok::<(), ytframes::ExtractorError>(())
//! ```

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{DynamicImage, ImageFormat};

use crate::{
    configuration::SampleOptions,
    error::ExtractorError,
    interval::SampleInterval,
    progress::ProgressTracker,
    source::FrameSource,
    utilities::frame_file_name,
};

/// Outcome of a completed sampling run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct SampleSummary {
    /// Frames read from the source.
    pub decoded: u64,
    /// Frames written to disk.
    pub written: u64,
    /// Total the source reported up front, if any.
    pub reported_total: Option<u64>,
    /// Path of the last frame written.
    pub last_written: Option<PathBuf>,
}

/// Sequential every-Nth-frame writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSampler;

impl FrameSampler {
    /// Sample `source` into `out_dir` with default [`SampleOptions`].
    ///
    /// `out_dir` must already exist.
    ///
    /// # Errors
    ///
    /// Propagates the source's decode error, or returns
    /// [`ExtractorError::FrameWrite`] when a frame cannot be written.
    pub fn sample<S>(
        source: &mut S,
        interval: SampleInterval,
        out_dir: &Path,
    ) -> Result<SampleSummary, ExtractorError>
    where
        S: FrameSource + ?Sized,
    {
        Self::sample_with_options(source, interval, out_dir, &SampleOptions::default())
    }

    /// Sample `source` into `out_dir`, reporting progress and honouring
    /// cancellation as configured in `options`.
    ///
    /// # Errors
    ///
    /// As [`sample`](FrameSampler::sample), plus
    /// [`ExtractorError::UnsupportedImageFormat`] before any frame is read and
    /// [`ExtractorError::Cancelled`] once the token fires.
    pub fn sample_with_options<S>(
        source: &mut S,
        interval: SampleInterval,
        out_dir: &Path,
        options: &SampleOptions,
    ) -> Result<SampleSummary, ExtractorError>
    where
        S: FrameSource + ?Sized,
    {
        let format = options.image_format()?;
        let mut tracker =
            ProgressTracker::new(options.progress.clone(), source.total_frames(), options.batch_size);

        log::info!(
            "Sampling every {interval} frame(s) into {} (expecting {} frames)",
            out_dir.display(),
            tracker
                .total()
                .map_or_else(|| "an unknown number of".to_string(), |t| t.to_string()),
        );

        let mut summary = SampleSummary {
            decoded: 0,
            written: 0,
            reported_total: tracker.total(),
            last_written: None,
        };
        let mut counter: u64 = 0;

        loop {
            if options.is_cancelled() {
                log::info!("Sampling cancelled after {} frame(s)", summary.written);
                return Err(ExtractorError::Cancelled);
            }

            let Some(frame) = source.next_frame()? else {
                break;
            };
            summary.decoded += 1;
            tracker.decoded();

            if interval.selects(counter) {
                if options.is_cancelled() {
                    log::info!("Sampling cancelled after {} frame(s)", summary.written);
                    return Err(ExtractorError::Cancelled);
                }

                let path =
                    out_dir.join(frame_file_name(&options.prefix, counter, &options.extension));
                write_frame(&frame, &path, format)?;
                log::trace!("Wrote frame {counter} -> {}", path.display());

                summary.written += 1;
                summary.last_written = Some(path);
                tracker.written(counter);
            }

            counter += 1;
        }

        tracker.finish();
        log::info!(
            "Sampling complete: {} of {} frame(s) written",
            summary.written,
            summary.decoded
        );
        Ok(summary)
    }
}

/// Hidden sibling a frame is encoded into before it takes its final name.
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.part"))
}

/// Encode `frame` to `path`.
///
/// The frame is encoded into a temporary sibling and renamed into place, so
/// a file under the final name is always a complete image.
fn write_frame(frame: &DynamicImage, path: &Path, format: ImageFormat) -> Result<(), ExtractorError> {
    let converted;
    let image = if matches!(frame, DynamicImage::ImageRgb8(_)) {
        frame
    } else {
        converted = DynamicImage::ImageRgb8(frame.to_rgb8());
        &converted
    };

    let temporary = partial_path(path);
    let encoded = encode_to(image, &temporary, format);
    if let Err(error) = encoded {
        let _ = fs::remove_file(&temporary);
        return Err(ExtractorError::FrameWrite {
            path: path.to_path_buf(),
            reason: error.to_string(),
        });
    }

    fs::rename(&temporary, path).map_err(|error| {
        let _ = fs::remove_file(&temporary);
        ExtractorError::FrameWrite {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    })
}

fn encode_to(image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<(), ExtractorError> {
    let mut writer = BufWriter::new(File::create(path)?);
    image.write_to(&mut writer, format)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::partial_path;

    #[test]
    fn partial_path_is_hidden_sibling() {
        assert_eq!(
            partial_path(Path::new("out/frame_30.jpg")),
            Path::new("out/.frame_30.jpg.part")
        );
    }
}
