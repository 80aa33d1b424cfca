//! FFmpeg-backed sequential frame source.
//!
//! [`VideoFile`] opens a video with FFmpeg, caches its [`VideoMetadata`], and
//! implements [`FrameSource`] by decoding frames strictly in stream order.
//! It never seeks: every call to [`next_frame`](FrameSource::next_frame)
//! reads just enough packets to produce one more frame.
//!
//! # Example
//!
//! ```no_run
//! use ytframes::{FrameSource, VideoFile};
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! while let Some(image) = video.next_frame()? {
//!     println!("{}x{}", image.width(), image.height());
//! }
//! # Ok::<(), ytframes::ExtractorError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    error::EAGAIN,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{
    error::ExtractorError,
    metadata::{VideoMetadata, resolve_frame_count},
    source::FrameSource,
    validation::{ValidationReport, validate_metadata},
};

/// An opened video file, decoded front to back.
pub struct VideoFile {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    metadata: VideoMetadata,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
    file_path: PathBuf,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file for sequential decoding.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and prepares a decoder that converts every frame to RGB8.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::FileOpen`] if the file cannot be opened or its
    /// codec cannot be decoded, and [`ExtractorError::NoVideoStream`] if it
    /// holds no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractorError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        ffmpeg_next::init().map_err(|error| ExtractorError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ExtractorError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(ExtractorError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                ExtractorError::FileOpen {
                    path: file_path.clone(),
                    reason: format!(
                        "Failed to read codec parameters for stream {video_stream_index}: {error}"
                    ),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| ExtractorError::FileOpen {
                path: file_path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let (frame_count, frame_count_exact) =
            resolve_frame_count(stream.frames(), duration, frames_per_second);

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count,
            frame_count_exact,
            codec,
            format: input_context.format().name().to_string(),
            duration,
        };

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| ExtractorError::FileOpen {
            path: file_path.clone(),
            reason: format!("Failed to create pixel converter: {error}"),
        })?;

        log::debug!(
            "Opened {}: {}x{} {} @ {:.2} fps, {} frames{}",
            file_path.display(),
            metadata.width,
            metadata.height,
            metadata.codec,
            metadata.frames_per_second,
            metadata.frame_count,
            if metadata.frame_count_exact { "" } else { " (estimated)" },
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            metadata,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            done: false,
            file_path,
        })
    }

    /// Metadata collected at open time.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Inspect the cached metadata for problems that affect sampling.
    pub fn validate(&self) -> ValidationReport {
        validate_metadata(&self.metadata)
    }

    fn convert_current_frame(&mut self) -> Result<DynamicImage, ExtractorError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;

        let width = self.rgb_frame.width();
        let height = self.rgb_frame.height();
        let buffer = crate::utilities::frame_to_buffer(&self.rgb_frame, width, height, 3);
        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            ExtractorError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }

    fn fail(&mut self, error: ExtractorError) -> Result<Option<DynamicImage>, ExtractorError> {
        self.done = true;
        Err(error)
    }
}

/// What one `receive_frame` call means for the read loop.
#[derive(Debug, PartialEq, Eq)]
enum Received {
    Frame,
    NeedsInput,
    Drained,
    Failed(FfmpegError),
}

fn classify_receive(result: Result<(), FfmpegError>) -> Received {
    match result {
        Ok(()) => Received::Frame,
        Err(FfmpegError::Other { errno: EAGAIN }) => Received::NeedsInput,
        Err(FfmpegError::Eof) => Received::Drained,
        Err(error) => Received::Failed(error),
    }
}

impl FrameSource for VideoFile {
    fn total_frames(&self) -> Option<u64> {
        self.metadata.total_frames()
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ExtractorError> {
        if self.done {
            return Ok(None);
        }

        loop {
            match classify_receive(self.decoder.receive_frame(&mut self.decoded_frame)) {
                Received::Frame => {
                    return match self.convert_current_frame() {
                        Ok(image) => Ok(Some(image)),
                        Err(error) => self.fail(error),
                    };
                }
                Received::Drained => {
                    self.done = true;
                    return Ok(None);
                }
                Received::Failed(error) => {
                    return self.fail(ExtractorError::VideoDecodeError(error.to_string()));
                }
                // Nothing more can arrive once the decoder has been flushed.
                Received::NeedsInput if self.eof_sent => {
                    self.done = true;
                    return Ok(None);
                }
                Received::NeedsInput => {}
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            return self.fail(ExtractorError::VideoDecodeError(error.to_string()));
                        }
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        return self.fail(ExtractorError::from(error));
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    return self.fail(ExtractorError::VideoDecodeError(error.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::{Error as FfmpegError, error::EAGAIN};

    use super::{Received, classify_receive};

    #[test]
    fn decoded_frame_is_returned() {
        assert_eq!(classify_receive(Ok(())), Received::Frame);
    }

    #[test]
    fn again_asks_for_another_packet() {
        assert_eq!(
            classify_receive(Err(FfmpegError::Other { errno: EAGAIN })),
            Received::NeedsInput
        );
    }

    #[test]
    fn eof_ends_the_stream() {
        assert_eq!(classify_receive(Err(FfmpegError::Eof)), Received::Drained);
    }

    #[test]
    fn other_receive_errors_are_fatal() {
        assert_eq!(
            classify_receive(Err(FfmpegError::InvalidData)),
            Received::Failed(FfmpegError::InvalidData)
        );
        assert!(matches!(
            classify_receive(Err(FfmpegError::Other { errno: EAGAIN + 1 })),
            Received::Failed(_)
        ));
    }
}
