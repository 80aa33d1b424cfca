//! The decoded-frame source consumed by the sampler.
//!
//! [`FrameSource`] is the seam between decoding and sampling.
//! [`VideoFile`](crate::VideoFile) implements it on top of FFmpeg; tests and
//! benches implement it over in-memory images.

use image::DynamicImage;

use crate::error::ExtractorError;

/// An ordered, finite sequence of decoded frames read one at a time.
pub trait FrameSource {
    /// Total number of frames the decoder expects to produce.
    ///
    /// Best effort: `None` when the decoder cannot tell. Callers must not
    /// rely on it matching the number of frames actually read.
    fn total_frames(&self) -> Option<u64>;

    /// Decode the next frame.
    ///
    /// Returns `Ok(None)` at end of stream. A decode failure is returned as
    /// `Err` and the source should not be read again afterwards.
    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ExtractorError>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn total_frames(&self) -> Option<u64> {
        (**self).total_frames()
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ExtractorError> {
        (**self).next_frame()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn total_frames(&self) -> Option<u64> {
        (**self).total_frames()
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ExtractorError> {
        (**self).next_frame()
    }
}
