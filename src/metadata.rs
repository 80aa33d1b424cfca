//! Video metadata types.
//!
//! [`VideoMetadata`] is collected once when a [`VideoFile`](crate::VideoFile)
//! is opened and cached for its lifetime.

use std::time::Duration;

/// Metadata for the decoded video stream.
///
/// # Example
///
/// ```no_run
/// use ytframes::VideoFile;
///
/// let video = VideoFile::open("input.mp4").unwrap();
/// let metadata = video.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Frame count as reported by the container, or estimated from duration
    /// and frame rate. Zero when neither is available.
    pub frame_count: u64,
    /// `true` when `frame_count` came from the container rather than an estimate.
    pub frame_count_exact: bool,
    /// Codec name (e.g. `"h264"`, `"vp9"`, `"av1"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`, `"matroska,webm"`).
    pub format: String,
    /// Total duration of the file.
    pub duration: Duration,
}

impl VideoMetadata {
    /// The frame count, or `None` when the decoder could not report one.
    pub fn total_frames(&self) -> Option<u64> {
        (self.frame_count > 0).then_some(self.frame_count)
    }
}

/// Pick the best available frame count.
///
/// Prefers the container's own count; falls back to `duration × fps`.
pub(crate) fn resolve_frame_count(
    container_frames: i64,
    duration: Duration,
    frames_per_second: f64,
) -> (u64, bool) {
    if container_frames > 0 {
        return (container_frames as u64, true);
    }
    if frames_per_second > 0.0 {
        ((duration.as_secs_f64() * frames_per_second) as u64, false)
    } else {
        (0, false)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::resolve_frame_count;

    #[test]
    fn container_count_wins() {
        assert_eq!(
            resolve_frame_count(240, Duration::from_secs(100), 30.0),
            (240, true)
        );
    }

    #[test]
    fn estimate_from_duration() {
        assert_eq!(
            resolve_frame_count(0, Duration::from_secs(10), 25.0),
            (250, false)
        );
    }

    #[test]
    fn unknown_when_no_rate() {
        assert_eq!(
            resolve_frame_count(0, Duration::from_secs(10), 0.0),
            (0, false)
        );
    }
}
