//! Internal utility functions.
//!
//! Helpers for pixel-data copying and file naming that do not belong in any
//! single public module.

use ffmpeg_next::frame::Video as VideoFrame;

/// Copy pixel data from an FFmpeg video frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × bpp).
/// This strips that padding so the result can go straight into
/// [`image::RgbImage::from_raw`].
pub fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// File name for the frame at zero-based position `counter`.
///
/// ```
/// assert_eq!(ytframes::utilities::frame_file_name("frame", 120, "jpg"), "frame_120.jpg");
/// ```
pub fn frame_file_name(prefix: &str, counter: u64, extension: &str) -> String {
    format!("{prefix}_{counter}.{extension}")
}

/// Parse the counter back out of a name produced by [`frame_file_name`].
pub fn frame_counter_from_name(prefix: &str, file_name: &str) -> Option<u64> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('_')?;
    let (digits, _extension) = rest.split_once('.')?;
    digits.parse().ok()
}

/// Replace every character that is not plain ASCII, or is whitespace or
/// punctuation, with `_`.
///
/// ```
/// assert_eq!(ytframes::utilities::restrict_to_ascii("Hé llo, world!"), "H__llo__world_");
/// ```
pub fn restrict_to_ascii(title: &str) -> String {
    title
        .chars()
        .map(|ch| {
            if ch.is_ascii() && !ch.is_ascii_whitespace() && !ch.is_ascii_punctuation() {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{frame_counter_from_name, frame_file_name, restrict_to_ascii};

    #[test]
    fn counter_round_trips_through_name() {
        let name = frame_file_name("frame", 42, "png");
        assert_eq!(frame_counter_from_name("frame", &name), Some(42));
    }

    #[test]
    fn counter_rejects_foreign_names() {
        assert_eq!(frame_counter_from_name("frame", "thumb_3.jpg"), None);
        assert_eq!(frame_counter_from_name("frame", "frame_x.jpg"), None);
        assert_eq!(frame_counter_from_name("frame", ".frame_3.jpg.part"), None);
    }

    #[test]
    fn ascii_restriction_keeps_alphanumerics() {
        assert_eq!(restrict_to_ascii("Video123"), "Video123");
        assert_eq!(restrict_to_ascii("a-b_c"), "a_b_c");
        assert_eq!(restrict_to_ascii("日本"), "__");
    }
}
