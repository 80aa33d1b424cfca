//! FFmpeg-backed source tests.
//!
//! Tests that decode require fixture files from
//! `tests/fixtures/generate_fixtures.sh` and return early when they are
//! missing.

use std::path::Path;

use ytframes::{
    CancellationToken, ExtractorError, FrameSampler, FrameSource, SampleInterval, SampleOptions,
    VideoFile,
};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

fn not_a_video_path() -> &'static str {
    "tests/fixtures/not_a_video.mp4"
}

#[test]
fn open_nonexistent_file() {
    let result = VideoFile::open("this_file_does_not_exist.mp4");

    match result {
        Err(error @ ExtractorError::FileOpen { .. }) => {
            assert!(
                error.to_string().contains("Failed to open video file"),
                "Error message should mention file open failure: {error}",
            );
        }
        other => panic!("Expected FileOpen, got: {other:?}"),
    }
}

#[test]
fn open_garbage_file() {
    let path = not_a_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let result = VideoFile::open(path);
    assert!(result.is_err(), "Garbage input should not open");
}

#[test]
fn metadata_describes_fixture() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let video = VideoFile::open(path).expect("Failed to open fixture");
    let metadata = video.metadata();

    assert_eq!((metadata.width, metadata.height), (320, 240));
    assert!((metadata.frames_per_second - 30.0).abs() < 0.5);
    assert!(metadata.total_frames().is_some());
    assert!(video.validate().is_valid());
    assert_eq!(video.path(), Path::new(path));
}

#[test]
fn decodes_every_frame_in_order() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut video = VideoFile::open(path).expect("Failed to open fixture");
    let mut count = 0_u64;
    while let Some(image) = video.next_frame().expect("Decode failed") {
        assert_eq!((image.width(), image.height()), (320, 240));
        count += 1;
    }

    assert_eq!(count, 60);
    // Exhausted sources stay exhausted.
    assert!(video.next_frame().unwrap().is_none());
}

#[test]
fn samples_fixture_to_jpegs() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let out = tempfile::tempdir().unwrap();
    let mut video = VideoFile::open(path).expect("Failed to open fixture");

    let summary = FrameSampler::sample(&mut video, SampleInterval::new(25).unwrap(), out.path())
        .expect("Sampling failed");

    assert_eq!(summary.decoded, 60);
    assert_eq!(summary.written, 3);
    for counter in [0, 25, 50] {
        let frame = image::open(out.path().join(format!("frame_{counter}.jpg")))
            .expect("Written frame should decode");
        assert_eq!(frame.width(), 320);
    }
}

#[test]
fn cancelled_run_on_fixture() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let out = tempfile::tempdir().unwrap();
    let token = CancellationToken::new();
    token.cancel();
    let options = SampleOptions::new().with_cancellation(token);

    let mut video = VideoFile::open(path).expect("Failed to open fixture");
    let result =
        FrameSampler::sample_with_options(&mut video, SampleInterval::new(1).unwrap(), out.path(), &options);

    assert!(matches!(result, Err(ExtractorError::Cancelled)));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}
