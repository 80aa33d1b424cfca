//! Frame sampler integration tests.
//!
//! These run against an in-memory [`FrameSource`], so they need no fixtures.

use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex},
};

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use ytframes::{
    CancellationToken, ExtractorError, FrameSampler, FrameSource, ProgressCallback, ProgressInfo,
    SampleInterval, SampleOptions, utilities::frame_counter_from_name,
};

/// Produces `count` small solid-colour frames, optionally failing at one index.
struct SyntheticSource {
    count: u64,
    reported_total: Option<u64>,
    fail_at: Option<u64>,
    rgba: bool,
    produced: u64,
}

impl SyntheticSource {
    fn new(count: u64) -> Self {
        Self {
            count,
            reported_total: Some(count),
            fail_at: None,
            rgba: false,
            produced: 0,
        }
    }

    fn failing_at(mut self, index: u64) -> Self {
        self.fail_at = Some(index);
        self
    }

    fn reporting(mut self, total: Option<u64>) -> Self {
        self.reported_total = total;
        self
    }

    fn rgba(mut self) -> Self {
        self.rgba = true;
        self
    }
}

impl FrameSource for SyntheticSource {
    fn total_frames(&self) -> Option<u64> {
        self.reported_total
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, ExtractorError> {
        if self.fail_at == Some(self.produced) {
            return Err(ExtractorError::VideoDecodeError(format!(
                "corrupt packet at frame {}",
                self.produced
            )));
        }
        if self.produced >= self.count {
            return Ok(None);
        }
        let shade = (self.produced % 256) as u8;
        self.produced += 1;
        let image = if self.rgba {
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([shade, 0, 255 - shade, 128])))
        } else {
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([shade, 64, 255 - shade])))
        };
        Ok(Some(image))
    }
}

#[derive(Default)]
struct RecordingProgress {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

/// Counters embedded in `frame_<N>.*` files, ascending.
fn written_counters(dir: &Path) -> Vec<u64> {
    let mut counters: Vec<u64> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            frame_counter_from_name("frame", &name)
        })
        .collect();
    counters.sort_unstable();
    counters
}

fn leftover_partials(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".part")
        })
        .count()
}

fn interval(every: u64) -> SampleInterval {
    SampleInterval::new(every).unwrap()
}

// ── Counting ───────────────────────────────────────────────────────

#[test]
fn written_count_is_frames_over_interval_rounded_up() {
    for (frames, every) in [(10, 3), (9, 3), (1, 30), (31, 30), (7, 7)] {
        let out = tempfile::tempdir().unwrap();
        let mut source = SyntheticSource::new(frames);

        let summary = FrameSampler::sample(&mut source, interval(every), out.path()).unwrap();

        let expected = frames.div_ceil(every);
        assert_eq!(summary.written, expected, "F={frames} N={every}");
        assert_eq!(summary.decoded, frames);
        assert_eq!(written_counters(out.path()).len() as u64, expected);
    }
}

#[test]
fn interval_one_writes_every_frame() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(12);

    let summary = FrameSampler::sample(&mut source, interval(1), out.path()).unwrap();

    assert_eq!(summary.written, 12);
    assert_eq!(written_counters(out.path()), (0..12).collect::<Vec<_>>());
}

#[test]
fn empty_source_writes_nothing_and_succeeds() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(0);

    let summary = FrameSampler::sample(&mut source, interval(5), out.path()).unwrap();

    assert_eq!(summary.written, 0);
    assert_eq!(summary.decoded, 0);
    assert_eq!(summary.last_written, None);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

// ── Naming ─────────────────────────────────────────────────────────

#[test]
fn first_frame_is_always_written() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(3);

    FrameSampler::sample(&mut source, interval(1000), out.path()).unwrap();

    assert_eq!(written_counters(out.path()), vec![0]);
    assert!(out.path().join("frame_0.jpg").is_file());
}

#[test]
fn counters_step_by_exactly_the_interval() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(50);

    let summary = FrameSampler::sample(&mut source, interval(7), out.path()).unwrap();

    let counters = written_counters(out.path());
    assert_eq!(counters.first(), Some(&0));
    for pair in counters.windows(2) {
        assert_eq!(pair[1] - pair[0], 7);
    }
    assert_eq!(summary.last_written, Some(out.path().join("frame_49.jpg")));
}

#[test]
fn custom_prefix_and_extension() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(4);
    let options = SampleOptions::new().with_prefix("shot").with_extension(".PNG");

    FrameSampler::sample_with_options(&mut source, interval(2), out.path(), &options).unwrap();

    let decoded = image::open(out.path().join("shot_2.png")).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 6));
    assert!(out.path().join("shot_0.png").is_file());
}

#[test]
fn rgba_frames_are_written_as_jpeg() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(2).rgba();

    FrameSampler::sample(&mut source, interval(1), out.path()).unwrap();

    let decoded = image::open(out.path().join("frame_1.jpg")).unwrap();
    assert_eq!(decoded.width(), 8);
}

// ── Failures ───────────────────────────────────────────────────────

#[test]
fn decode_failure_keeps_earlier_frames_and_errors() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(10).failing_at(5);

    let result = FrameSampler::sample(&mut source, interval(2), out.path());

    assert!(matches!(result, Err(ExtractorError::VideoDecodeError(_))));
    assert_eq!(written_counters(out.path()), vec![0, 2, 4]);
    assert_eq!(leftover_partials(out.path()), 0);
}

#[test]
fn decode_failure_on_first_frame_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(10).failing_at(0);

    let result = FrameSampler::sample(&mut source, interval(1), out.path());

    assert!(result.is_err());
    assert!(written_counters(out.path()).is_empty());
}

#[test]
fn missing_output_directory_is_a_write_error() {
    let out = tempfile::tempdir().unwrap();
    let missing = out.path().join("does").join("not").join("exist");
    let mut source = SyntheticSource::new(3);

    let result = FrameSampler::sample(&mut source, interval(1), &missing);

    match result {
        Err(ExtractorError::FrameWrite { path, .. }) => {
            assert_eq!(path, missing.join("frame_0.jpg"));
        }
        other => panic!("Expected FrameWrite, got: {other:?}"),
    }
    assert!(!missing.exists());
}

#[test]
fn unsupported_extension_fails_before_reading() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(3);
    let options = SampleOptions::new().with_extension("xyz");

    let result = FrameSampler::sample_with_options(&mut source, interval(1), out.path(), &options);

    assert!(matches!(result, Err(ExtractorError::UnsupportedImageFormat(_))));
    assert_eq!(source.produced, 0);
}

// ── Cancellation ───────────────────────────────────────────────────

/// Cancels its token as soon as the first frame has been written.
struct CancelAfterFirst {
    token: CancellationToken,
}

impl ProgressCallback for CancelAfterFirst {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.written >= 1 {
            self.token.cancel();
        }
    }
}

#[test]
fn cancellation_stops_between_frames() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(20);
    let token = CancellationToken::new();
    let options = SampleOptions::new()
        .with_cancellation(token.clone())
        .with_progress(Arc::new(CancelAfterFirst { token }));

    let result = FrameSampler::sample_with_options(&mut source, interval(1), out.path(), &options);

    assert!(matches!(result, Err(ExtractorError::Cancelled)));
    assert_eq!(written_counters(out.path()), vec![0]);
    assert_eq!(leftover_partials(out.path()), 0);
    assert_eq!(source.produced, 1);
}

#[test]
fn cancelled_before_start_reads_nothing() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(5);
    let token = CancellationToken::new();
    token.cancel();
    let options = SampleOptions::new().with_cancellation(token);

    let result = FrameSampler::sample_with_options(&mut source, interval(1), out.path(), &options);

    assert!(matches!(result, Err(ExtractorError::Cancelled)));
    assert_eq!(source.produced, 0);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

// ── Progress ───────────────────────────────────────────────────────

#[test]
fn progress_reports_each_written_frame_then_completion() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(7);
    let recorder = Arc::new(RecordingProgress::default());
    let options = SampleOptions::new().with_progress(recorder.clone());

    FrameSampler::sample_with_options(&mut source, interval(3), out.path(), &options).unwrap();

    let infos = recorder.infos.lock().unwrap();
    let frame_numbers: Vec<Option<u64>> = infos.iter().map(|info| info.frame_number).collect();
    assert_eq!(frame_numbers, vec![Some(0), Some(3), Some(6), None]);

    let last = infos.last().unwrap();
    assert!(last.finished);
    assert_eq!(last.written, 3);
    assert_eq!(last.decoded, 7);
    assert_eq!(last.total, Some(7));
    assert_eq!(last.percentage, Some(100.0));
    assert!(infos[..3].iter().all(|info| !info.finished));
}

#[test]
fn zero_reported_total_is_shown_as_unknown() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(4).reporting(Some(0));
    let recorder = Arc::new(RecordingProgress::default());
    let options = SampleOptions::new().with_progress(recorder.clone());

    let summary =
        FrameSampler::sample_with_options(&mut source, interval(2), out.path(), &options).unwrap();

    assert_eq!(summary.reported_total, None);
    let infos = recorder.infos.lock().unwrap();
    assert!(!infos.is_empty());
    for info in infos.iter() {
        assert_eq!(info.total, None);
        assert_eq!(info.percentage, None);
        assert_eq!(info.total_display(), "?");
    }
}

#[test]
fn batch_size_thins_out_reports() {
    let out = tempfile::tempdir().unwrap();
    let mut source = SyntheticSource::new(10).reporting(None);
    let recorder = Arc::new(RecordingProgress::default());
    let options = SampleOptions::new()
        .with_progress(recorder.clone())
        .with_batch_size(4);

    FrameSampler::sample_with_options(&mut source, interval(1), out.path(), &options).unwrap();

    let infos = recorder.infos.lock().unwrap();
    let written: Vec<u64> = infos.iter().map(|info| info.written).collect();
    assert_eq!(written, vec![4, 8, 10]);
}
