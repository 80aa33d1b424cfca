//! # ytframes
//!
//! Download a video and sample still frames from it at a fixed stride.
//!
//! The heart of the crate is [`FrameSampler`]: it reads a [`FrameSource`]
//! sequentially, writes every Nth frame as `frame_<N>.jpg`, and reports
//! progress as it goes. [`VideoFile`] is the FFmpeg-backed source (via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)); [`YtDlp`] fetches
//! videos from URLs by running the external `yt-dlp` program.
//!
//! ## Quick Start
//!
//! ### Sample a local file
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ytframes::{FrameSampler, SampleInterval, VideoFile};
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! let summary = FrameSampler::sample(&mut video, SampleInterval::new(30)?, Path::new("frames"))?;
//! println!("{} frames written", summary.written);
//! # Ok::<(), ytframes::ExtractorError>(())
//! ```
//!
//! ### Download, then sample
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ytframes::{Downloader, FrameSampler, Quality, RunWorkspace, SampleInterval, VideoFile, YtDlp};
//!
//! let workspace = RunWorkspace::create(Path::new("."))?;
//! let file = YtDlp::new().download("https://youtu.be/xyz", Quality::Best, workspace.root())?;
//! let mut video = VideoFile::open(file)?;
//! FrameSampler::sample(&mut video, SampleInterval::default(), workspace.images())?;
//! # Ok::<(), ytframes::ExtractorError>(())
//! ```
//!
//! ## Behaviour
//!
//! - The frame counter starts at 0, so the first frame is always written.
//!   A source of `F` frames sampled every `N` yields `ceil(F / N)` images.
//! - Nothing is buffered; memory use does not grow with video length.
//! - The first decode or write error ends the run. Frames already written
//!   stay on disk.
//! - A [`CancellationToken`] stops the run between frames. Images are
//!   renamed into place only once fully encoded, so no partial image is ever
//!   left under a final name.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed to build. Downloading
//! needs `yt-dlp` on PATH at run time.

pub mod configuration;
pub mod dependency;
pub mod download;
pub mod error;
pub mod ffmpeg;
pub mod interval;
pub mod metadata;
pub mod progress;
pub mod sampler;
pub mod source;
pub mod utilities;
pub mod validation;
pub mod video;
pub mod workspace;

pub use configuration::SampleOptions;
pub use dependency::{DependencyChecker, DependencyStatus};
pub use download::{Downloader, Quality, YtDlp};
pub use error::ExtractorError;
pub use ffmpeg::FfmpegLogLevel;
pub use interval::SampleInterval;
pub use metadata::VideoMetadata;
pub use progress::{CancellationToken, ProgressCallback, ProgressInfo};
pub use sampler::{FrameSampler, SampleSummary};
pub use source::FrameSource;
pub use validation::ValidationReport;
pub use video::VideoFile;
pub use workspace::RunWorkspace;
