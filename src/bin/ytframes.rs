use std::{
    fs,
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use ytframes::{
    CancellationToken, DependencyChecker, Downloader, ExtractorError, FfmpegLogLevel,
    FrameSampler, ProgressCallback, ProgressInfo, Quality, RunWorkspace, SampleInterval,
    SampleOptions, SampleSummary, VideoFile, YtDlp,
    dependency::install_hint,
};

const BANNER: &str = r"
    +-+-+-+-+-+-+-+ +-+-+-+-+-+-+-+-+
    |  Video  Frame/Image Extractor |
    +-+-+-+-+-+-+-+ +-+-+-+-+-+-+-+-+
";

const CLI_AFTER_HELP: &str = "Examples:\n  ytframes download https://youtu.be/dQw4w9WgXcQ -f 30\n  ytframes download https://youtu.be/dQw4w9WgXcQ --small --every 60 --base runs\n  ytframes extract input.mp4 --out frames --every 10 --ext png\n  ytframes info input.mp4 --json\n  ytframes completions zsh > _ytframes";

const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Parser)]
#[command(
    name = "ytframes",
    version,
    about = "Download a video and save every Nth frame as an image",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging.
    #[arg(long, global = true)]
    verbose: bool,

    /// Hide the banner, progress line, and downloader output.
    #[arg(long, global = true)]
    quiet: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<FfmpegLogLevel>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download a video from a URL and extract frames from it.
    #[command(
        about = "Download a video and extract frames",
        after_help = "Frames land in <BASE>/<run-id>/Images/frame_<N>.<EXT>."
    )]
    Download {
        /// Video URL.
        url: String,
        /// Download the lowest quality video (smaller file).
        #[arg(short, long)]
        small: bool,
        /// Save one image every N frames.
        #[arg(
            short = 'f',
            long = "every",
            value_name = "N",
            default_value = "30",
            allow_negative_numbers = true,
            value_parser = parse_interval
        )]
        every: SampleInterval,
        /// Directory the run directory is created in.
        #[arg(long, default_value = ".")]
        base: PathBuf,
        /// Output image extension (jpg, png, bmp, tiff, webp).
        #[arg(long, default_value = "jpg")]
        ext: String,
    },

    /// Extract frames from a local video file.
    #[command(about = "Extract frames from a local file")]
    Extract {
        /// Input video path.
        input: PathBuf,
        /// Output directory for frame images.
        #[arg(long)]
        out: PathBuf,
        /// Save one image every N frames.
        #[arg(
            short = 'f',
            long = "every",
            value_name = "N",
            default_value = "30",
            allow_negative_numbers = true,
            value_parser = parse_interval
        )]
        every: SampleInterval,
        /// Output image extension (jpg, png, bmp, tiff, webp).
        #[arg(long, default_value = "jpg")]
        ext: String,
        /// Write into a non-empty output directory.
        #[arg(long)]
        overwrite: bool,
    },

    /// Print video metadata and a validation report.
    #[command(about = "Print video metadata", visible_alias = "probe")]
    Info {
        /// Input video path.
        input: PathBuf,
    },

    /// Report whether yt-dlp and ffmpeg are installed.
    #[command(about = "Check external tools")]
    Check,

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_interval(value: &str) -> Result<SampleInterval, String> {
    value
        .parse()
        .map_err(|_| "argument must be a positive integer value".to_string())
}

/// Renders `[processing frame] <count>/<total>` on one overwriting line.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(hidden: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(ProgressStyle::with_template("[processing frame] {msg}")?);
            bar
        };
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.finished {
            self.bar.finish();
            return;
        }
        if let Some(frame_number) = info.frame_number {
            self.bar
                .set_message(format!("{frame_number}/{}", info.total_display()));
        }
    }
}

fn init_logging(global: &GlobalOptions) {
    let default_filter = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn install_interrupt_handler() -> Result<CancellationToken, Box<dyn std::error::Error>> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|error| format!("could not register Ctrl-C handler: {error}"))?;
    Ok(token)
}

/// A Ctrl-C also reaches child processes, so a failure after the token
/// fired is reported as the interrupt rather than as the failure.
fn interrupted_or(token: &CancellationToken, error: ExtractorError) -> ExtractorError {
    if token.is_cancelled() {
        log::debug!("Ignoring error after interrupt: {error}");
        ExtractorError::Cancelled
    } else {
        error
    }
}

fn exit_code(error: &(dyn std::error::Error + 'static)) -> i32 {
    match error.downcast_ref::<ExtractorError>() {
        Some(ExtractorError::Cancelled) => INTERRUPTED_EXIT_CODE,
        _ => 1,
    }
}

fn warn(global: &GlobalOptions, message: &str) {
    if !global.quiet {
        eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
    }
}

/// Open `input`, sample it into `out_dir`, and print the outcome.
fn sample_file(
    global: &GlobalOptions,
    input: &Path,
    out_dir: &Path,
    every: SampleInterval,
    ext: &str,
    token: CancellationToken,
) -> Result<SampleSummary, Box<dyn std::error::Error>> {
    if token.is_cancelled() {
        return Err(ExtractorError::Cancelled.into());
    }
    let mut video = VideoFile::open(input).map_err(|error| interrupted_or(&token, error))?;

    let report = video.validate();
    for warning in report.warnings.iter().chain(&report.errors) {
        log::warn!("{}: {warning}", input.display());
    }

    let progress = Arc::new(TerminalProgress::new(global.quiet || global.json)?);
    let options = SampleOptions::new()
        .with_extension(ext)
        .with_cancellation(token)
        .with_progress(progress);

    let summary = FrameSampler::sample_with_options(&mut video, every, out_dir, &options)?;

    if global.json {
        let payload = json!({
            "video": input.display().to_string(),
            "output_dir": out_dir.display().to_string(),
            "interval": every.get(),
            "decoded": summary.decoded,
            "written": summary.written,
            "reported_total": summary.reported_total,
            "last_written": summary.last_written.as_ref().map(|path| path.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !global.quiet {
        println!("\n[completed]");
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "Extracted {} frame(s) to {}",
                summary.written,
                out_dir.display()
            )
            .green()
        );
    }

    Ok(summary)
}

fn ensure_output_dir(out: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if out.is_dir() && fs::read_dir(out)?.next().is_some() && !overwrite {
        return Err(format!(
            "output directory is not empty: {} (use --overwrite)",
            out.display()
        )
        .into());
    }
    fs::create_dir_all(out)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let global = cli.global;
    global.log_level.unwrap_or_default().apply();

    match cli.command {
        Commands::Download {
            url,
            small,
            every,
            base,
            ext,
        } => {
            for status in DependencyChecker::default().check() {
                if status.is_installed() {
                    continue;
                }
                let hint = install_hint(&status.program);
                if status.is_required() {
                    let error = ExtractorError::MissingDependency {
                        program: status.program,
                    };
                    return Err(format!("{error}; {hint}").into());
                }
                warn(
                    &global,
                    &format!(
                        "`{}` not found, some formats may fail to download; {hint}",
                        status.program
                    ),
                );
            }

            let token = install_interrupt_handler()?;
            let quality = if small { Quality::Worst } else { Quality::Best };
            let workspace = RunWorkspace::create(&base)?;
            let video = YtDlp::new()
                .quiet(global.quiet || global.json)
                .download(&url, quality, workspace.root())
                .map_err(|error| interrupted_or(&token, error))?;

            sample_file(&global, &video, workspace.images(), every, &ext, token)?;
        }
        Commands::Extract {
            input,
            out,
            every,
            ext,
            overwrite,
        } => {
            ensure_output_dir(&out, overwrite)?;
            let token = install_interrupt_handler()?;
            sample_file(&global, &input, &out, every, &ext, token)?;
        }
        Commands::Info { input } => {
            let video = VideoFile::open(&input)?;
            let metadata = video.metadata();
            let report = video.validate();
            if global.json {
                let payload = json!({
                    "path": input.display().to_string(),
                    "format": metadata.format,
                    "codec": metadata.codec,
                    "width": metadata.width,
                    "height": metadata.height,
                    "fps": metadata.frames_per_second,
                    "frame_count": metadata.total_frames(),
                    "frame_count_exact": metadata.frame_count_exact,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "valid": report.is_valid(),
                    "warnings": report.warnings,
                    "errors": report.errors,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                println!(
                    "Video: {}x{} @ {:.2} fps [{}]",
                    metadata.width, metadata.height, metadata.frames_per_second, metadata.codec,
                );
                match metadata.total_frames() {
                    Some(count) if metadata.frame_count_exact => println!("Frames: {count}"),
                    Some(count) => println!("Frames: ~{count}"),
                    None => println!("Frames: unknown"),
                }
                print!("{report}");
            }
        }
        Commands::Check => {
            let statuses = DependencyChecker::default().check();
            let mut missing_required = 0;
            for status in &statuses {
                match &status.location {
                    Some(location) => println!(
                        "{} {} ({})",
                        "found".green().bold(),
                        status.program,
                        location.display()
                    ),
                    None => {
                        if status.is_required() {
                            missing_required += 1;
                        }
                        println!(
                            "{} {}: {}",
                            "missing".red().bold(),
                            status.program,
                            install_hint(&status.program)
                        );
                    }
                }
            }
            if missing_required > 0 {
                return Err(format!("{missing_required} required program(s) not found").into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "ytframes", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.global);

    let show_banner = !cli.global.quiet
        && !cli.global.json
        && !matches!(cli.command, Commands::Completions { .. });
    if show_banner {
        println!("{BANNER}");
    }

    if let Err(error) = run(cli) {
        let code = exit_code(error.as_ref());
        if code == INTERRUPTED_EXIT_CODE {
            eprintln!("\n{}", "interrupted".yellow().bold());
        } else {
            eprintln!("{} {error}", "error:".red().bold());
        }
        process::exit(code);
    }
}
