use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use console::style;

use scenecut::decode::{Decoder, Y4mDecoder};
use scenecut::format::{OutputFormat, write_scenes};
use scenecut::{DetectionOptions, Progress, detect_scene_changes};

#[derive(Parser, Debug)]
#[command(
    name = "scenecut",
    version,
    about = "Detects scene-change boundaries in a video file"
)]
struct Cli {
    /// Input video file (y4m)
    input: PathBuf,

    /// Write the cut list to a file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json, csv, aegisub, or timecode
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Detection sensitivity: low, medium, or high
    #[arg(short, long, default_value = "medium")]
    sensitivity: String,

    /// Motion search window: auto, small, medium, or large
    #[arg(long, default_value = "auto")]
    search_range: String,

    /// Suppress progress and log output
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not failures
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    setup_logger(cli.quiet, cli.verbose)?;

    let options = DetectionOptions {
        sensitivity: cli.sensitivity.parse()?,
        search_range: cli.search_range.parse()?,
        ..DetectionOptions::default()
    };
    let format: OutputFormat = cli.format.parse()?;

    let mut decoder = Y4mDecoder::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let metadata = decoder.metadata();
    log::debug!(
        "input {}x{} @ {} fps, {:?} frames",
        metadata.width,
        metadata.height,
        metadata.fps,
        metadata.total_frames
    );

    let show_progress = !cli.quiet && console::user_attended_stderr();
    let mut last_tick: Option<Instant> = None;
    let mut progress_line = |progress: &Progress| {
        let now = Instant::now();
        if last_tick.is_some_and(|tick| now.duration_since(tick) < Duration::from_millis(250)) {
            return;
        }
        last_tick = Some(now);
        match (progress.percent, progress.eta_seconds) {
            (Some(percent), Some(eta)) => eprint!(
                "\r  {} frame {} ({percent:.1}%, eta {eta:.0}s)   ",
                style("Analyzing").yellow(),
                progress.current_frame
            ),
            _ => eprint!(
                "\r  {} frame {}   ",
                style("Analyzing").yellow(),
                progress.current_frame
            ),
        }
        let _ = io::stderr().flush();
    };

    let start = Instant::now();
    let result = detect_scene_changes(
        &mut decoder,
        &options,
        show_progress.then_some(&mut progress_line as &mut dyn FnMut(&Progress)),
        None,
    )?;

    if !cli.quiet {
        eprintln!(
            "\r  {} {} scene changes across {} frames in {:.2}s",
            style("Found").green(),
            result.scenes.len(),
            result.total_frames,
            start.elapsed().as_secs_f64()
        );
    }

    match &cli.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_scenes(&result, format, &mut file)?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_scenes(&result, format, &mut lock)?;
        }
    }

    Ok(())
}

fn setup_logger(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message));
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
