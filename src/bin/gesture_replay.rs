//! gesture_replay - run a frame source through the recognizer as fast as possible
//!
//! Prints one line per delivered gesture (plain text or JSON lines) and a
//! per-gesture summary at the end. Synthetic sources are endless, so they are
//! cut off after `--frames` frames.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;

use gesture_kernel::{FrameSource, GestureConfig, GestureEvent, GestureId, PersonTable};

#[path = "../ui.rs"]
mod ui;

const DEFAULT_SYNTHETIC_FRAMES: u64 = 300;
const PROGRESS_EVERY: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file (JSON, or TOML by extension). Defaults to $GESTURE_CONFIG.
    #[arg(long, value_name = "PATH", env = "GESTURE_CONFIG")]
    config: Option<PathBuf>,
    /// Frame source: stub://<script> or a JSON-lines recording. Overrides the config.
    #[arg(long, value_name = "URI")]
    source: Option<String>,
    /// Stop after this many frames (synthetic sources default to 300).
    #[arg(long)]
    frames: Option<u64>,
    /// Seed for synthetic jitter.
    #[arg(long)]
    seed: Option<u64>,
    /// Event output format on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
    /// UI mode for stderr progress.
    #[arg(long, value_enum, default_value_t = ui::UiMode::Auto)]
    ui: ui::UiMode,
}

#[derive(Serialize)]
struct EventLine<'a> {
    timestamp_ms: u64,
    #[serde(flatten)]
    event: &'a GestureEvent,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let stderr_is_tty = std::io::stderr().is_terminal();
    let stdout_is_piped = !std::io::stdout().is_terminal();
    let ui = ui::Ui::new(args.ui, stderr_is_tty, stdout_is_piped);

    let (config, mut source) = {
        let _stage = ui.stage("Load config + open source");
        let mut config = GestureConfig::load_from(args.config.as_deref())?;
        if let Some(uri) = &args.source {
            config.source.uri = uri.clone();
        }
        if args.seed.is_some() {
            config.source.seed = args.seed;
        }
        let mut source = FrameSource::open(&config.source)?;
        source.connect()?;
        (config, source)
    };

    let limit = match args.frames {
        Some(0) => return Err(anyhow!("--frames must be >= 1")),
        Some(frames) => Some(frames),
        None if source.is_endless() => Some(DEFAULT_SYNTHETIC_FRAMES),
        None => None,
    };

    let mut people = PersonTable::new(config.settings.clone())?;
    let mut counts: BTreeMap<GestureId, u64> = BTreeMap::new();
    let mut frames = 0u64;
    let mut events_total = 0u64;

    {
        let stage = ui.stage("Recognize gestures");
        while limit.map_or(true, |limit| frames < limit) {
            let Some(frame) = source.next_frame()? else {
                break;
            };
            frames += 1;
            let timestamp = frame.timestamp;
            for event in people.process_frame(frame) {
                events_total += 1;
                *counts.entry(event.gesture).or_default() += 1;
                print_event(args.format, timestamp.as_millis() as u64, &event)?;
            }
            if frames % PROGRESS_EVERY == 0 {
                stage.progress(frames, events_total);
            }
        }
    }

    let summary = summary_lines(&config.source.uri, frames, &counts);
    for line in summary {
        match args.format {
            OutputFormat::Plain => println!("{}", line),
            // Keep stdout pure JSON lines.
            OutputFormat::Json => eprintln!("{}", line),
        }
    }
    Ok(())
}

fn print_event(format: OutputFormat, timestamp_ms: u64, event: &GestureEvent) -> Result<()> {
    match format {
        OutputFormat::Plain => println!(
            "{:>8}ms  body {:<6} {}",
            timestamp_ms, event.tracking_id, event.gesture
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&EventLine {
                timestamp_ms,
                event
            })?
        ),
    }
    Ok(())
}

fn summary_lines(uri: &str, frames: u64, counts: &BTreeMap<GestureId, u64>) -> Vec<String> {
    let mut lines = vec![
        "replay summary:".to_string(),
        format!("  source: {}", uri),
        format!("  frames processed: {}", frames),
        format!("  gestures delivered: {}", counts.values().sum::<u64>()),
    ];
    for (gesture, count) in counts {
        lines.push(format!("    {}: {}", gesture, count));
    }
    lines
}
