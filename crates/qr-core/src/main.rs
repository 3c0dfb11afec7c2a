//! qr-core CLI: replay a scheduler trace into queue-state JSON.
//!
//! Thin shell over the library: reads trace text, runs the parse → replay →
//! aggregate pipeline, and writes the export for downstream renderers. All
//! scheduling logic lives in the library.

use clap::{Args, Parser, Subcommand};
use qr_common::{Error, Result};
use qr_core::exit_codes::ExitCode;
use qr_core::{
    aggregate_intervals, parse_trace, replay_queues, ReplayConfig, ReplayExport, SchedulerMode,
};
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "qr-core",
    version,
    about = "Replay CPU scheduler traces into per-tick queue states"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a trace into snapshots and timelines, exported as JSON.
    Replay(ReplayArgs),
    /// Print the JSON schema of the export format.
    Schema,
}

#[derive(Args)]
struct ReplayArgs {
    /// Trace file to replay ("-" reads stdin).
    #[arg(long, default_value = "-")]
    trace: String,

    /// Output path for the JSON export ("-" writes stdout).
    #[arg(long, default_value = "-")]
    out: String,

    /// Scheduler variant that produced the trace.
    #[arg(long, value_enum, env = "QR_REPLAY_MODE")]
    mode: Option<SchedulerMode>,

    /// Milliseconds per tick for events without an explicit duration.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Cap on the snapshot sequence length.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Keep only the first N events before replay.
    #[arg(long)]
    max_ticks: Option<usize>,

    /// Keep only events within the first N milliseconds.
    #[arg(long, conflicts_with = "max_ticks")]
    max_ms: Option<u64>,

    /// JSON config file; explicit flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qr_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match run(cli.command) {
        Ok(()) => ExitCode::Ok,
        Err(e) => {
            error!(error = %e, code = e.code(), "replay failed");
            ExitCode::from_error(&e)
        }
    };
    std::process::exit(code.as_i32());
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Replay(args) => run_replay(args),
        Command::Schema => {
            let root = schemars::schema_for!(ReplayExport);
            println!("{}", serde_json::to_string_pretty(&root)?);
            Ok(())
        }
    }
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;
    let input = read_trace(&args.trace)?;

    let mut trace = parse_trace(&input, &cfg)?;
    trim_events(&mut trace.events, &args, &cfg);
    if trace.events.is_empty() {
        return Err(Error::EmptyTrace);
    }

    let snapshots = replay_queues(&trace.events, &trace.exits, cfg.max_frames);
    let ms_per_tick = trace.events.first().map_or(cfg.tick_ms, |e| e.ms);
    let timelines = aggregate_intervals(&trace.events, ms_per_tick);

    info!(
        events = trace.events.len(),
        snapshots = snapshots.len(),
        timelines = timelines.len(),
        "replay complete"
    );

    let export = ReplayExport::build(&cfg, trace, snapshots, timelines);
    if args.out == "-" {
        println!("{}", serde_json::to_string_pretty(&export)?);
    } else {
        let path = PathBuf::from(&args.out);
        export.save(&path)?;
        info!(path = %path.display(), "wrote export");
    }
    Ok(())
}

/// Resolution order: CLI flag, then config file, then built-in default.
fn resolve_config(args: &ReplayArgs) -> Result<ReplayConfig> {
    let mut cfg = match &args.config {
        Some(path) => ReplayConfig::from_file(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(mode) = args.mode {
        cfg.mode = mode;
    }
    if let Some(tick_ms) = args.tick_ms {
        cfg.tick_ms = tick_ms;
    }
    if let Some(max_frames) = args.max_frames {
        cfg.max_frames = max_frames;
    }
    Ok(cfg)
}

fn read_trace(source: &str) -> Result<String> {
    if source == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

/// Optional pre-replay trimming to a tick budget (directly, or via a
/// millisecond budget divided by the tick duration).
fn trim_events(events: &mut Vec<qr_core::TickEvent>, args: &ReplayArgs, cfg: &ReplayConfig) {
    let max_ticks = match (args.max_ticks, args.max_ms) {
        (Some(ticks), _) => Some(ticks),
        (None, Some(ms)) if cfg.tick_ms > 0 => Some((ms / cfg.tick_ms) as usize),
        _ => None,
    };
    if let Some(max_ticks) = max_ticks {
        if events.len() > max_ticks {
            events.truncate(max_ticks);
            info!(
                ticks = max_ticks,
                ms = max_ticks as u64 * cfg.tick_ms,
                "trimmed trace to leading events"
            );
        }
    }
}
