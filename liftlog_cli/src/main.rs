use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use liftlog::{
    load_raw_records, normalize, parse_entries, parse_raw_records, render_stats_text,
    render_summary_text, summarize, ReportParams, WorkoutEntry, WEIGHT_UNIT,
};
use serde_json::Value as JsonValue;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod chart;
mod glyphs;

use chart::{render_chart_guard, ChartKind};

const DEFAULT_LOG: &str = "data/workouts.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Workout log progress reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write report.png and summary.txt next to a workout log
    Report(ReportArgs),
    /// Print estimated one-rep maxes for every logged set
    Stats(LogArgs),
    /// Print the workout log as a numbered table
    View(LogArgs),
    /// Append a workout entry to a log
    Add(AddArgs),
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// JSON workout log
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Also write the chart as SVG to this path
    #[arg(long, value_hint = ValueHint::FilePath)]
    svg: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LogArgs {
    /// JSON workout log
    #[arg(long, default_value = DEFAULT_LOG, value_hint = ValueHint::FilePath)]
    data: PathBuf,
}

#[derive(Parser, Debug)]
struct AddArgs {
    /// Date of the set (YYYY-MM-DD)
    date: String,

    /// Exercise name, e.g. Squat
    exercise: String,

    /// Weight lifted
    weight: f64,

    /// Repetitions performed
    reps: u32,

    /// JSON workout log to append to
    #[arg(long, default_value = DEFAULT_LOG, value_hint = ValueHint::FilePath)]
    data: PathBuf,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Stats(args) => handle_stats(args),
        Command::View(args) => handle_view(args),
        Command::Add(args) => handle_add(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let params = ReportParams::default();

    let t_load = Instant::now();
    let raw = load_raw_records(&args.input)?;
    if raw.is_empty() {
        println!("No workouts yet.");
        return Ok(());
    }
    let log = normalize(&raw)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let summary = summarize(&log);
    debug!(
        "Load stage: {:.1} ms",
        t_load.elapsed().as_secs_f64() * 1000.0
    );
    info!(
        "Loaded {} entries across {} exercises",
        log.len(),
        log.exercises.len()
    );

    let (chart_path, summary_path) = params.output_paths(&args.input);

    let t_plot = Instant::now();
    render_chart_guard(&log, &chart_path, ChartKind::Png, &params)
        .with_context(|| format!("failed to render {}", chart_path.display()))?;
    debug!(
        "Plot stage: {:.1} ms",
        t_plot.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(svg_path) = args.svg.as_ref() {
        render_chart_guard(&log, svg_path, ChartKind::Svg, &params)
            .with_context(|| format!("failed to render {}", svg_path.display()))?;
        info!("Wrote SVG chart: {}", svg_path.display());
    }

    let text = render_summary_text(&summary, &params.unit);
    fs::write(&summary_path, text)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;

    println!("Report generated: {}", chart_path.display());
    println!("Summary generated: {}", summary_path.display());
    Ok(())
}

fn handle_stats(args: LogArgs) -> Result<()> {
    if !args.data.exists() {
        println!("No workouts yet. Add some first!");
        return Ok(());
    }
    let raw = load_raw_records(&args.data)?;
    if raw.is_empty() {
        println!("No workouts yet. Add some first!");
        return Ok(());
    }
    let log = normalize(&raw)
        .with_context(|| format!("failed to parse {}", args.data.display()))?;
    let entries = parse_entries(&raw)
        .with_context(|| format!("failed to parse {}", args.data.display()))?;
    let summary = summarize(&log);
    print!("{}", render_stats_text(&entries, &summary, WEIGHT_UNIT));
    Ok(())
}

fn handle_view(args: LogArgs) -> Result<()> {
    if !args.data.exists() {
        println!("No workouts logged yet. Add some first!");
        return Ok(());
    }
    let raw = load_raw_records(&args.data)?;
    if raw.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }
    let entries = parse_entries(&raw)
        .with_context(|| format!("failed to parse {}", args.data.display()))?;

    let mut table = String::from("Your Training Log:\n");
    for (i, r) in entries.iter().enumerate() {
        table.push_str(&format!(
            "{:>3} | {} | {:<12} | {:.1} {} x {} reps\n",
            i + 1,
            r.date,
            r.exercise,
            r.weight,
            WEIGHT_UNIT,
            r.reps
        ));
    }
    print!("{}", table);
    Ok(())
}

fn handle_add(args: AddArgs) -> Result<()> {
    let entry = WorkoutEntry::new(&args.date, &args.exercise, args.weight, args.reps)?;

    if let Some(dir) = args.data.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
    }

    let mut entries = read_existing_entries(&args.data)?;
    entries.push(serde_json::to_value(&entry)?);

    let text = serde_json::to_string_pretty(&entries)?;
    fs::write(&args.data, text)
        .with_context(|| format!("failed to write {}", args.data.display()))?;
    debug!("{} now holds {} entries", args.data.display(), entries.len());

    println!(
        "Added: {} - {} @ {:.1} {} x {} reps",
        entry.date, entry.exercise, entry.weight, WEIGHT_UNIT, entry.reps
    );
    Ok(())
}

/// Existing entries kept as raw JSON so fields this tool does not know survive a rewrite.
fn read_existing_entries(path: &Path) -> Result<Vec<JsonValue>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    parse_raw_records(&data).with_context(|| format!("failed to parse {}", path.display()))
}
