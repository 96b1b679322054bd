use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use plate_annotator::charmap::{self, CharmapError};
use plate_annotator::config::{ConfigError, EngineConfig};
use plate_annotator::engine::Annotator;
use plate_annotator::label::LabelBox;
use plate_annotator::overlap::Overlap;
use plate_annotator::yolo::{self, ParseError};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot assign plate text: {0}")]
    Charmap(#[from] CharmapError),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "plate-labels", about = "Inspect, order and check plate character label files")]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Vertical overlap ratio that joins a box to a plate (overrides ANNOTATOR_GROUP_OVERLAP).
    #[arg(long, global = true)]
    group_overlap: Option<f64>,

    /// Area overlap ratio above which two boxes are duplicates (overrides ANNOTATOR_MAX_OVERLAP).
    #[arg(long, global = true)]
    max_overlap: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print boxes in reading order, grouped by plate.
    Show(FileArgs),
    /// Rewrite a label file in reading order.
    Sort(WriteArgs),
    /// List overlapping box pairs; exits with status 1 if any are found.
    Check(FileArgs),
    /// Assign class ids from typed plate text, one character per box.
    Assign(AssignArgs),
}

#[derive(Args, Debug)]
struct FileArgs {
    file: PathBuf,
}

#[derive(Args, Debug)]
struct WriteArgs {
    file: PathBuf,

    /// Write the result back to the file instead of printing it.
    #[arg(long, default_value_t = false)]
    write: bool,
}

#[derive(Args, Debug)]
struct AssignArgs {
    file: PathBuf,

    #[arg(long)]
    text: String,

    /// Write the result back to the file instead of printing it.
    #[arg(long, default_value_t = false)]
    write: bool,
}

#[derive(Debug, Serialize)]
struct PlateReport {
    plate: usize,
    text: String,
    boxes: Vec<LabelBox>,
}

#[derive(Debug, Serialize)]
struct ShowReport {
    file: PathBuf,
    plates: Vec<PlateReport>,
    parse_errors: Vec<ParseError>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    file: PathBuf,
    overlaps: Vec<Overlap>,
    parse_errors: Vec<ParseError>,
}

#[derive(Debug, Serialize)]
struct WriteReport {
    file: PathBuf,
    boxes: usize,
    plates: usize,
    written: bool,
    parse_errors: Vec<ParseError>,
}

fn main() -> Result<ExitCode, CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    match cli.command {
        Command::Show(args) => run_show(&args.file, config, cli.json),
        Command::Sort(args) => run_sort(&args, config, cli.json),
        Command::Check(args) => run_check(&args.file, config, cli.json),
        Command::Assign(args) => run_assign(&args, config, cli.json),
    }
}

fn build_config(cli: &Cli) -> Result<EngineConfig, CliError> {
    let mut config = EngineConfig::from_env()?;
    if let Some(ratio) = cli.group_overlap {
        config.group_overlap_ratio = ratio;
    }
    if let Some(ratio) = cli.max_overlap {
        config.max_overlap_ratio = ratio;
    }
    Ok(config.validate()?)
}

/// Parse a label file into an engine. Malformed lines are reported, not fatal.
fn load(path: &Path, config: EngineConfig) -> Result<(Annotator, Vec<ParseError>), CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })?;
    let parsed = yolo::parse_labels(&text);
    let mut engine = Annotator::with_config(config)?;
    engine.load_labels(parsed.boxes);
    Ok((engine, parsed.errors))
}

fn run_show(path: &Path, config: EngineConfig, json: bool) -> Result<ExitCode, CliError> {
    let (mut engine, parse_errors) = load(path, config)?;
    engine.sort_and_group();
    let report = ShowReport { file: path.to_owned(), plates: plate_reports(&engine.plates()), parse_errors };
    if json {
        print_json(&report)?;
    } else {
        print!("{}", render_show(&report));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_sort(args: &WriteArgs, config: EngineConfig, json: bool) -> Result<ExitCode, CliError> {
    let (mut engine, parse_errors) = load(&args.file, config)?;
    let plates = engine.sort_and_group();
    emit_labels(&args.file, &engine, plates, args.write, json, parse_errors)
}

fn run_check(path: &Path, config: EngineConfig, json: bool) -> Result<ExitCode, CliError> {
    let (engine, parse_errors) = load(path, config)?;
    let report = CheckReport { file: path.to_owned(), overlaps: engine.find_overlaps(), parse_errors };
    if json {
        print_json(&report)?;
    } else {
        print!("{}", render_check(&report, engine.labels()));
    }
    Ok(if report.overlaps.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn run_assign(args: &AssignArgs, config: EngineConfig, json: bool) -> Result<ExitCode, CliError> {
    let (mut engine, parse_errors) = load(&args.file, config)?;
    engine.assign_plate_text(&args.text)?;
    let plates = engine.sort_and_group();
    emit_labels(&args.file, &engine, plates, args.write, json, parse_errors)
}

fn emit_labels(
    path: &Path,
    engine: &Annotator,
    plates: usize,
    write: bool,
    json: bool,
    parse_errors: Vec<ParseError>,
) -> Result<ExitCode, CliError> {
    let text = yolo::format_labels(engine.labels());
    if write {
        if !parse_errors.is_empty() {
            warn!(path = %path.display(), dropped = parse_errors.len(), "malformed lines will not be written back");
        }
        fs::write(path, &text).map_err(|source| CliError::Write { path: path.to_owned(), source })?;
        info!(path = %path.display(), boxes = engine.labels().len(), plates, "label file written");
    }
    if json {
        print_json(&WriteReport {
            file: path.to_owned(),
            boxes: engine.labels().len(),
            plates,
            written: write,
            parse_errors,
        })?;
    } else if !write {
        print!("{text}");
    }
    Ok(ExitCode::SUCCESS)
}

/// One report per sorted plate, each with its text.
fn plate_reports(plates: &[&[LabelBox]]) -> Vec<PlateReport> {
    plates
        .iter()
        .enumerate()
        .map(|(plate, members)| PlateReport { plate, text: charmap::plate_text(members), boxes: members.to_vec() })
        .collect()
}

fn render_show(report: &ShowReport) -> String {
    let mut out = String::new();
    for plate in &report.plates {
        out.push_str(&format!("plate {}: {} ({} boxes)\n", plate.plate + 1, plate.text, plate.boxes.len()));
        for label in &plate.boxes {
            out.push_str(&format!(
                "  [{}] {} cx={:.4} cy={:.4} w={:.4} h={:.4}\n",
                label.line_index.unwrap_or_default(),
                label.class_id,
                label.cx,
                label.cy,
                label.w,
                label.h
            ));
        }
    }
    if report.plates.is_empty() {
        out.push_str("no boxes\n");
    }
    out
}

fn render_check(report: &CheckReport, boxes: &[LabelBox]) -> String {
    if report.overlaps.is_empty() {
        return "no overlapping boxes\n".to_owned();
    }
    let class = |index: usize| boxes.get(index).map_or(String::from("?"), |b| b.class_id.to_string());
    report
        .overlaps
        .iter()
        .map(|o| {
            format!(
                "box {} (class {}) overlaps box {} (class {}): {:.0}%\n",
                o.first + 1,
                class(o.first),
                o.second + 1,
                class(o.second),
                o.ratio * 100.0
            )
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
