//! insert-nones - Add synthetic "none" symbols to sheet annotations
//!
//! Reads one or more JSON annotation files, inserts negative samples at random
//! free locations of each sheet and writes the augmented annotations.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use nonesynth_core::{
    IgnoredShapes, NonesConfig, Placement, PlacementStatus, SheetAnnotations, augment,
};

/// Insert "none" symbols into sheet annotation files.
#[derive(Parser, Debug)]
#[command(name = "insert-nones")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more JSON annotation files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Seed for reproducible runs (each sheet derives its own generator)
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Number of none symbols per sheet (default: ratio * valid symbols)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Ratio of none symbols versus valid symbols found in sheet
    #[arg(short = 'r', long)]
    ratio: Option<f64>,

    /// Additional shape to ignore (may be repeated)
    #[arg(short = 'i', long = "ignore")]
    ignore: Vec<String>,

    /// Directory to write augmented files to (stdout if not given)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<(NonesConfig, IgnoredShapes)> {
    let mut config = match &args.config {
        Some(path) => NonesConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => NonesConfig::default(),
    };
    if let Some(ratio) = args.ratio {
        config.params.none_ratio = ratio;
    }
    config.ignored_shapes.extend(args.ignore.iter().cloned());
    let policy = config.ignore_policy();
    Ok((config, policy))
}

fn page_rng(seed: Option<u64>, position: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(position as u64)),
        None => StdRng::from_entropy(),
    }
}

fn process_file(
    path: &Path,
    position: usize,
    args: &Args,
    config: &NonesConfig,
    policy: &IgnoredShapes,
) -> Result<(SheetAnnotations, Placement)> {
    let sheet = SheetAnnotations::load(path)
        .with_context(|| format!("failed to read annotations {}", path.display()))?;
    augment(
        &sheet,
        policy,
        &config.params,
        args.count,
        &mut page_rng(args.seed, position),
    )
    .with_context(|| format!("cannot augment {}", path.display()))
}

fn report(path: &Path, placement: &Placement) {
    match placement.status {
        PlacementStatus::Complete => info!(
            "{}: inserted {} none symbols",
            path.display(),
            placement.len()
        ),
        PlacementStatus::Partial => warn!(
            "{}: inserted {} of {} none symbols after {} attempts",
            path.display(),
            placement.len(),
            placement.requested,
            placement.attempts
        ),
        PlacementStatus::MixedInterlines { first, other } => warn!(
            "{}: sheet has several interline values ({} and {}), skipped",
            path.display(),
            first,
            other
        ),
        PlacementStatus::OversizedMargins { x, y } => warn!(
            "{}: margins {}x{} do not fit in the sheet, skipped",
            path.display(),
            x,
            y
        ),
    }
}

fn write_output(path: &Path, sheet: &SheetAnnotations, output_dir: Option<&Path>) -> Result<()> {
    let json = sheet.to_json_string()?;
    match output_dir {
        Some(dir) => {
            let name = path
                .file_name()
                .with_context(|| format!("no file name in {}", path.display()))?;
            let target = dir.join(name);
            fs::write(&target, json)
                .with_context(|| format!("failed to write {}", target.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run(args: &Args) -> Result<bool> {
    let (config, policy) = load_config(args)?;

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    // Sheets are independent: each one gets its own generator.
    let results: Vec<Result<(SheetAnnotations, Placement)>> = args
        .files
        .par_iter()
        .enumerate()
        .map(|(position, path)| process_file(path, position, args, &config, &policy))
        .collect();

    let mut ok = true;
    for (path, result) in args.files.iter().zip(results) {
        let written = result.and_then(|(sheet, placement)| {
            report(path, &placement);
            write_output(path, &sheet, args.output_dir.as_deref())
        });
        if let Err(e) = written {
            error!("{:#}", e);
            ok = false;
        }
    }
    Ok(ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
