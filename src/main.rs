use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use ms_etitj::error::EstimateError;
use ms_etitj::estimate::{Mode, estimate_mode};
use ms_etitj::io::{Layout, read_ms_trees, write_estimate_to};
use ms_etitj::logger::MinimalLogger;
use std::path::PathBuf;
use std::time::Instant;

/// Estimate E(T_iT_j), the expected product of inter-coalescence intervals,
/// from the trees of an ms run (`ms <n> <reps> -T`).
#[derive(Parser, Debug)]
#[command(name = "ms-etitj", version, about = "E(T_iT_j) estimates from ms coalescent trees")]
struct Args {
    /// Path to ms output (optionally .gz)
    input: PathBuf,

    /// Estimate to compute: scalar | matrix
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = ModeArg::Matrix)]
    mode: ModeArg,

    /// Output path, `-` for stdout; a `.gz` suffix compresses the output
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Matrix layout: list (one value per line) | table (labeled TSV)
    #[arg(long = "layout", value_enum, default_value_t = LayoutArg::List)]
    layout: LayoutArg,

    /// Parse and traverse trees on all cores
    #[arg(short = 'p', long = "parallel", default_value_t = false)]
    parallel: bool,

    /// Quiet mode: only warnings and errors on stderr
    #[arg(short = 'q', long = "quiet", default_value_t = false)]
    quiet: bool,

    /// Verbose mode: debug messages on stderr
    #[arg(short = 'v', long = "verbose", default_value_t = false, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg { Scalar, Matrix }

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LayoutArg { List, Table }

fn main() {
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::Warn
    } else if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    MinimalLogger::init(level);

    if let Err(e) = run(&args) {
        eprintln!("{e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn run(args: &Args) -> Result<()> {
    let t0 = Instant::now();
    let trees = read_ms_trees(&args.input)
        .with_context(|| format!("Failed to read {:?}", args.input))?;
    if trees.is_empty() {
        log::warn!("No trees found after the '//' separator in {:?}", args.input);
    }
    log::info!("Read {} trees in {:.3}s", trees.len(), t0.elapsed().as_secs_f64());

    let mode = match args.mode {
        ModeArg::Scalar => Mode::Scalar,
        ModeArg::Matrix => Mode::Matrix,
    };
    let t1 = Instant::now();
    let estimate = estimate_mode(&trees, mode, args.parallel)?;
    log::info!("Estimated {mode:?} E(T_iT_j) in {:.3}s", t1.elapsed().as_secs_f64());

    let layout = match args.layout {
        LayoutArg::List => Layout::List,
        LayoutArg::Table => Layout::Table,
    };
    write_estimate_to(args.output.as_deref(), &estimate, layout)
        .with_context(|| format!("Failed to write output {:?}", args.output))?;
    Ok(())
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<EstimateError>() {
        Some(EstimateError::TimeConsistency { .. }) => 1,
        Some(EstimateError::Io(_)) => 3,
        Some(_) => 2,
        None if e.downcast_ref::<std::io::Error>().is_some() => 3,
        None => 4,
    }
}
