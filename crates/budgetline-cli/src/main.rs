//! Adjust recorded consumption bundles so each lies on its budget line.

mod io;

use std::fs;
use std::path::PathBuf;

use budgetline_core::{adjust_dataset, AdjustSummary, SchemaError};
use clap::Parser;
use log::LevelFilter;

use crate::io::{read_dataset, write_dataset, DatasetIoError, RunReport};

/// Snap observed consumption bundles onto their reported budget lines.
///
/// Reads a CSV of observations, replaces each bundle with the closest point
/// on the feasible segment of its budget line, and writes the augmented
/// table. Summary statistics go to stdout.
#[derive(Parser, Debug)]
#[command(name = "budgetline", version)]
struct Cli {
    /// Path to the source CSV.
    #[arg(long, default_value = "data/Halevy et al (2016) - Data.csv")]
    input: PathBuf,

    /// Where to write the adjusted CSV.
    #[arg(long, default_value = "data/Halevy_Data_adjusted.csv")]
    output: PathBuf,

    /// Optional JSON run report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (repeat for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Io(#[from] DatasetIoError),
    #[error(transparent)]
    Fs(#[from] std::io::Error),
}

/// Threading knobs honored by numeric backends commonly linked into
/// scientific binaries. Values already present in the environment win.
const THREAD_ENV_VARS: [&str; 3] = [
    "OPENBLAS_NUM_THREADS",
    "OMP_NUM_THREADS",
    "RAYON_NUM_THREADS",
];

fn pin_numeric_threads() {
    for name in THREAD_ENV_VARS {
        if std::env::var_os(name).is_none() {
            std::env::set_var(name, "1");
        }
    }
}

fn main() {
    // Pin before anything can spawn a thread pool.
    pin_numeric_threads();

    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = budgetline_core::init_with_level(level);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let dataset = read_dataset(&cli.input)?;
    log::debug!(
        "read {} rows from {}",
        dataset.rows.len(),
        cli.input.display()
    );

    let adjusted = adjust_dataset(&dataset)?;

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_dataset(&cli.output, &adjusted.dataset)?;

    print_summary(&adjusted.summary, cli);

    if let Some(report_path) = &cli.report {
        if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let report = RunReport {
            input: cli.input.display().to_string(),
            output: cli.output.display().to_string(),
            summary: adjusted.summary,
        };
        report.write_json(report_path)?;
        log::debug!("wrote run report to {}", report_path.display());
    }

    Ok(())
}

fn print_summary(summary: &AdjustSummary, cli: &Cli) {
    println!("Wrote {} rows to {}", summary.rows, cli.output.display());
    println!("max abs_delta={:.10}", summary.max_abs_delta);
    println!("mean abs_delta={:.10}", summary.mean_abs_delta);
    println!(
        "income_after range=[{:.16}, {:.16}]",
        summary.income_after_min, summary.income_after_max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_only_unset_thread_vars() {
        std::env::set_var("OMP_NUM_THREADS", "4");
        std::env::remove_var("RAYON_NUM_THREADS");

        pin_numeric_threads();

        assert_eq!(std::env::var("OMP_NUM_THREADS").unwrap(), "4");
        assert_eq!(std::env::var("RAYON_NUM_THREADS").unwrap(), "1");
    }
}
