//! workclaim: check a sudoku grid with a pool of claim-driven workers.
//!
//! ```bash
//! workclaim run grid.toml --threads 8 --increment 3 --lock spin
//! workclaim run grid.toml --json --output report.json
//! workclaim run grid.toml --distribution mixed
//! workclaim sequential grid.toml
//! workclaim compare grid.toml --threads 6
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use workclaim::observability::as_micros_f64;
use workclaim::sequential;
use workclaim::{Distribution, LockKind, RunFile, RunOverrides, Scheduler, Verdict};

#[derive(Parser, Debug)]
#[command(
    name = "workclaim",
    version,
    about = "Check a sudoku grid with claim-driven worker threads",
    long_about = "Workers contend for a spin or bounded-waiting lock, claim chunks of\n\
        rows, columns and subgrids, and check them outside the lock. The first\n\
        invalid unit cancels every worker."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON instead of the text transcript
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the concurrent check described by a TOML run file
    Run(RunArgs),

    /// Run the single-threaded reference check on the same grid
    Sequential(SequentialArgs),

    /// Time the sequential check against every distribution on the same grid
    Compare(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Path to the TOML run file
    file: PathBuf,

    /// Override the number of worker threads
    #[arg(long, short)]
    threads: Option<usize>,

    /// Override the number of units claimed per critical section
    #[arg(long, short)]
    increment: Option<usize>,

    /// Override the lock guarding the claim counter
    #[arg(long, value_enum)]
    lock: Option<LockKind>,

    /// Override how units are split between workers (ignored by `compare`)
    #[arg(long, short, value_enum)]
    distribution: Option<Distribution>,
}

#[derive(Args, Debug)]
struct SequentialArgs {
    /// Path to the TOML run file
    file: PathBuf,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli) -> Result<(), String> {
    let rendered = match &cli.command {
        Command::Run(args) => run(args, cli.json)?,
        Command::Sequential(args) => run_sequential(args, cli.json)?,
        Command::Compare(args) => compare(args, cli.json)?,
    };
    emit(cli.output.as_deref(), &rendered)
}

impl RunArgs {
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            threads: self.threads,
            task_increment: self.increment,
            lock: self.lock,
            distribution: self.distribution,
            ..RunOverrides::default()
        }
    }
}

fn run(args: &RunArgs, json: bool) -> Result<String, String> {
    let (config, grid) = RunFile::from_path(&args.file)
        .and_then(|file| file.resolve(&args.overrides()))
        .map_err(|e| e.to_string())?;

    let report = Scheduler::new(config, &grid)
        .and_then(Scheduler::run)
        .map_err(|e| e.to_string())?;

    if json {
        serde_json::to_string_pretty(&report).map_err(|e| e.to_string())
    } else {
        Ok(report.to_string())
    }
}

fn run_sequential(args: &SequentialArgs, json: bool) -> Result<String, String> {
    let (config, grid) = RunFile::from_path(&args.file)
        .and_then(|file| file.resolve(&RunOverrides::default()))
        .map_err(|e| e.to_string())?;

    let report = sequential::check_all(&grid, config.dimension);
    if json {
        return serde_json::to_string_pretty(&report).map_err(|e| e.to_string());
    }

    let mut out = String::new();
    if let Some((_, location)) = report.first_invalid {
        out.push_str(&format!("First invalid unit: {location}\n"));
    }
    out.push_str(if report.verdict.is_valid() {
        "Valid Sudoku\n"
    } else {
        "Invalid Sudoku\n"
    });
    out.push_str(&format!(
        "Time taken to check the validity of the Sudoku: {} microseconds\n",
        as_micros_f64(report.elapsed)
    ));
    Ok(out)
}

/// One line of the `compare` table.
#[derive(serde::Serialize)]
struct MethodTiming {
    method: &'static str,
    verdict: Verdict,
    elapsed_us: f64,
}

impl MethodTiming {
    fn new(method: &'static str, verdict: Verdict, elapsed: Duration) -> Self {
        Self {
            method,
            verdict,
            elapsed_us: as_micros_f64(elapsed),
        }
    }
}

fn compare(args: &RunArgs, json: bool) -> Result<String, String> {
    let (config, grid) = RunFile::from_path(&args.file)
        .and_then(|file| file.resolve(&args.overrides()))
        .map_err(|e| e.to_string())?;

    let reference = sequential::check_all(&grid, config.dimension);
    let mut timings = vec![MethodTiming::new(
        "sequential",
        reference.verdict,
        reference.elapsed,
    )];
    for distribution in Distribution::ALL {
        let report = Scheduler::new(config.with_distribution(distribution), &grid)
            .and_then(Scheduler::run)
            .map_err(|e| e.to_string())?;
        timings.push(MethodTiming::new(
            distribution.as_str(),
            report.verdict(),
            report.elapsed(),
        ));
    }

    if json {
        return serde_json::to_string_pretty(&timings).map_err(|e| e.to_string());
    }
    let blocks: Vec<String> = timings
        .iter()
        .map(|t| {
            format!(
                "{} method:\nValidation result: {}.\nThe total time taken is {:.2} microseconds.\n",
                t.method, t.verdict, t.elapsed_us
            )
        })
        .collect();
    Ok(blocks.join("\n"))
}

fn emit(path: Option<&Path>, rendered: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, rendered)
            .map_err(|e| format!("failed to write {}: {e}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| {
                    if rendered.ends_with('\n') {
                        Ok(())
                    } else {
                        stdout.write_all(b"\n")
                    }
                })
                .map_err(|e| e.to_string())
        }
    }
}
