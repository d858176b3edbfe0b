//! Clock comparison harness.
//!
//! Samples every available timing primitive sequentially - 100 trials per
//! source, each bracketing a 5 second sleep - and prints a fixed-width
//! table of per-trial elapsed nanoseconds with a final `AVG:` row.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use tickbench_core::{
    run_trials, BenchResult, ClockSource, Column, MonotonicClock, RealtimeClock, Report,
    SteadyClock, SystemClock, TickClock, TimeOfDayClock, TRIAL_COUNT, TRIAL_PAUSE,
};

/// Compare the overhead and precision of the available timing primitives.
#[derive(Parser)]
#[command(name = "clocks")]
#[command(author, version, about, long_about = None)]
struct Args {}

fn main() -> ExitCode {
    // Default to warn so the report is the only thing on stdout.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Argument errors exit with code 1, same as the pipe harness; --help
    // and --version still exit 0.
    let _ = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> BenchResult<()> {
    let mut report = Report::new();
    // Strictly sequential: overlapping sleeps would contaminate each
    // source's figures with contention from the other timers.
    report.push(sample_column(&RealtimeClock)?);
    report.push(sample_column(&MonotonicClock)?);
    report.push(sample_column(&TimeOfDayClock)?);
    report.push(sample_column(&SystemClock)?);
    report.push(sample_column(&SteadyClock)?);
    report.push(sample_column(&TickClock)?);

    report.render(&mut io::stdout().lock())?;
    Ok(())
}

fn sample_column<C: ClockSource>(clock: &C) -> BenchResult<Column> {
    tracing::debug!(source = clock.label(), "sampling clock source");
    let trials = run_trials(clock, TRIAL_COUNT, TRIAL_PAUSE)?;
    let elapsed = trials.elapsed(clock)?;
    Ok(Column::new(clock.label(), elapsed))
}
