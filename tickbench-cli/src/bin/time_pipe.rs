//! Pipe transfer latency harness.
//!
//! Forks a child that writes N bytes through an anonymous pipe while the
//! parent reads until end-of-stream; each side times its own transfer with
//! the hardware tick counter and appends one line to its role's log
//! (`write.out` / `read.out` in the working directory).

use std::process::ExitCode;

use clap::Parser;

use tickbench_core::{parse_size, pipe};

/// Measure one-shot pipe transfer latency between a parent and child process.
#[derive(Parser)]
#[command(name = "time_pipe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transfer size, a decimal integer with optional k/m/g suffix
    /// (multiplies by 1024, 1024^2, 1024^3). Defaults to 4 bytes.
    size: Option<String>,
}

fn main() -> ExitCode {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Argument errors exit with code 1 (not clap's usage code), before any
    // pipe or log entry exists; --help and --version still exit 0.
    let args = match Args::try_parse() {
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

    let bytes = match args.size {
        Some(spec) => match parse_size(&spec) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => pipe::DEFAULT_TRANSFER_BYTES,
    };

    match pipe::run(bytes) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
