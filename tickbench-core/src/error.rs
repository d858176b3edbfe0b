// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for tickbench.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.
//!
//! There is no recovery tier anywhere in this crate: any anomaly invalidates
//! the timing run, so every error is terminal for the process that hits it.

use std::io;

use thiserror::Error;

/// Top-level error type for the benchmark harnesses.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),

    #[error("Size specifier error: {0}")]
    SizeSpec(#[from] SizeSpecError),

    #[error("Pipe error: {0}")]
    Pipe(#[from] PipeError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Transfer log error: {0}")]
    TransferLog(#[from] TransferLogError),
}

/// Clock source errors - a failed capture or a nonsensical difference.
///
/// Either one means no trustworthy timing data can be produced, so the
/// comparison tool aborts rather than emitting a skewed report.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("Clock syscall failed: {syscall} - {message}")]
    Syscall {
        syscall: &'static str,
        message: String,
    },

    #[error("Clock source {clock_source} produced negative elapsed time ({raw_ns} ns)")]
    NegativeElapsed {
        clock_source: &'static str,
        raw_ns: i128,
    },
}

/// Transfer-size argument errors. Reported before any pipe is created,
/// so a bad argument never leaves a partial log entry behind.
#[derive(Debug, Error)]
pub enum SizeSpecError {
    #[error("Empty size specifier")]
    Empty,

    #[error("Size specifier must start with a decimal integer: {input}")]
    MissingDigits { input: String },

    #[error("Unknown size suffix: {suffix:?} (expected k, m, or g)")]
    UnknownSuffix { suffix: String },

    #[error("Size specifier overflows 64 bits: {input}")]
    Overflow { input: String },
}

/// Pipe benchmark errors - resource acquisition and I/O failures.
/// Each variant that occurs after the fork carries the failing process id.
#[derive(Debug, Error)]
pub enum PipeError {
    #[error("Failed to create pipe: {0}")]
    Create(nix::Error),

    #[error("Fork failed: {0}")]
    Fork(nix::Error),

    #[error("({pid}) Failed to close pipe descriptor {fd}: {source}")]
    Close {
        pid: u32,
        fd: i32,
        source: nix::Error,
    },

    #[error("({pid}) Failed to write data to pipe: {source}")]
    Write { pid: u32, source: io::Error },

    #[error("({pid}) Short pipe write: {written} of {requested} bytes")]
    ShortWrite {
        pid: u32,
        requested: u64,
        written: u64,
    },

    #[error("({pid}) Failed to read pipe: {source}")]
    Read { pid: u32, source: io::Error },

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    Log(#[from] TransferLogError),
}

/// Report aggregation errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Column {label} has {len} trials, expected {expected}")]
    ColumnLengthMismatch {
        label: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Transfer log errors. Only a failed write to the chosen sink is an error;
/// a log file that cannot be opened falls back to the console instead.
#[derive(Debug, Error)]
pub enum TransferLogError {
    #[error("Failed to write transfer record: {0}")]
    Sink(#[from] io::Error),
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_elapsed_display() {
        let err = ClockError::NegativeElapsed {
            clock_source: "TOD",
            raw_ns: -1_500,
        };
        assert!(err.to_string().contains("TOD"));
        assert!(err.to_string().contains("-1500"));
    }

    #[test]
    fn test_error_chain() {
        let spec_err = SizeSpecError::UnknownSuffix {
            suffix: "x".to_string(),
        };
        let bench_err: BenchError = spec_err.into();
        assert!(matches!(bench_err, BenchError::SizeSpec(_)));
    }

    #[test]
    fn test_short_write_display() {
        let err = PipeError::ShortWrite {
            pid: 1234,
            requested: 4096,
            written: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("1234"));
        assert!(msg.contains("100 of 4096"));
    }
}
