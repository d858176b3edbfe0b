// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Append-only transfer logs.
//!
//! Each pipe benchmark run appends exactly one `<pid>: <bytes> | <ns>` line
//! to a per-role log file in the working directory. The files accumulate
//! across invocations and are never truncated; comparative analysis happens
//! out-of-band.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;

use crate::error::TransferLogError;

/// Which side of the pipe a process played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Writer,
    Reader,
}

impl Role {
    /// Log file for this role, relative to the working directory.
    pub fn log_file(&self) -> &'static str {
        match self {
            Role::Writer => "write.out",
            Role::Reader => "read.out",
        }
    }

    /// Console stream used when the log file cannot be opened.
    ///
    /// The asymmetry is deliberate: each role falls back to the console
    /// stream it already owns for results - the writer keeps stderr
    /// reserved for diagnostics, while the reader reports on stderr so its
    /// line never mixes into the parent shell's stdout.
    fn fallback(&self) -> Box<dyn Write> {
        match self {
            Role::Writer => Box::new(io::stdout()),
            Role::Reader => Box::new(io::stderr()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Writer => write!(f, "writer"),
            Role::Reader => write!(f, "reader"),
        }
    }
}

/// One timed transfer by one process. Created once per run, appended to the
/// role's log, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    pub role: Role,
    pub pid: u32,
    pub bytes_requested: u64,
    pub elapsed_ns: u64,
}

impl fmt::Display for TransferRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} | {}",
            self.pid, self.bytes_requested, self.elapsed_ns
        )
    }
}

/// Append one record line to the role's log in the working directory.
pub fn append(record: &TransferRecord) -> Result<(), TransferLogError> {
    append_in(Path::new("."), record)
}

/// Append one record line to the role's log under `dir`.
///
/// If the log file cannot be opened the line goes to the role's fallback
/// console stream instead; only a failed write to the chosen sink is an
/// error.
pub fn append_in(dir: &Path, record: &TransferRecord) -> Result<(), TransferLogError> {
    let path = dir.join(record.role.log_file());
    match OpenOptions::new().append(true).create(true).open(&path) {
        Ok(mut file) => writeln!(file, "{}", record)?,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "transfer log unavailable, writing record to console"
            );
            writeln!(record.role.fallback(), "{}", record)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(role: Role, pid: u32, bytes: u64, ns: u64) -> TransferRecord {
        TransferRecord {
            role,
            pid,
            bytes_requested: bytes,
            elapsed_ns: ns,
        }
    }

    #[test]
    fn test_record_line_format() {
        let rec = record(Role::Writer, 4242, 2048, 987_654);
        assert_eq!(rec.to_string(), "4242: 2048 | 987654");
    }

    #[test]
    fn test_append_creates_and_accumulates() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        append_in(dir.path(), &record(Role::Reader, 1, 4, 100)).unwrap();
        append_in(dir.path(), &record(Role::Reader, 2, 4096, 200)).unwrap();

        let contents = fs::read_to_string(dir.path().join("read.out")).unwrap();
        assert_eq!(contents, "1: 4 | 100\n2: 4096 | 200\n");
    }

    #[test]
    fn test_roles_use_separate_files() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        append_in(dir.path(), &record(Role::Writer, 7, 4, 1)).unwrap();
        append_in(dir.path(), &record(Role::Reader, 8, 4, 2)).unwrap();

        assert!(dir.path().join("write.out").exists());
        assert!(dir.path().join("read.out").exists());
    }

    #[test]
    fn test_unopenable_log_falls_back_to_console() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        // A directory named like the log file makes the open fail.
        fs::create_dir(dir.path().join("write.out")).unwrap();

        let result = append_in(dir.path(), &record(Role::Writer, 9, 4, 3));
        assert!(result.is_ok());
    }
}
