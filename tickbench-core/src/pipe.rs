// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Pipe transfer benchmark.
//!
//! Times a one-shot byte transfer between a parent and a freshly forked
//! child over an anonymous pipe. The child writes the whole payload in a
//! single call; the parent reads until end-of-stream so its elapsed time
//! covers every partial read. Both sides time with the hardware tick
//! counter only, and each appends one record to its role's log.
//!
//! The pipe's blocking semantics are the only synchronization: a read
//! suspends until data or end-of-stream arrives, a write that exceeds the
//! kernel buffer suspends until space frees. A stuck counterpart therefore
//! blocks the other indefinitely; there is no timeout.

use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{IntoRawFd, OwnedFd, RawFd};
use std::process;

use nix::unistd::{self, ForkResult};
use tracing::debug;

use crate::clock::{ClockSource, TickClock};
use crate::error::PipeError;
use crate::translog::{self, Role, TransferRecord};

/// Transfer size when no argument is given.
pub const DEFAULT_TRANSFER_BYTES: u64 = 4;

/// Byte the writer's payload is filled with.
pub const FILL_BYTE: u8 = b'-';

/// Create the pipe, fork, and run both roles to completion.
///
/// Returns the reader's record in the parent. The child process never
/// returns: it runs the writer role, logs, and exits (0 on success, 1 on
/// any failure, reported on stderr).
pub fn run(bytes: u64) -> Result<TransferRecord, PipeError> {
    let (read_end, write_end) = unistd::pipe().map_err(PipeError::Create)?;
    debug!(bytes, "pipe created");

    // SAFETY: both processes are single-threaded; the child only touches
    // its own descriptors and exits without returning.
    match unsafe { unistd::fork() }.map_err(PipeError::Fork)? {
        ForkResult::Parent { child } => {
            debug!(child = child.as_raw(), "forked writer child");
            // Mandatory: with the write end still open here, the reader
            // would never observe end-of-stream.
            close_fd(write_end)?;
            let mut pipe = File::from(read_end);
            let (record, _total) = run_reader(&mut pipe, bytes)?;
            translog::append(&record)?;
            close_pipe(pipe)?;
            Ok(record)
        }
        ForkResult::Child => match writer_process(read_end, write_end, bytes) {
            Ok(()) => process::exit(0),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
    }
}

fn writer_process(read_end: OwnedFd, write_end: OwnedFd, bytes: u64) -> Result<(), PipeError> {
    close_fd(read_end)?;
    let mut pipe = File::from(write_end);
    let record = run_writer(&mut pipe, bytes)?;
    translog::append(&record)?;
    close_pipe(pipe)
}

/// Writer role: one timed write of exactly `bytes` payload bytes.
///
/// A short write is fatal, not retried - pipe writes below the kernel
/// buffer capacity are atomic, and a retry loop would no longer measure a
/// single write call.
pub fn run_writer(pipe: &mut File, bytes: u64) -> Result<TransferRecord, PipeError> {
    let pid = process::id();
    let payload = vec![FILL_BYTE; bytes as usize];
    let clock = TickClock;

    let start = clock.capture()?;
    let written = pipe
        .write(&payload)
        .map_err(|source| PipeError::Write { pid, source })? as u64;
    let end = clock.capture()?;

    if written != bytes {
        return Err(PipeError::ShortWrite {
            pid,
            requested: bytes,
            written,
        });
    }

    Ok(TransferRecord {
        role: Role::Writer,
        pid,
        bytes_requested: bytes,
        elapsed_ns: clock.elapsed_ns(start, end)?,
    })
}

/// Reader role: timed read loop until end-of-stream.
///
/// The end capture happens only after the zero-byte read, so the elapsed
/// time includes every partial read. Also returns the total byte count
/// accumulated across reads.
pub fn run_reader(pipe: &mut File, bytes: u64) -> Result<(TransferRecord, u64), PipeError> {
    let pid = process::id();
    let mut buf = vec![0u8; bytes as usize];
    let clock = TickClock;

    let start = clock.capture()?;
    let mut total = 0u64;
    loop {
        let n = pipe
            .read(&mut buf)
            .map_err(|source| PipeError::Read { pid, source })?;
        if n == 0 {
            // End-of-stream; a zero-capacity buffer reaches this
            // immediately, which is the defined behavior for a 0-byte run.
            break;
        }
        total += n as u64;
    }
    let end = clock.capture()?;

    let record = TransferRecord {
        role: Role::Reader,
        pid,
        bytes_requested: bytes,
        elapsed_ns: clock.elapsed_ns(start, end)?,
    };
    Ok((record, total))
}

/// Close a pipe descriptor, surfacing the failure with this process's id.
fn close_fd(fd: OwnedFd) -> Result<(), PipeError> {
    close_raw(fd.into_raw_fd())
}

fn close_pipe(pipe: File) -> Result<(), PipeError> {
    close_raw(pipe.into_raw_fd())
}

fn close_raw(fd: RawFd) -> Result<(), PipeError> {
    unistd::close(fd).map_err(|source| PipeError::Close {
        pid: process::id(),
        fd,
        source,
    })
}
