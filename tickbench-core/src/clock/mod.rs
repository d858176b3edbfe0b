// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Clock source adapters.
//!
//! Wraps each available timing primitive behind a uniform capture/difference
//! contract so the trial sampler and report aggregator can treat them alike:
//!
//! | Label | Primitive                        | Native representation     |
//! |-------|----------------------------------|---------------------------|
//! | RGET  | `clock_gettime(CLOCK_REALTIME)`  | seconds + nanoseconds     |
//! | MGET  | `clock_gettime(CLOCK_MONOTONIC)` | seconds + nanoseconds     |
//! | TOD   | `gettimeofday`                   | seconds + microseconds    |
//! | SYSC  | `std::time::SystemTime`          | runtime wall-clock point  |
//! | STDC  | `std::time::Instant`             | runtime monotonic point   |
//! | MACH  | hardware tick counter            | nanoseconds since counter |
//!
//! A capture that fails at the OS level is fatal: without it no timing data
//! can be produced. A negative raw difference signals a clock-source defect
//! and is surfaced as [`ClockError::NegativeElapsed`], never wrapped.

pub mod ticks;

use std::time::{Instant, SystemTime};

use nix::time::{clock_gettime, ClockId};

use crate::error::ClockError;

const NANOS_PER_SEC: i128 = 1_000_000_000;
const NANOS_PER_MICRO: i128 = 1_000;
const MICROS_PER_SEC: i64 = 1_000_000;

/// A timing primitive that can capture an instant and subtract two of them.
///
/// `Sample` is the source's native representation; it is opaque to callers
/// and immutable once captured. `elapsed_ns` carries the source-specific
/// subtraction semantics (borrow normalization, duration casts, plain
/// unsigned subtraction).
pub trait ClockSource {
    type Sample: Copy;

    /// Column header for this source in the comparison report.
    fn label(&self) -> &'static str;

    /// Capture the current instant in the source's native representation.
    fn capture(&self) -> Result<Self::Sample, ClockError>;

    /// Nanoseconds elapsed between two same-source samples.
    fn elapsed_ns(&self, start: Self::Sample, end: Self::Sample) -> Result<u64, ClockError>;
}

/// Seconds + nanoseconds, as returned by `clock_gettime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimespecSample {
    pub sec: i64,
    pub nsec: i64,
}

/// Seconds + microseconds, as returned by `gettimeofday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimevalSample {
    pub sec: i64,
    pub usec: i64,
}

fn capture_timespec(id: ClockId, syscall: &'static str) -> Result<TimespecSample, ClockError> {
    let ts = clock_gettime(id).map_err(|e| ClockError::Syscall {
        syscall,
        message: e.to_string(),
    })?;
    Ok(TimespecSample {
        sec: ts.tv_sec() as i64,
        nsec: ts.tv_nsec() as i64,
    })
}

/// Signed subtraction of two timespec samples, checked against going negative.
fn timespec_elapsed_ns(
    label: &'static str,
    start: TimespecSample,
    end: TimespecSample,
) -> Result<u64, ClockError> {
    let raw = (end.sec as i128 - start.sec as i128) * NANOS_PER_SEC
        + (end.nsec as i128 - start.nsec as i128);
    if raw < 0 {
        return Err(ClockError::NegativeElapsed {
            clock_source: label,
            raw_ns: raw,
        });
    }
    Ok(raw as u64)
}

/// Wall clock with nanosecond resolution (`CLOCK_REALTIME`).
pub struct RealtimeClock;

impl ClockSource for RealtimeClock {
    type Sample = TimespecSample;

    fn label(&self) -> &'static str {
        "RGET"
    }

    fn capture(&self) -> Result<Self::Sample, ClockError> {
        capture_timespec(ClockId::CLOCK_REALTIME, "clock_gettime(CLOCK_REALTIME)")
    }

    fn elapsed_ns(&self, start: Self::Sample, end: Self::Sample) -> Result<u64, ClockError> {
        timespec_elapsed_ns(self.label(), start, end)
    }
}

/// Monotonic clock with nanosecond resolution (`CLOCK_MONOTONIC`).
pub struct MonotonicClock;

impl ClockSource for MonotonicClock {
    type Sample = TimespecSample;

    fn label(&self) -> &'static str {
        "MGET"
    }

    fn capture(&self) -> Result<Self::Sample, ClockError> {
        capture_timespec(ClockId::CLOCK_MONOTONIC, "clock_gettime(CLOCK_MONOTONIC)")
    }

    fn elapsed_ns(&self, start: Self::Sample, end: Self::Sample) -> Result<u64, ClockError> {
        timespec_elapsed_ns(self.label(), start, end)
    }
}

/// Coarse wall clock with microsecond resolution (`gettimeofday`).
pub struct TimeOfDayClock;

impl ClockSource for TimeOfDayClock {
    type Sample = TimevalSample;

    fn label(&self) -> &'static str {
        "TOD"
    }

    fn capture(&self) -> Result<Self::Sample, ClockError> {
        let mut tv = libc::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: tv is a valid, writable timeval; a null timezone is
        // specified behavior for gettimeofday.
        let rc = unsafe { libc::gettimeofday(&mut tv, std::ptr::null_mut()) };
        if rc != 0 {
            return Err(ClockError::Syscall {
                syscall: "gettimeofday",
                message: std::io::Error::last_os_error().to_string(),
            });
        }
        Ok(TimevalSample {
            sec: tv.tv_sec as i64,
            usec: tv.tv_usec as i64,
        })
    }

    fn elapsed_ns(&self, start: Self::Sample, end: Self::Sample) -> Result<u64, ClockError> {
        let mut sec = end.sec - start.sec;
        let mut usec = end.usec - start.usec;
        // Borrow-normalize a negative microsecond delta before converting.
        if usec < 0 {
            sec -= 1;
            usec += MICROS_PER_SEC;
        }
        let raw = sec as i128 * NANOS_PER_SEC + usec as i128 * NANOS_PER_MICRO;
        if raw < 0 {
            return Err(ClockError::NegativeElapsed {
                clock_source: self.label(),
                raw_ns: raw,
            });
        }
        Ok(raw as u64)
    }
}

/// Runtime wall-clock abstraction (`std::time::SystemTime`).
pub struct SystemClock;

impl ClockSource for SystemClock {
    type Sample = SystemTime;

    fn label(&self) -> &'static str {
        "SYSC"
    }

    fn capture(&self) -> Result<Self::Sample, ClockError> {
        Ok(SystemTime::now())
    }

    fn elapsed_ns(&self, start: Self::Sample, end: Self::Sample) -> Result<u64, ClockError> {
        match end.duration_since(start) {
            Ok(d) => Ok(d.as_nanos() as u64),
            // The wall clock stepped backwards between captures.
            Err(e) => Err(ClockError::NegativeElapsed {
                clock_source: self.label(),
                raw_ns: -(e.duration().as_nanos() as i128),
            }),
        }
    }
}

/// Runtime monotonic abstraction (`std::time::Instant`).
pub struct SteadyClock;

impl ClockSource for SteadyClock {
    type Sample = Instant;

    fn label(&self) -> &'static str {
        "STDC"
    }

    fn capture(&self) -> Result<Self::Sample, ClockError> {
        Ok(Instant::now())
    }

    fn elapsed_ns(&self, start: Self::Sample, end: Self::Sample) -> Result<u64, ClockError> {
        match end.checked_duration_since(start) {
            Some(d) => Ok(d.as_nanos() as u64),
            None => {
                let backwards = start
                    .checked_duration_since(end)
                    .map(|d| d.as_nanos() as i128)
                    .unwrap_or(0);
                Err(ClockError::NegativeElapsed {
                    clock_source: self.label(),
                    raw_ns: -backwards,
                })
            }
        }
    }
}

/// Hardware tick counter, scaled to nanoseconds at capture time.
///
/// Samples are already nanosecond counts, so the difference is plain
/// unsigned subtraction (checked for underflow).
pub struct TickClock;

impl ClockSource for TickClock {
    type Sample = u64;

    fn label(&self) -> &'static str {
        "MACH"
    }

    fn capture(&self) -> Result<Self::Sample, ClockError> {
        Ok(ticks::now_ns())
    }

    fn elapsed_ns(&self, start: Self::Sample, end: Self::Sample) -> Result<u64, ClockError> {
        end.checked_sub(start).ok_or(ClockError::NegativeElapsed {
            clock_source: self.label(),
            raw_ns: end as i128 - start as i128,
        })
    }
}
