// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Hardware tick counter normalized to nanoseconds.
//!
//! Reads the free-running cycle counter (`rdtsc` on x86_64, `cntvct_el0` on
//! aarch64) and scales it to nanoseconds through a numerator/denominator
//! ratio. The ratio is computed exactly once per process, lazily on first
//! use, and never re-initialized; both harness processes inherit the same
//! first-use lifecycle. Architectures without an accessible counter fall
//! back to a monotonic process-relative nanosecond count (ratio 1/1).

use std::sync::OnceLock;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use tracing::debug;

/// Tick-to-nanosecond conversion ratio: `ns = ticks * numer / denom`.
#[derive(Debug, Clone, Copy)]
struct TickScale {
    numer: u64,
    denom: u64,
}

static TICK_SCALE: OnceLock<TickScale> = OnceLock::new();

/// Current tick counter value scaled to nanoseconds.
///
/// The epoch is unspecified (counter start); only differences between two
/// readings in the same process are meaningful.
pub fn now_ns() -> u64 {
    let scale = TICK_SCALE.get_or_init(calibrate);
    // 128-bit intermediate: a raw counter near 2^64 times the numerator
    // would overflow 64 bits.
    ((raw_ticks() as u128 * scale.numer as u128) / scale.denom as u128) as u64
}

#[cfg(target_arch = "x86_64")]
fn raw_ticks() -> u64 {
    // SAFETY: rdtsc has no preconditions on x86_64.
    unsafe { core::arch::x86_64::_rdtsc() }
}

#[cfg(target_arch = "aarch64")]
fn raw_ticks() -> u64 {
    let value: u64;
    // SAFETY: cntvct_el0 is readable from EL0 on Linux and macOS.
    unsafe {
        core::arch::asm!("mrs {0}, cntvct_el0", out(reg) value);
    }
    value
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn raw_ticks() -> u64 {
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

#[cfg(target_arch = "x86_64")]
fn calibrate() -> TickScale {
    use std::thread;
    use std::time::{Duration, Instant};

    // The TSC frequency is not architecturally discoverable, so measure it
    // against the monotonic reference clock over a short window.
    let reference = Instant::now();
    let first = raw_ticks();
    thread::sleep(Duration::from_millis(10));
    let last = raw_ticks();
    let elapsed_ns = reference.elapsed().as_nanos() as u64;

    let scale = TickScale {
        numer: elapsed_ns.max(1),
        denom: last.saturating_sub(first).max(1),
    };
    debug!(numer = scale.numer, denom = scale.denom, "tick scale calibrated");
    scale
}

#[cfg(target_arch = "aarch64")]
fn calibrate() -> TickScale {
    let freq: u64;
    // SAFETY: cntfrq_el0 is readable from EL0.
    unsafe {
        core::arch::asm!("mrs {0}, cntfrq_el0", out(reg) freq);
    }
    let scale = TickScale {
        numer: 1_000_000_000,
        denom: freq.max(1),
    };
    debug!(numer = scale.numer, denom = scale.denom, "tick scale calibrated");
    scale
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn calibrate() -> TickScale {
    // raw_ticks already yields nanoseconds on the fallback path.
    TickScale { numer: 1, denom: 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_nondecreasing() {
        let a = now_ns();
        let b = now_ns();
        assert!(b >= a, "tick counter went backwards: {} then {}", a, b);
    }

    #[test]
    fn test_scaled_interval_brackets_sleep() {
        let start = now_ns();
        thread::sleep(Duration::from_millis(50));
        let elapsed = now_ns() - start;
        assert!(elapsed >= 50_000_000, "elapsed {} < 50ms", elapsed);
        // Loose ceiling; catches a scale factor that is off by 10x or more.
        assert!(elapsed < 500_000_000, "elapsed {} >= 500ms", elapsed);
    }

    #[test]
    fn test_scale_initialized_once() {
        let _ = now_ns();
        let first = *TICK_SCALE.get().expect("scale not initialized");
        let _ = now_ns();
        let second = *TICK_SCALE.get().unwrap();
        assert_eq!(first.numer, second.numer);
        assert_eq!(first.denom, second.denom);
    }
}
