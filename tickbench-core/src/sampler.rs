// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Trial sampler: fixed-count capture/sleep/capture loops.
//!
//! Each trial brackets a blocking sleep with a start/end capture from one
//! clock source. Sources are sampled strictly sequentially, never
//! concurrently - overlapping sleeps would contaminate each source's
//! figures with scheduler contention from the other timers.

use std::thread;
use std::time::Duration;

use crate::clock::ClockSource;
use crate::error::ClockError;

/// Trials per clock source.
pub const TRIAL_COUNT: usize = 100;

/// Blocking delay bracketed by each trial's captures. Coarse and
/// best-effort: the sampler neither compensates for nor retries oversleep.
pub const TRIAL_PAUSE: Duration = Duration::from_secs(5);

/// Ordered trial records for one clock source.
///
/// Sequence order equals temporal execution order; records are never
/// reordered or mutated after capture.
#[derive(Debug, Clone)]
pub struct TrialSet<S> {
    records: Vec<(S, S)>,
}

impl<S: Copy> TrialSet<S> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start/end pairs in execution order.
    pub fn records(&self) -> &[(S, S)] {
        &self.records
    }

    /// Per-trial elapsed nanoseconds via the source's subtraction semantics.
    pub fn elapsed<C>(&self, clock: &C) -> Result<Vec<u64>, ClockError>
    where
        C: ClockSource<Sample = S>,
    {
        self.records
            .iter()
            .map(|&(start, end)| clock.elapsed_ns(start, end))
            .collect()
    }
}

/// Run `trials` capture/sleep/capture iterations against one clock source.
pub fn run_trials<C: ClockSource>(
    clock: &C,
    trials: usize,
    pause: Duration,
) -> Result<TrialSet<C::Sample>, ClockError> {
    let mut records = Vec::with_capacity(trials);
    for _ in 0..trials {
        let start = clock.capture()?;
        thread::sleep(pause);
        let end = clock.capture()?;
        records.push((start, end));
    }
    Ok(TrialSet { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{SteadyClock, TickClock};

    const PAUSE: Duration = Duration::from_millis(5);

    #[test]
    fn test_trial_set_length_and_order() {
        let set = run_trials(&SteadyClock, 3, PAUSE).unwrap();
        assert_eq!(set.len(), 3);

        // Consecutive trials must not overlap: each start is at or after
        // the previous trial's end.
        let records = set.records();
        for pair in records.windows(2) {
            assert!(pair[1].0 >= pair[0].1);
        }
    }

    #[test]
    fn test_elapsed_brackets_pause() {
        let set = run_trials(&SteadyClock, 4, PAUSE).unwrap();
        let elapsed = set.elapsed(&SteadyClock).unwrap();
        assert_eq!(elapsed.len(), 4);
        for ns in elapsed {
            assert!(ns >= 5_000_000, "trial slept less than the pause: {}", ns);
        }
    }

    #[test]
    fn test_tick_clock_trials() {
        let set = run_trials(&TickClock, 2, PAUSE).unwrap();
        let elapsed = set.elapsed(&TickClock).unwrap();
        for ns in elapsed {
            assert!(ns >= 5_000_000);
        }
    }

    #[test]
    fn test_zero_trials() {
        let set = run_trials(&SteadyClock, 0, PAUSE).unwrap();
        assert!(set.is_empty());
        assert!(set.elapsed(&SteadyClock).unwrap().is_empty());
    }
}
