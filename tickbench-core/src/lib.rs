//! Tickbench Core Library
//!
//! Measurement core shared by the two benchmark harnesses: clock source
//! adapters over the available timing primitives, the fixed-count trial
//! sampler, the tabular report aggregator, and the fork/pipe transfer
//! benchmark with its append-only logs.

pub mod clock;
pub mod error;
pub mod pipe;
pub mod report;
pub mod sampler;
pub mod sizespec;
pub mod translog;

// Re-export commonly used types
pub use clock::{
    ClockSource, MonotonicClock, RealtimeClock, SteadyClock, SystemClock, TickClock,
    TimeOfDayClock,
};
pub use error::{BenchError, BenchResult, ClockError, PipeError, SizeSpecError};
pub use report::{Column, Report};
pub use sampler::{run_trials, TrialSet, TRIAL_COUNT, TRIAL_PAUSE};
pub use sizespec::parse_size;
pub use translog::{Role, TransferRecord};
