//! # Bounty Sched
//!
//! Scheduling for the Bounty protocol: periodic jobs with cooperative
//! cancellation, and the harvest driver that feeds externally realized
//! yield into the treasury on a cadence.
//!
//! The ledger treats `HarvestTooSoon` as expected steady-state behavior;
//! the driver here logs it quietly and waits for the next tick instead of
//! retrying aggressively. Real failures back off exponentially.

pub mod backoff;
pub mod driver;
pub mod error;
pub mod scheduler;

pub use backoff::Backoff;
pub use driver::{HarvestDriver, HarvestSink, YieldSource};
pub use error::SchedError;
pub use scheduler::{JobHandle, PeriodicTask, Scheduler};
