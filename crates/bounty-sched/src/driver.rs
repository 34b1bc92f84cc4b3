//! The harvest driver: binds a yield source to a harvest sink.
//!
//! On each tick the driver asks the yield backend for the next realized
//! amount and pushes it through the sink (the protocol handle). A
//! `HarvestTooSoon` rejection is the cadence working as intended and logs
//! at debug; real failures log at warn and back off exponentially.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::error::SchedError;
use crate::scheduler::PeriodicTask;

/// The external yield backend (staking rewards, vault interest).
#[async_trait]
pub trait YieldSource: Send + Sync {
    /// The next yield amount to harvest. Zero means nothing accrued yet.
    async fn next_yield(&self) -> Result<u64, SchedError>;
}

/// The harvesting side, implemented by the protocol handle.
#[async_trait]
pub trait HarvestSink: Send + Sync {
    /// Ingest a yield amount into the treasury.
    async fn harvest(&self, yield_amount: u64) -> Result<(), SchedError>;
}

/// Drives periodic harvests from a [`YieldSource`] into a [`HarvestSink`].
pub struct HarvestDriver<S, K> {
    source: S,
    sink: K,
    backoff: Backoff,
}

impl<S: YieldSource, K: HarvestSink> HarvestDriver<S, K> {
    /// Create a driver with the default backoff policy.
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            backoff: Backoff::default(),
        }
    }

    /// Create a driver with a custom backoff policy.
    pub fn with_backoff(source: S, sink: K, backoff: Backoff) -> Self {
        Self {
            source,
            sink,
            backoff,
        }
    }

    /// One harvest attempt. Applies backoff delay inline on failure so a
    /// flapping backend does not spin the scheduler.
    pub async fn tick(&mut self) {
        let amount = match self.source.next_yield().await {
            Ok(0) => {
                debug!("no yield accrued");
                return;
            }
            Ok(amount) => amount,
            Err(e) => {
                let delay = self.backoff.next();
                warn!(error = %e, ?delay, "yield source failed");
                tokio::time::sleep(delay).await;
                return;
            }
        };

        match self.sink.harvest(amount).await {
            Ok(()) => {
                info!(amount, "harvest ingested");
                self.backoff.reset();
            }
            Err(e) if e.is_steady_state() => {
                debug!(amount, reason = %e, "harvest not due yet");
            }
            Err(e) => {
                let delay = self.backoff.next();
                warn!(amount, error = %e, ?delay, "harvest failed");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[async_trait]
impl<S: YieldSource + 'static, K: HarvestSink + 'static> PeriodicTask for HarvestDriver<S, K> {
    async fn run_once(&mut self) {
        self.tick().await;
    }
}
