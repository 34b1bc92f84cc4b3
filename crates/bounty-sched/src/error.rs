//! Error types for scheduling and harvest driving.

use thiserror::Error;

use bounty_ledger::LedgerError;

/// Errors surfaced by scheduled work.
#[derive(Debug, Error)]
pub enum SchedError {
    /// The ledger rejected the operation. Temporal kinds
    /// (`HarvestTooSoon`) are steady-state, not failures.
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    /// The yield source could not produce an amount.
    #[error("yield source: {0}")]
    Source(String),

    /// The sink failed outside the ledger (storage, settlement).
    #[error("sink: {0}")]
    Sink(String),
}

impl SchedError {
    /// Whether this is a "not yet" outcome rather than a failure.
    pub fn is_steady_state(&self) -> bool {
        matches!(self, SchedError::Ledger(e) if e.is_temporal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_state_classification() {
        let too_soon = SchedError::Ledger(LedgerError::HarvestTooSoon { wait_secs: 60 });
        assert!(too_soon.is_steady_state());

        let unauthorized = SchedError::Ledger(LedgerError::Unauthorized);
        assert!(!unauthorized.is_steady_state());

        let source = SchedError::Source("backend unreachable".into());
        assert!(!source.is_steady_state());
    }
}
