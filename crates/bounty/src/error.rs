//! Error types for the protocol handle.

use thiserror::Error;

use bounty_ledger::LedgerError;
use bounty_store::StoreError;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The ledger rejected the operation; no state changed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Persistence failed; the resident working set was not advanced.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The settlement transfer failed; no bookkeeping was applied.
    #[error("settlement error: {0}")]
    Settlement(String),

    /// Internal consistency violation between the working set and an
    /// operation result.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProtocolError {
    /// Whether this is an expected "not yet" outcome.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ProtocolError::Ledger(e) if e.is_temporal())
    }
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
