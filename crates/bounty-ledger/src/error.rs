//! The ledger error taxonomy.
//!
//! Every operation either fully succeeds or fails with exactly one of
//! these kinds; nothing is swallowed. Temporal errors are expected
//! steady-state outcomes, not corruption.

use thiserror::Error;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // Authorization
    #[error("unauthorized: caller is not the treasury owner")]
    Unauthorized,

    #[error("oracle is inactive (stake exhausted)")]
    OracleInactive,

    // Validation
    #[error("invalid amount")]
    InvalidAmount,

    #[error("amount {amount} exceeds maximum {max}")]
    AmountTooLarge { amount: u64, max: u64 },

    #[error("stake {stake} below minimum {min}")]
    InvalidStake { stake: u64, min: u64 },

    #[error("already initialized")]
    AlreadyInitialized,

    #[error("treasury not initialized")]
    NotInitialized,

    #[error("oracle already registered")]
    OracleExists,

    #[error("unknown oracle")]
    UnknownOracle,

    // Temporal (expected steady-state conditions)
    #[error("harvest too soon: retry in {wait_secs}s")]
    HarvestTooSoon { wait_secs: i64 },

    #[error("claim too soon: retry in {wait_secs}s")]
    ClaimTooSoon { wait_secs: i64 },

    #[error("attestation is stale ({age_secs}s old)")]
    StaleAttestation { age_secs: i64 },

    // Cryptographic
    #[error("invalid attestation signature")]
    InvalidSignature,

    // Resources
    #[error("insufficient claimable pool: requested {requested}, available {available}")]
    InsufficientPool { requested: u64, available: u64 },

    #[error("insufficient oracle stake: requested {requested}, available {available}")]
    InsufficientStake { requested: u64, available: u64 },

    // Arithmetic: these indicate misconfigured bounds, alert rather than
    // retry.
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,
}

impl LedgerError {
    /// Whether this error is a "not yet" condition that callers should
    /// wait out rather than escalate.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            LedgerError::HarvestTooSoon { .. } | LedgerError::ClaimTooSoon { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporal_classification() {
        assert!(LedgerError::HarvestTooSoon { wait_secs: 10 }.is_temporal());
        assert!(LedgerError::ClaimTooSoon { wait_secs: 10 }.is_temporal());
        assert!(!LedgerError::Unauthorized.is_temporal());
        assert!(!LedgerError::StaleAttestation { age_secs: 400 }.is_temporal());
        assert!(!LedgerError::Overflow.is_temporal());
    }
}
