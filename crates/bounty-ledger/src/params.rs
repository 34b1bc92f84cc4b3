//! Protocol parameters.
//!
//! Defaults mirror the deployed configuration; tests shrink the windows
//! instead of advancing wall-clock time.

use serde::{Deserialize, Serialize};

/// Minimum seconds between harvests (1 hour).
pub const HARVEST_INTERVAL_SECS: i64 = 3_600;

/// Minimum seconds between claims per user (24 hours).
pub const CLAIM_INTERVAL_SECS: i64 = 86_400;

/// Maximum amount a single claim may pay out.
pub const MAX_CLAIM_AMOUNT: u64 = 10_000_000_000;

/// Maximum yield a single harvest may ingest.
pub const MAX_HARVEST_AMOUNT: u64 = 1_000_000_000_000;

/// Minimum collateral to register an oracle.
pub const MIN_ORACLE_STAKE: u64 = 1_000_000_000;

/// Maximum age of an attestation at claim time (5 minutes).
pub const MAX_ATTESTATION_AGE_SECS: i64 = 300;

/// Tunable parameters carried by each [`crate::Ledger`] handle.
///
/// There is no global configuration: two treasuries in the same process
/// can run different parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Minimum seconds between harvests.
    pub harvest_interval_secs: i64,

    /// Minimum seconds between claims per user.
    pub claim_interval_secs: i64,

    /// Upper bound on a single claim.
    pub max_claim_amount: u64,

    /// Upper bound on a single harvest.
    pub max_harvest_amount: u64,

    /// Minimum collateral to register an oracle.
    pub min_oracle_stake: u64,

    /// How long an issued attestation stays claimable.
    pub max_attestation_age_secs: i64,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            harvest_interval_secs: HARVEST_INTERVAL_SECS,
            claim_interval_secs: CLAIM_INTERVAL_SECS,
            max_claim_amount: MAX_CLAIM_AMOUNT,
            max_harvest_amount: MAX_HARVEST_AMOUNT,
            min_oracle_stake: MIN_ORACLE_STAKE,
            max_attestation_age_secs: MAX_ATTESTATION_AGE_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let params = ProtocolParams::default();
        assert_eq!(params.harvest_interval_secs, HARVEST_INTERVAL_SECS);
        assert_eq!(params.claim_interval_secs, CLAIM_INTERVAL_SECS);
        assert_eq!(params.max_claim_amount, MAX_CLAIM_AMOUNT);
        assert_eq!(params.max_harvest_amount, MAX_HARVEST_AMOUNT);
        assert_eq!(params.min_oracle_stake, MIN_ORACLE_STAKE);
        assert_eq!(params.max_attestation_age_secs, MAX_ATTESTATION_AGE_SECS);
    }
}
