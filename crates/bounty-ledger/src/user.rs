//! Per-user reward records.

use serde::{Deserialize, Serialize};

use bounty_core::AccountId;

use crate::error::LedgerError;

/// One record per recipient. Created lazily on first claim or eagerly
/// via registration; mutated only by successful claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRewardAccount {
    /// The user's identity.
    pub identity: AccountId,

    /// Timestamp of the most recent successful claim (0 if never).
    pub last_claim_at: i64,

    /// Cumulative amount claimed. Monotonically non-decreasing.
    pub total_claimed: u64,

    /// Number of successful claims.
    pub claim_count: u32,
}

impl UserRewardAccount {
    /// Create a fresh record that has never claimed.
    pub fn new(identity: AccountId) -> Self {
        Self {
            identity,
            last_claim_at: 0,
            total_claimed: 0,
            claim_count: 0,
        }
    }

    /// Record a successful claim.
    pub(crate) fn record_claim(&mut self, amount: u64, now: i64) -> Result<(), LedgerError> {
        let new_total = self
            .total_claimed
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.total_claimed = new_total;
        self.last_claim_at = now;
        self.claim_count = self.claim_count.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_claim_accumulates() {
        let mut u = UserRewardAccount::new(AccountId::from_bytes([9; 32]));
        u.record_claim(500, 1_000).unwrap();
        u.record_claim(250, 90_000).unwrap();
        assert_eq!(u.total_claimed, 750);
        assert_eq!(u.last_claim_at, 90_000);
        assert_eq!(u.claim_count, 2);
    }

    #[test]
    fn test_record_claim_overflow() {
        let mut u = UserRewardAccount::new(AccountId::from_bytes([9; 32]));
        u.record_claim(u64::MAX, 1_000).unwrap();
        let err = u.record_claim(1, 2_000);
        assert_eq!(err, Err(LedgerError::Overflow));
        assert_eq!(u.total_claimed, u64::MAX);
        assert_eq!(u.last_claim_at, 1_000);
    }
}
