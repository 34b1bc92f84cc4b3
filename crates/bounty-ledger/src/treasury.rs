//! The treasury record: pooled balances and harvest bookkeeping.

use serde::{Deserialize, Serialize};

use bounty_core::AccountId;

use crate::error::LedgerError;

/// The shared treasury: one record per owner, never deleted.
///
/// `claimable_pool + reserve_balance + total_distributed` always equals
/// `total_harvested + total_slashed`; see
/// [`TreasuryAccount::conservation_holds`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryAccount {
    /// Identity authorized to harvest and slash.
    pub owner: AccountId,

    /// Timestamp of the most recent harvest (creation time if none yet).
    pub last_harvest_at: i64,

    /// Funds available for user claims.
    pub claimable_pool: u64,

    /// Funds retained by the protocol (treasury share + slashes).
    pub reserve_balance: u64,

    /// Cumulative amount paid out to users.
    pub total_distributed: u64,

    /// Cumulative yield ever harvested.
    pub total_harvested: u64,

    /// Cumulative stake ever slashed into the reserve.
    pub total_slashed: u64,
}

impl TreasuryAccount {
    /// Create a fresh treasury with empty pools.
    pub fn new(owner: AccountId, now: i64) -> Self {
        Self {
            owner,
            last_harvest_at: now,
            claimable_pool: 0,
            reserve_balance: 0,
            total_distributed: 0,
            total_harvested: 0,
            total_slashed: 0,
        }
    }

    /// Credit a harvest split into both pools.
    ///
    /// Computes every new balance before writing any of them, so a
    /// failing check leaves the record untouched.
    pub(crate) fn credit_harvest(
        &mut self,
        yield_amount: u64,
        user_share: u64,
        treasury_share: u64,
        now: i64,
    ) -> Result<(), LedgerError> {
        let new_pool = self
            .claimable_pool
            .checked_add(user_share)
            .ok_or(LedgerError::Overflow)?;
        let new_reserve = self
            .reserve_balance
            .checked_add(treasury_share)
            .ok_or(LedgerError::Overflow)?;
        let new_harvested = self
            .total_harvested
            .checked_add(yield_amount)
            .ok_or(LedgerError::Overflow)?;

        self.claimable_pool = new_pool;
        self.reserve_balance = new_reserve;
        self.total_harvested = new_harvested;
        self.last_harvest_at = now;
        Ok(())
    }

    /// Debit the claimable pool for a successful claim.
    ///
    /// The caller has already checked pool sufficiency; the checked
    /// subtraction stays as defense in depth.
    pub(crate) fn debit_claim(&mut self, amount: u64) -> Result<(), LedgerError> {
        let new_pool = self
            .claimable_pool
            .checked_sub(amount)
            .ok_or(LedgerError::Underflow)?;
        let new_distributed = self
            .total_distributed
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.claimable_pool = new_pool;
        self.total_distributed = new_distributed;
        Ok(())
    }

    /// Credit slashed stake into the reserve.
    pub(crate) fn credit_slash(&mut self, amount: u64) -> Result<(), LedgerError> {
        let new_reserve = self
            .reserve_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_slashed = self
            .total_slashed
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.reserve_balance = new_reserve;
        self.total_slashed = new_slashed;
        Ok(())
    }

    /// Check the conservation invariant for this record.
    pub fn conservation_holds(&self) -> bool {
        let held = (self.claimable_pool as u128)
            + (self.reserve_balance as u128)
            + (self.total_distributed as u128);
        let entered = (self.total_harvested as u128) + (self.total_slashed as u128);
        held == entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treasury() -> TreasuryAccount {
        TreasuryAccount::new(AccountId::from_bytes([1; 32]), 1_000)
    }

    #[test]
    fn test_harvest_credits_both_pools() {
        let mut t = treasury();
        t.credit_harvest(1_000, 500, 500, 2_000).unwrap();
        assert_eq!(t.claimable_pool, 500);
        assert_eq!(t.reserve_balance, 500);
        assert_eq!(t.total_harvested, 1_000);
        assert_eq!(t.last_harvest_at, 2_000);
        assert!(t.conservation_holds());
    }

    #[test]
    fn test_harvest_overflow_leaves_record_unchanged() {
        let mut t = treasury();
        t.credit_harvest(1_000, 500, 500, 2_000).unwrap();
        let before = t.clone();

        let err = t.credit_harvest(u64::MAX, u64::MAX, u64::MAX, 3_000);
        assert_eq!(err, Err(LedgerError::Overflow));
        assert_eq!(t, before);
    }

    #[test]
    fn test_claim_moves_pool_to_distributed() {
        let mut t = treasury();
        t.credit_harvest(1_000, 500, 500, 2_000).unwrap();
        t.debit_claim(300).unwrap();
        assert_eq!(t.claimable_pool, 200);
        assert_eq!(t.total_distributed, 300);
        assert!(t.conservation_holds());
    }

    #[test]
    fn test_claim_underflow_rejected() {
        let mut t = treasury();
        assert_eq!(t.debit_claim(1), Err(LedgerError::Underflow));
        assert_eq!(t.claimable_pool, 0);
    }

    #[test]
    fn test_slash_feeds_reserve() {
        let mut t = treasury();
        t.credit_slash(100).unwrap();
        assert_eq!(t.reserve_balance, 100);
        assert_eq!(t.total_slashed, 100);
        assert!(t.conservation_holds());
    }
}
