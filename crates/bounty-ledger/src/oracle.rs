//! Oracle records: staked attesters and the slashing state machine.
//!
//! `Unregistered -> Active` via register, `Active -> ... -> Inactive`
//! via repeated slashes. Nothing returns an exhausted oracle to Active.

use serde::{Deserialize, Serialize};

use bounty_core::{AccountId, PublicKey};

use crate::error::LedgerError;

/// One record per registered oracle identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleAccount {
    /// The oracle's identity.
    pub identity: AccountId,

    /// Public key attestation signatures are verified against.
    pub key: PublicKey,

    /// Remaining staked collateral.
    pub stake: u64,

    /// When the oracle registered.
    pub registered_at: i64,

    /// How many times this oracle has been slashed.
    pub slash_count: u32,

    /// Timestamp of the most recent slash (0 if never).
    pub last_slash_at: i64,
}

impl OracleAccount {
    /// Create a newly registered oracle.
    pub fn new(identity: AccountId, key: PublicKey, stake: u64, now: i64) -> Self {
        Self {
            identity,
            key,
            stake,
            registered_at: now,
            slash_count: 0,
            last_slash_at: 0,
        }
    }

    /// An oracle with exhausted stake has no attestation authority.
    pub fn is_active(&self) -> bool {
        self.stake > 0
    }

    /// Reduce stake by `amount`, returning the remaining stake.
    ///
    /// Over-slashing is a hard error so monitoring can distinguish
    /// "oracle fully slashed" from "operator error".
    pub(crate) fn slash(&mut self, amount: u64, now: i64) -> Result<u64, LedgerError> {
        if amount > self.stake {
            return Err(LedgerError::InsufficientStake {
                requested: amount,
                available: self.stake,
            });
        }

        self.stake = self.stake.checked_sub(amount).ok_or(LedgerError::Underflow)?;
        self.slash_count = self.slash_count.saturating_add(1);
        self.last_slash_at = now;
        Ok(self.stake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounty_core::Keypair;

    fn oracle(stake: u64) -> OracleAccount {
        let keypair = Keypair::from_seed(&[7; 32]);
        OracleAccount::new(
            AccountId::from(keypair.public_key()),
            keypair.public_key(),
            stake,
            1_000,
        )
    }

    #[test]
    fn test_partial_slash_stays_active() {
        let mut o = oracle(1_000);
        let remaining = o.slash(100, 2_000).unwrap();
        assert_eq!(remaining, 900);
        assert!(o.is_active());
        assert_eq!(o.slash_count, 1);
        assert_eq!(o.last_slash_at, 2_000);
    }

    #[test]
    fn test_slash_to_zero_deactivates() {
        let mut o = oracle(1_000);
        o.slash(1_000, 2_000).unwrap();
        assert_eq!(o.stake, 0);
        assert!(!o.is_active());
    }

    #[test]
    fn test_over_slash_is_hard_error() {
        let mut o = oracle(500);
        let err = o.slash(501, 2_000);
        assert_eq!(
            err,
            Err(LedgerError::InsufficientStake {
                requested: 501,
                available: 500,
            })
        );
        // No partial mutation.
        assert_eq!(o.stake, 500);
        assert_eq!(o.slash_count, 0);
    }
}
