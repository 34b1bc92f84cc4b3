//! The ledger handle and its operations.
//!
//! A [`Ledger`] owns one treasury's working set: the treasury record, the
//! oracle registry, and the per-user reward records. It is an explicit
//! value passed to callers; several ledgers can coexist in one process.
//!
//! Operations follow check-then-act against the snapshot the handle
//! holds: every precondition is evaluated before the first field is
//! written, and a failing operation leaves all records untouched. The
//! caller provides `now`; the ledger never reads a clock.

use std::collections::BTreeMap;

use bounty_core::{AccountId, Attestation, PublicKey};

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::oracle::OracleAccount;
use crate::params::ProtocolParams;
use crate::treasury::TreasuryAccount;
use crate::user::UserRewardAccount;

/// One treasury's complete working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    params: ProtocolParams,
    treasury: Option<TreasuryAccount>,
    oracles: BTreeMap<AccountId, OracleAccount>,
    users: BTreeMap<AccountId, UserRewardAccount>,
}

impl Ledger {
    /// Create an empty ledger with the given parameters.
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params,
            treasury: None,
            oracles: BTreeMap::new(),
            users: BTreeMap::new(),
        }
    }

    /// Rebuild a ledger from persisted records.
    pub fn from_parts(
        params: ProtocolParams,
        treasury: Option<TreasuryAccount>,
        oracles: impl IntoIterator<Item = OracleAccount>,
        users: impl IntoIterator<Item = UserRewardAccount>,
    ) -> Self {
        Self {
            params,
            treasury,
            oracles: oracles.into_iter().map(|o| (o.identity, o)).collect(),
            users: users.into_iter().map(|u| (u.identity, u)).collect(),
        }
    }

    /// The parameters this ledger runs under.
    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// The treasury record, if initialized.
    pub fn treasury(&self) -> Option<&TreasuryAccount> {
        self.treasury.as_ref()
    }

    /// Look up an oracle record.
    pub fn oracle(&self, identity: &AccountId) -> Option<&OracleAccount> {
        self.oracles.get(identity)
    }

    /// Look up a user record.
    pub fn user(&self, identity: &AccountId) -> Option<&UserRewardAccount> {
        self.users.get(identity)
    }

    /// Iterate all oracle records.
    pub fn oracles(&self) -> impl Iterator<Item = &OracleAccount> {
        self.oracles.values()
    }

    /// Iterate all user records.
    pub fn users(&self) -> impl Iterator<Item = &UserRewardAccount> {
        self.users.values()
    }

    /// Conservation invariant over the whole working set: funds held plus
    /// funds distributed equal funds that ever entered.
    pub fn conservation_holds(&self) -> bool {
        self.treasury
            .as_ref()
            .map(TreasuryAccount::conservation_holds)
            .unwrap_or(true)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create the treasury. Exactly once per ledger.
    pub fn initialize_treasury(
        &mut self,
        owner: AccountId,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        if self.treasury.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }

        self.treasury = Some(TreasuryAccount::new(owner, now));
        Ok(LedgerEvent::TreasuryInitialized { owner, at: now })
    }

    /// Ingest externally realized yield, splitting it 50/50 between the
    /// claimable pool and the reserve.
    ///
    /// The treasury share is computed by subtraction from the floor-divided
    /// user share, never recomputed independently, so odd amounts cannot
    /// leak a unit.
    pub fn harvest_and_rebalance(
        &mut self,
        caller: AccountId,
        yield_amount: u64,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        let params = self.params.clone();
        let treasury = self.treasury.as_mut().ok_or(LedgerError::NotInitialized)?;

        if caller != treasury.owner {
            return Err(LedgerError::Unauthorized);
        }
        if yield_amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if yield_amount > params.max_harvest_amount {
            return Err(LedgerError::AmountTooLarge {
                amount: yield_amount,
                max: params.max_harvest_amount,
            });
        }

        let elapsed = now - treasury.last_harvest_at;
        if elapsed < params.harvest_interval_secs {
            return Err(LedgerError::HarvestTooSoon {
                wait_secs: params.harvest_interval_secs - elapsed,
            });
        }

        let user_share = yield_amount / 2;
        let treasury_share = yield_amount - user_share;

        treasury.credit_harvest(yield_amount, user_share, treasury_share, now)?;

        Ok(LedgerEvent::Harvested {
            yield_amount,
            user_share,
            treasury_share,
            at: now,
        })
    }

    /// Register an oracle with its verification key and initial stake.
    pub fn register_oracle(
        &mut self,
        identity: AccountId,
        key: PublicKey,
        initial_stake: u64,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        if initial_stake < self.params.min_oracle_stake {
            return Err(LedgerError::InvalidStake {
                stake: initial_stake,
                min: self.params.min_oracle_stake,
            });
        }
        if self.oracles.contains_key(&identity) {
            return Err(LedgerError::OracleExists);
        }

        self.oracles
            .insert(identity, OracleAccount::new(identity, key, initial_stake, now));

        Ok(LedgerEvent::OracleRegistered {
            oracle: identity,
            stake: initial_stake,
            at: now,
        })
    }

    /// Punitively reduce an oracle's stake, crediting the treasury
    /// reserve. Owner-gated.
    pub fn slash_oracle(
        &mut self,
        caller: AccountId,
        oracle: AccountId,
        slash_amount: u64,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        let treasury = self.treasury.as_ref().ok_or(LedgerError::NotInitialized)?;
        if caller != treasury.owner {
            return Err(LedgerError::Unauthorized);
        }
        if slash_amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let record = self
            .oracles
            .get(&oracle)
            .ok_or(LedgerError::UnknownOracle)?;
        if slash_amount > record.stake {
            return Err(LedgerError::InsufficientStake {
                requested: slash_amount,
                available: record.stake,
            });
        }

        // All checks passed; now mutate oracle and treasury together.
        let record = self
            .oracles
            .get_mut(&oracle)
            .ok_or(LedgerError::UnknownOracle)?;
        let remaining_stake = record.slash(slash_amount, now)?;
        self.treasury
            .as_mut()
            .ok_or(LedgerError::NotInitialized)?
            .credit_slash(slash_amount)?;

        Ok(LedgerEvent::OracleSlashed {
            oracle,
            slash_amount,
            remaining_stake,
            at: now,
        })
    }

    /// Redeem an attestation against the claimable pool.
    ///
    /// Checks run cheapest-first; nothing mutates until all pass. The
    /// user record is created on first successful claim, never by a
    /// failed one.
    pub fn claim_reward(
        &mut self,
        attestation: &Attestation,
        oracle: AccountId,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        let params = self.params.clone();
        let amount = attestation.amount;
        let recipient = attestation.recipient;

        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > params.max_claim_amount {
            return Err(LedgerError::AmountTooLarge {
                amount,
                max: params.max_claim_amount,
            });
        }

        let age_secs = now - attestation.issued_at;
        if age_secs > params.max_attestation_age_secs {
            return Err(LedgerError::StaleAttestation { age_secs });
        }

        let treasury = self.treasury.as_ref().ok_or(LedgerError::NotInitialized)?;

        let oracle_record = self
            .oracles
            .get(&oracle)
            .ok_or(LedgerError::UnknownOracle)?;
        // A slashed-out oracle's past authority is revoked even for
        // cryptographically valid signatures.
        if !oracle_record.is_active() {
            return Err(LedgerError::OracleInactive);
        }
        attestation
            .verify(&oracle_record.key)
            .map_err(|_| LedgerError::InvalidSignature)?;

        let last_claim_at = self
            .users
            .get(&recipient)
            .map(|u| u.last_claim_at)
            .unwrap_or(0);
        let since_last = now - last_claim_at;
        if since_last < params.claim_interval_secs {
            return Err(LedgerError::ClaimTooSoon {
                wait_secs: params.claim_interval_secs - since_last,
            });
        }

        if amount > treasury.claimable_pool {
            return Err(LedgerError::InsufficientPool {
                requested: amount,
                available: treasury.claimable_pool,
            });
        }

        // All checks passed; mutate treasury and user together.
        self.treasury
            .as_mut()
            .ok_or(LedgerError::NotInitialized)?
            .debit_claim(amount)?;
        self.users
            .entry(recipient)
            .or_insert_with(|| UserRewardAccount::new(recipient))
            .record_claim(amount, now)?;

        Ok(LedgerEvent::Claimed {
            recipient,
            amount,
            at: now,
        })
    }

    /// Eagerly create a user record before any claim.
    pub fn register_user(
        &mut self,
        identity: AccountId,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        if self.users.contains_key(&identity) {
            return Err(LedgerError::AlreadyInitialized);
        }

        self.users.insert(identity, UserRewardAccount::new(identity));
        Ok(LedgerEvent::UserRegistered {
            user: identity,
            at: now,
        })
    }
}
