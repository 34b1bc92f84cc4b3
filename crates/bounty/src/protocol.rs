//! The protocol handle: ledger + store + settlement behind one lock.
//!
//! Each operation locks the resident working set, applies the pure
//! ledger operation to a scratch copy, persists the touched records and
//! the event, and only then advances the resident copy. Conflicting
//! operations on the same treasury serialize on the lock, so balance and
//! interval checks always run against the state they will mutate.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bounty_core::{AccountId, Attestation, PublicKey, RecordAddress};
use bounty_ledger::{
    Ledger, LedgerEvent, OracleAccount, ProtocolParams, TreasuryAccount, UserRewardAccount,
};
use bounty_sched::{HarvestSink, SchedError};
use bounty_store::{Store, StoredEvent};

use crate::clock::Clock;
use crate::error::{ProtocolError, Result};
use crate::settlement::Settlement;

/// The unified protocol handle for one treasury.
pub struct Protocol<S: Store, X: Settlement> {
    ledger: Mutex<Ledger>,
    store: Arc<S>,
    settlement: X,
    clock: Arc<dyn Clock>,
}

impl<S: Store, X: Settlement> Protocol<S, X> {
    /// Create a handle over an empty working set.
    pub fn new(params: ProtocolParams, store: S, settlement: X, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new(params)),
            store: Arc::new(store),
            settlement,
            clock,
        }
    }

    /// Rebuild the working set for `owner`'s treasury from the store.
    pub async fn hydrate(
        params: ProtocolParams,
        store: S,
        settlement: X,
        clock: Arc<dyn Clock>,
        owner: &AccountId,
    ) -> Result<Self> {
        let address = RecordAddress::derive_treasury(owner);
        let treasury = store.get_treasury(&address).await?;
        let oracles = store.list_oracles().await?;
        let users = store.list_users().await?;

        let ledger = Ledger::from_parts(params, treasury, oracles, users);
        debug!(owner = %owner, "hydrated working set");
        Ok(Self {
            ledger: Mutex::new(ledger),
            store: Arc::new(store),
            settlement,
            clock,
        })
    }

    /// The storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create the treasury for `owner`. Exactly once.
    pub async fn initialize_treasury(&self, owner: AccountId) -> Result<LedgerEvent> {
        let now = self.clock.now_secs();
        let mut resident = self.ledger.lock().await;

        let mut working = resident.clone();
        let event = working.initialize_treasury(owner, now)?;

        self.persist_treasury(&working, &owner).await?;
        self.store.append_event(&event, now).await?;

        *resident = working;
        info!(owner = %owner, "treasury initialized");
        Ok(event)
    }

    /// Harvest externally realized yield into the treasury.
    pub async fn harvest_and_rebalance(
        &self,
        caller: AccountId,
        yield_amount: u64,
    ) -> Result<LedgerEvent> {
        let now = self.clock.now_secs();
        let mut resident = self.ledger.lock().await;

        let mut working = resident.clone();
        let event = match working.harvest_and_rebalance(caller, yield_amount, now) {
            Ok(event) => event,
            Err(e) if e.is_temporal() => {
                debug!(yield_amount, reason = %e, "harvest gated");
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let owner = self.owner_of(&working)?;
        self.persist_treasury(&working, &owner).await?;
        self.store.append_event(&event, now).await?;

        *resident = working;
        if let LedgerEvent::Harvested {
            user_share,
            treasury_share,
            ..
        } = &event
        {
            info!(yield_amount, user_share, treasury_share, "harvest applied");
        }
        Ok(event)
    }

    /// Register an oracle with its verification key and initial stake.
    pub async fn register_oracle(
        &self,
        identity: AccountId,
        key: PublicKey,
        initial_stake: u64,
    ) -> Result<LedgerEvent> {
        let now = self.clock.now_secs();
        let mut resident = self.ledger.lock().await;

        let mut working = resident.clone();
        let event = working.register_oracle(identity, key, initial_stake, now)?;

        self.persist_oracle(&working, &identity).await?;
        self.store.append_event(&event, now).await?;

        *resident = working;
        info!(oracle = %identity, initial_stake, "oracle registered");
        Ok(event)
    }

    /// Slash an oracle's stake into the treasury reserve. Owner-gated.
    pub async fn slash_oracle(
        &self,
        caller: AccountId,
        oracle: AccountId,
        slash_amount: u64,
    ) -> Result<LedgerEvent> {
        let now = self.clock.now_secs();
        let mut resident = self.ledger.lock().await;

        let mut working = resident.clone();
        let event = working.slash_oracle(caller, oracle, slash_amount, now)?;

        let owner = self.owner_of(&working)?;
        self.persist_treasury(&working, &owner).await?;
        self.persist_oracle(&working, &oracle).await?;
        self.store.append_event(&event, now).await?;

        *resident = working;
        warn!(oracle = %oracle, slash_amount, "oracle slashed");
        Ok(event)
    }

    /// Redeem an attestation: verify, rate-limit, debit the pool, and
    /// settle to the recipient.
    ///
    /// The settlement transfer runs after every check has passed and
    /// before any state is persisted; a failed transfer leaves all
    /// records untouched.
    pub async fn claim_reward(
        &self,
        attestation: &Attestation,
        oracle: AccountId,
    ) -> Result<LedgerEvent> {
        let now = self.clock.now_secs();
        let mut resident = self.ledger.lock().await;

        let mut working = resident.clone();
        let event = match working.claim_reward(attestation, oracle, now) {
            Ok(event) => event,
            Err(e) if e.is_temporal() => {
                debug!(recipient = %attestation.recipient, reason = %e, "claim gated");
                return Err(e.into());
            }
            Err(e) => {
                warn!(recipient = %attestation.recipient, reason = %e, "claim rejected");
                return Err(e.into());
            }
        };

        let owner = self.owner_of(&working)?;
        let from = RecordAddress::derive_treasury(&owner);
        self.settlement
            .transfer(from, attestation.recipient, attestation.amount)
            .await
            .map_err(|e| ProtocolError::Settlement(e.to_string()))?;

        self.persist_treasury(&working, &owner).await?;
        self.persist_user(&working, &attestation.recipient).await?;
        self.store.append_event(&event, now).await?;

        *resident = working;
        info!(
            recipient = %attestation.recipient,
            amount = attestation.amount,
            "claim paid"
        );
        Ok(event)
    }

    /// Eagerly create a user record.
    pub async fn register_user(&self, identity: AccountId) -> Result<LedgerEvent> {
        let now = self.clock.now_secs();
        let mut resident = self.ledger.lock().await;

        let mut working = resident.clone();
        let event = working.register_user(identity, now)?;

        self.persist_user(&working, &identity).await?;
        self.store.append_event(&event, now).await?;

        *resident = working;
        info!(user = %identity, "user registered");
        Ok(event)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Snapshot of the treasury record.
    pub async fn treasury(&self) -> Option<TreasuryAccount> {
        self.ledger.lock().await.treasury().cloned()
    }

    /// Snapshot of an oracle record.
    pub async fn oracle(&self, identity: &AccountId) -> Option<OracleAccount> {
        self.ledger.lock().await.oracle(identity).cloned()
    }

    /// Snapshot of a user record.
    pub async fn user(&self, identity: &AccountId) -> Option<UserRewardAccount> {
        self.ledger.lock().await.user(identity).cloned()
    }

    /// Audit-log tail from the store.
    pub async fn events_since(&self, after_seq: u64) -> Result<Vec<StoredEvent>> {
        Ok(self.store.events_since(after_seq).await?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn owner_of(&self, ledger: &Ledger) -> Result<AccountId> {
        ledger
            .treasury()
            .map(|t| t.owner)
            .ok_or_else(|| ProtocolError::Internal("treasury missing after operation".into()))
    }

    async fn persist_treasury(&self, ledger: &Ledger, owner: &AccountId) -> Result<()> {
        let record = ledger
            .treasury()
            .ok_or_else(|| ProtocolError::Internal("treasury missing after operation".into()))?;
        let address = RecordAddress::derive_treasury(owner);
        self.store.upsert_treasury(&address, record).await?;
        Ok(())
    }

    async fn persist_oracle(&self, ledger: &Ledger, identity: &AccountId) -> Result<()> {
        let record = ledger
            .oracle(identity)
            .ok_or_else(|| ProtocolError::Internal("oracle missing after operation".into()))?;
        self.store.upsert_oracle(record).await?;
        Ok(())
    }

    async fn persist_user(&self, ledger: &Ledger, identity: &AccountId) -> Result<()> {
        let record = ledger
            .user(identity)
            .ok_or_else(|| ProtocolError::Internal("user missing after operation".into()))?;
        self.store.upsert_user(record).await?;
        Ok(())
    }
}

/// Adapter binding a protocol handle to the harvest scheduler as the
/// treasury owner.
pub struct HarvestHandle<S: Store, X: Settlement> {
    protocol: Arc<Protocol<S, X>>,
    owner: AccountId,
}

impl<S: Store, X: Settlement> HarvestHandle<S, X> {
    /// Create a harvest adapter acting as `owner`.
    pub fn new(protocol: Arc<Protocol<S, X>>, owner: AccountId) -> Self {
        Self { protocol, owner }
    }
}

#[async_trait]
impl<S: Store + 'static, X: Settlement + 'static> HarvestSink for HarvestHandle<S, X> {
    async fn harvest(&self, yield_amount: u64) -> std::result::Result<(), SchedError> {
        match self
            .protocol
            .harvest_and_rebalance(self.owner, yield_amount)
            .await
        {
            Ok(_) => Ok(()),
            Err(ProtocolError::Ledger(e)) => Err(SchedError::Ledger(e)),
            Err(e) => Err(SchedError::Sink(e.to_string())),
        }
    }
}
