//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a manual clock, a recording
//! settlement backend, and a deterministic participant set.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bounty::clock::Clock;
use bounty::settlement::{Settlement, SettlementError};
use bounty::Protocol;
use bounty_core::{AccountId, Achievement, Attestation, Keypair, RecordAddress};
use bounty_ledger::{Ledger, ProtocolParams};
use bounty_store::MemoryStore;

/// Epoch anchor used by fixtures: a realistic Unix timestamp so interval
/// checks behave as they would in production.
pub const T0: i64 = 1_700_000_000;

/// A clock driven explicitly by the test.
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock anchored at `start`.
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Advance by `secs`.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Read the current time.
    pub fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.now()
    }
}

/// A settlement backend that records transfers and can fail on demand.
#[derive(Default)]
pub struct MockSettlement {
    transfers: Mutex<Vec<(RecordAddress, AccountId, u64)>>,
    fail_next: AtomicBool,
}

impl MockSettlement {
    /// Create a backend that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next transfer fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// All transfers seen so far.
    pub fn transfers(&self) -> Vec<(RecordAddress, AccountId, u64)> {
        self.transfers.lock().expect("mock lock").clone()
    }

    /// Number of transfers seen so far.
    pub fn transfer_count(&self) -> usize {
        self.transfers.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl Settlement for MockSettlement {
    async fn transfer(
        &self,
        from: RecordAddress,
        to: AccountId,
        amount: u64,
    ) -> Result<(), SettlementError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SettlementError::TransferFailed("injected failure".into()));
        }
        self.transfers
            .lock()
            .expect("mock lock")
            .push((from, to, amount));
        Ok(())
    }
}

/// A deterministic participant set with a manual clock.
pub struct TestFixture {
    pub owner: AccountId,
    pub oracle_keypair: Keypair,
    pub recipient: AccountId,
    pub clock: Arc<ManualClock>,
    pub params: ProtocolParams,
}

impl TestFixture {
    /// Create a fixture with default parameters, anchored at [`T0`].
    pub fn new() -> Self {
        Self::with_params(ProtocolParams::default())
    }

    /// Create a fixture with custom parameters.
    pub fn with_params(params: ProtocolParams) -> Self {
        Self {
            owner: AccountId::from_bytes([0x01; 32]),
            oracle_keypair: Keypair::from_seed(&[0x42; 32]),
            recipient: AccountId::from_bytes([0x09; 32]),
            clock: Arc::new(ManualClock::new(T0)),
            params,
        }
    }

    /// The oracle's account identity.
    pub fn oracle_id(&self) -> AccountId {
        AccountId::from(self.oracle_keypair.public_key())
    }

    /// Issue an attestation for the fixture recipient at the current
    /// clock time.
    pub fn attest(&self, amount: u64) -> Attestation {
        self.attest_at(amount, self.clock.now())
    }

    /// Issue an attestation with an explicit issuance time.
    pub fn attest_at(&self, amount: u64, issued_at: i64) -> Attestation {
        Attestation::issue(&self.oracle_keypair, self.recipient, issued_at, amount)
    }

    /// Price an achievement and issue an attestation for the computed
    /// reward, as the off-chain attester does.
    pub fn attest_achievement(&self, achievement: &Achievement) -> Attestation {
        let amount = achievement
            .reward_amount()
            .expect("achievement reward fits in u64");
        self.attest(amount)
    }

    /// A pure ledger with the fixture's parameters.
    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.params.clone())
    }

    /// A pure ledger with treasury initialized, the oracle registered at
    /// minimum stake, and one harvest of `yield_amount` applied. The
    /// clock ends just past the harvest.
    pub fn funded_ledger(&self, yield_amount: u64) -> Ledger {
        let mut ledger = self.ledger();
        ledger
            .initialize_treasury(self.owner, self.clock.now())
            .expect("initialize");
        ledger
            .register_oracle(
                self.oracle_id(),
                self.oracle_keypair.public_key(),
                self.params.min_oracle_stake,
                self.clock.now(),
            )
            .expect("register oracle");
        self.clock.advance(self.params.harvest_interval_secs);
        ledger
            .harvest_and_rebalance(self.owner, yield_amount, self.clock.now())
            .expect("harvest");
        ledger
    }

    /// A protocol handle over a fresh memory store, with the treasury
    /// initialized and the oracle registered. Returns the settlement
    /// backend for inspection.
    pub async fn protocol(
        &self,
    ) -> (
        Protocol<MemoryStore, Arc<MockSettlement>>,
        Arc<MockSettlement>,
    ) {
        let settlement = Arc::new(MockSettlement::new());
        let protocol = Protocol::new(
            self.params.clone(),
            MemoryStore::new(),
            Arc::clone(&settlement),
            self.clock.clone() as Arc<dyn Clock>,
        );
        protocol
            .initialize_treasury(self.owner)
            .await
            .expect("initialize");
        protocol
            .register_oracle(
                self.oracle_id(),
                self.oracle_keypair.public_key(),
                self.params.min_oracle_stake,
            )
            .await
            .expect("register oracle");
        (protocol, settlement)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
