//! Store trait: the abstract interface for ledger-record persistence.
//!
//! This trait allows the protocol handle to be storage-agnostic.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bounty_core::{AccountId, RecordAddress};
use bounty_ledger::{LedgerEvent, OracleAccount, TreasuryAccount, UserRewardAccount};

use crate::error::Result;

/// An event as persisted in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Monotone position in the log (1-indexed).
    pub seq: u64,

    /// Local timestamp at which the event was appended.
    pub recorded_at: i64,

    /// The ledger event itself.
    pub event: LedgerEvent,
}

/// The Store trait: async interface for record persistence.
///
/// All methods are async to support both sync (SQLite) and async
/// backends. For SQLite, calls run under `spawn_blocking` so the runtime
/// never blocks.
///
/// # Design Notes
///
/// - **Upserts**: record writes are last-write-wins; the protocol handle
///   serializes conflicting operations before they reach the store.
/// - **Addressed treasuries**: treasuries are keyed by their derived
///   [`RecordAddress`], so one owner maps to exactly one row.
/// - **Append-only events**: the audit log is never rewritten; `seq` is
///   assigned by the store and strictly increases.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────
    // Treasury Records
    // ─────────────────────────────────────────────────────────────────────

    /// Get the treasury record at the given address.
    async fn get_treasury(&self, address: &RecordAddress) -> Result<Option<TreasuryAccount>>;

    /// Insert or replace the treasury record at the given address.
    async fn upsert_treasury(
        &self,
        address: &RecordAddress,
        record: &TreasuryAccount,
    ) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────
    // Oracle Records
    // ─────────────────────────────────────────────────────────────────────

    /// Get an oracle record by identity.
    async fn get_oracle(&self, identity: &AccountId) -> Result<Option<OracleAccount>>;

    /// Insert or replace an oracle record.
    async fn upsert_oracle(&self, record: &OracleAccount) -> Result<()>;

    /// List all oracle records.
    async fn list_oracles(&self) -> Result<Vec<OracleAccount>>;

    // ─────────────────────────────────────────────────────────────────────
    // User Records
    // ─────────────────────────────────────────────────────────────────────

    /// Get a user reward record by identity.
    async fn get_user(&self, identity: &AccountId) -> Result<Option<UserRewardAccount>>;

    /// Insert or replace a user reward record.
    async fn upsert_user(&self, record: &UserRewardAccount) -> Result<()>;

    /// List all user reward records.
    async fn list_users(&self) -> Result<Vec<UserRewardAccount>>;

    // ─────────────────────────────────────────────────────────────────────
    // Event Audit Log
    // ─────────────────────────────────────────────────────────────────────

    /// Append an event to the audit log, returning its sequence number.
    async fn append_event(&self, event: &LedgerEvent, recorded_at: i64) -> Result<u64>;

    /// Get all events with `seq > after_seq`, ordered by seq.
    async fn events_since(&self, after_seq: u64) -> Result<Vec<StoredEvent>>;

    /// Total number of events in the log.
    async fn event_count(&self) -> Result<u64>;
}
