//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use bounty_core::{AccountId, RecordAddress};
use bounty_ledger::{LedgerEvent, OracleAccount, TreasuryAccount, UserRewardAccount};

use crate::error::{Result, StoreError};
use crate::traits::{Store, StoredEvent};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    treasuries: HashMap<RecordAddress, TreasuryAccount>,
    oracles: HashMap<AccountId, OracleAccount>,
    users: HashMap<AccountId, UserRewardAccount>,
    events: Vec<StoredEvent>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::InvalidData("store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::InvalidData("store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_treasury(&self, address: &RecordAddress) -> Result<Option<TreasuryAccount>> {
        Ok(self.read()?.treasuries.get(address).cloned())
    }

    async fn upsert_treasury(
        &self,
        address: &RecordAddress,
        record: &TreasuryAccount,
    ) -> Result<()> {
        self.write()?.treasuries.insert(*address, record.clone());
        Ok(())
    }

    async fn get_oracle(&self, identity: &AccountId) -> Result<Option<OracleAccount>> {
        Ok(self.read()?.oracles.get(identity).cloned())
    }

    async fn upsert_oracle(&self, record: &OracleAccount) -> Result<()> {
        self.write()?.oracles.insert(record.identity, record.clone());
        Ok(())
    }

    async fn list_oracles(&self) -> Result<Vec<OracleAccount>> {
        let mut oracles: Vec<OracleAccount> = self.read()?.oracles.values().cloned().collect();
        oracles.sort_by_key(|o| o.identity);
        Ok(oracles)
    }

    async fn get_user(&self, identity: &AccountId) -> Result<Option<UserRewardAccount>> {
        Ok(self.read()?.users.get(identity).cloned())
    }

    async fn upsert_user(&self, record: &UserRewardAccount) -> Result<()> {
        self.write()?.users.insert(record.identity, record.clone());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRewardAccount>> {
        let mut users: Vec<UserRewardAccount> = self.read()?.users.values().cloned().collect();
        users.sort_by_key(|u| u.identity);
        Ok(users)
    }

    async fn append_event(&self, event: &LedgerEvent, recorded_at: i64) -> Result<u64> {
        let mut inner = self.write()?;
        let seq = inner.events.len() as u64 + 1;
        inner.events.push(StoredEvent {
            seq,
            recorded_at,
            event: event.clone(),
        });
        Ok(seq)
    }

    async fn events_since(&self, after_seq: u64) -> Result<Vec<StoredEvent>> {
        Ok(self
            .read()?
            .events
            .iter()
            .filter(|e| e.seq > after_seq)
            .cloned()
            .collect())
    }

    async fn event_count(&self) -> Result<u64> {
        Ok(self.read()?.events.len() as u64)
    }
}
