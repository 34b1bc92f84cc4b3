//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via `tokio::task::spawn_blocking`.
//!
//! Amount columns hold `u64` values bit-cast to `i64`; the cast is a
//! bijection, so values round-trip exactly even above `i64::MAX`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use bounty_core::{AccountId, PublicKey, RecordAddress};
use bounty_ledger::{LedgerEvent, OracleAccount, TreasuryAccount, UserRewardAccount};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{Store, StoredEvent};

/// SQLite-based store implementation.
///
/// Thread-safe via an internal Mutex. All operations run under
/// `spawn_blocking` to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection off the runtime.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::InvalidData("connection mutex poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::TaskJoin(e.to_string()))?
    }
}

/// Convert a BLOB column into a fixed 32-byte array.
fn blob32(bytes: Vec<u8>, field: &str) -> Result<[u8; 32]> {
    bytes
        .try_into()
        .map_err(|_| StoreError::InvalidData(format!("{field}: expected 32 bytes")))
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_treasury(&self, address: &RecordAddress) -> Result<Option<TreasuryAccount>> {
        let address = *address;
        self.run(move |conn| {
            let row = conn
                .query_row(
                    "SELECT owner, last_harvest_at, claimable_pool, reserve_balance,
                            total_distributed, total_harvested, total_slashed
                     FROM treasuries WHERE address = ?1",
                    params![address.as_bytes().to_vec()],
                    |row| {
                        Ok((
                            row.get::<_, Vec<u8>>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, i64>(4)?,
                            row.get::<_, i64>(5)?,
                            row.get::<_, i64>(6)?,
                        ))
                    },
                )
                .optional()?;

            row.map(|(owner, last_harvest_at, pool, reserve, distributed, harvested, slashed)| {
                Ok(TreasuryAccount {
                    owner: AccountId::from_bytes(blob32(owner, "owner")?),
                    last_harvest_at,
                    claimable_pool: pool as u64,
                    reserve_balance: reserve as u64,
                    total_distributed: distributed as u64,
                    total_harvested: harvested as u64,
                    total_slashed: slashed as u64,
                })
            })
            .transpose()
        })
        .await
    }

    async fn upsert_treasury(
        &self,
        address: &RecordAddress,
        record: &TreasuryAccount,
    ) -> Result<()> {
        let address = *address;
        let record = record.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO treasuries (
                    address, owner, last_harvest_at, claimable_pool, reserve_balance,
                    total_distributed, total_harvested, total_slashed
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    address.as_bytes().to_vec(),
                    record.owner.as_bytes().to_vec(),
                    record.last_harvest_at,
                    record.claimable_pool as i64,
                    record.reserve_balance as i64,
                    record.total_distributed as i64,
                    record.total_harvested as i64,
                    record.total_slashed as i64,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_oracle(&self, identity: &AccountId) -> Result<Option<OracleAccount>> {
        let identity = *identity;
        self.run(move |conn| {
            let row = conn
                .query_row(
                    "SELECT key, stake, registered_at, slash_count, last_slash_at
                     FROM oracles WHERE identity = ?1",
                    params![identity.as_bytes().to_vec()],
                    |row| {
                        Ok((
                            row.get::<_, Vec<u8>>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, i64>(4)?,
                        ))
                    },
                )
                .optional()?;

            row.map(|(key, stake, registered_at, slash_count, last_slash_at)| {
                Ok(OracleAccount {
                    identity,
                    key: PublicKey::from_bytes(blob32(key, "key")?),
                    stake: stake as u64,
                    registered_at,
                    slash_count: slash_count as u32,
                    last_slash_at,
                })
            })
            .transpose()
        })
        .await
    }

    async fn upsert_oracle(&self, record: &OracleAccount) -> Result<()> {
        let record = record.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO oracles (
                    identity, key, stake, registered_at, slash_count, last_slash_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.identity.as_bytes().to_vec(),
                    record.key.as_bytes().to_vec(),
                    record.stake as i64,
                    record.registered_at,
                    i64::from(record.slash_count),
                    record.last_slash_at,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_oracles(&self) -> Result<Vec<OracleAccount>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT identity, key, stake, registered_at, slash_count, last_slash_at
                 FROM oracles ORDER BY identity",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, Vec<u8>>(0)?,
                    row.get::<_, Vec<u8>>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?;

            let mut oracles = Vec::new();
            for row in rows {
                let (identity, key, stake, registered_at, slash_count, last_slash_at) = row?;
                oracles.push(OracleAccount {
                    identity: AccountId::from_bytes(blob32(identity, "identity")?),
                    key: PublicKey::from_bytes(blob32(key, "key")?),
                    stake: stake as u64,
                    registered_at,
                    slash_count: slash_count as u32,
                    last_slash_at,
                });
            }
            Ok(oracles)
        })
        .await
    }

    async fn get_user(&self, identity: &AccountId) -> Result<Option<UserRewardAccount>> {
        let identity = *identity;
        self.run(move |conn| {
            let row = conn
                .query_row(
                    "SELECT last_claim_at, total_claimed, claim_count
                     FROM users WHERE identity = ?1",
                    params![identity.as_bytes().to_vec()],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, i64>(2)?,
                        ))
                    },
                )
                .optional()?;

            Ok(row.map(|(last_claim_at, total_claimed, claim_count)| UserRewardAccount {
                identity,
                last_claim_at,
                total_claimed: total_claimed as u64,
                claim_count: claim_count as u32,
            }))
        })
        .await
    }

    async fn upsert_user(&self, record: &UserRewardAccount) -> Result<()> {
        let record = record.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO users (
                    identity, last_claim_at, total_claimed, claim_count
                 ) VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.identity.as_bytes().to_vec(),
                    record.last_claim_at,
                    record.total_claimed as i64,
                    i64::from(record.claim_count),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_users(&self) -> Result<Vec<UserRewardAccount>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT identity, last_claim_at, total_claimed, claim_count
                 FROM users ORDER BY identity",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, Vec<u8>>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?;

            let mut users = Vec::new();
            for row in rows {
                let (identity, last_claim_at, total_claimed, claim_count) = row?;
                users.push(UserRewardAccount {
                    identity: AccountId::from_bytes(blob32(identity, "identity")?),
                    last_claim_at,
                    total_claimed: total_claimed as u64,
                    claim_count: claim_count as u32,
                });
            }
            Ok(users)
        })
        .await
    }

    async fn append_event(&self, event: &LedgerEvent, recorded_at: i64) -> Result<u64> {
        let kind = event.kind();
        let at = event.at();
        let payload = serde_json::to_string(event)?;
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO events (kind, at, recorded_at, payload) VALUES (?1, ?2, ?3, ?4)",
                params![kind, at, recorded_at, payload],
            )?;
            Ok(conn.last_insert_rowid() as u64)
        })
        .await
    }

    async fn events_since(&self, after_seq: u64) -> Result<Vec<StoredEvent>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT seq, recorded_at, payload FROM events WHERE seq > ?1 ORDER BY seq",
            )?;
            let rows = stmt.query_map(params![after_seq as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;

            let mut events = Vec::new();
            for row in rows {
                let (seq, recorded_at, payload) = row?;
                let event: LedgerEvent = serde_json::from_str(&payload)?;
                events.push(StoredEvent {
                    seq: seq as u64,
                    recorded_at,
                    event,
                });
            }
            Ok(events)
        })
        .await
    }

    async fn event_count(&self) -> Result<u64> {
        self.run(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounty_core::Keypair;

    fn treasury() -> TreasuryAccount {
        let mut record = TreasuryAccount::new(AccountId::from_bytes([1; 32]), 1_000);
        record.claimable_pool = 500;
        record.reserve_balance = 501;
        record.total_harvested = 1_001;
        record
    }

    fn oracle() -> OracleAccount {
        let keypair = Keypair::from_seed(&[7; 32]);
        OracleAccount::new(
            AccountId::from(keypair.public_key()),
            keypair.public_key(),
            1_000_000_000,
            1_000,
        )
    }

    #[tokio::test]
    async fn test_treasury_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let record = treasury();
        let address = RecordAddress::derive_treasury(&record.owner);

        assert!(store.get_treasury(&address).await.unwrap().is_none());
        store.upsert_treasury(&address, &record).await.unwrap();
        assert_eq!(store.get_treasury(&address).await.unwrap().unwrap(), record);
    }

    #[tokio::test]
    async fn test_large_amounts_roundtrip() {
        // Values above i64::MAX must survive the bit-cast columns.
        let store = SqliteStore::open_memory().unwrap();
        let mut record = treasury();
        record.claimable_pool = u64::MAX;
        record.total_harvested = u64::MAX - 1;
        let address = RecordAddress::derive_treasury(&record.owner);

        store.upsert_treasury(&address, &record).await.unwrap();
        let loaded = store.get_treasury(&address).await.unwrap().unwrap();
        assert_eq!(loaded.claimable_pool, u64::MAX);
        assert_eq!(loaded.total_harvested, u64::MAX - 1);
    }

    #[tokio::test]
    async fn test_oracle_roundtrip_and_list() {
        let store = SqliteStore::open_memory().unwrap();
        let record = oracle();

        store.upsert_oracle(&record).await.unwrap();
        assert_eq!(
            store.get_oracle(&record.identity).await.unwrap().unwrap(),
            record
        );
        assert_eq!(store.list_oracles().await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let mut record = UserRewardAccount::new(AccountId::from_bytes([9; 32]));
        record.last_claim_at = 5_000;
        record.total_claimed = 750;
        record.claim_count = 2;

        store.upsert_user(&record).await.unwrap();
        assert_eq!(
            store.get_user(&record.identity).await.unwrap().unwrap(),
            record
        );
    }

    #[tokio::test]
    async fn test_event_log_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let event = LedgerEvent::Harvested {
            yield_amount: 1_000,
            user_share: 500,
            treasury_share: 500,
            at: 2_000,
        };

        let seq = store.append_event(&event, 2_001).await.unwrap();
        assert_eq!(seq, 1);

        let events = store.events_since(0).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, event);
        assert_eq!(events[0].recorded_at, 2_001);
        assert_eq!(store.event_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bounty.db");

        let record = treasury();
        let address = RecordAddress::derive_treasury(&record.owner);

        {
            let store = SqliteStore::open(&path).unwrap();
            store.upsert_treasury(&address, &record).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_treasury(&address).await.unwrap().unwrap(), record);
    }
}
