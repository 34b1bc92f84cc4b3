//! # Bounty
//!
//! The unified API for the Bounty reward-distribution protocol: a shared
//! treasury accumulates yield, periodically splits it between a
//! user-claimable pool and a reserve, and releases claimable funds only
//! against attestations signed by staked oracles.
//!
//! ## Overview
//!
//! - **Treasury**: one record per owner; harvests split yield 50/50
//!   between the claimable pool and the reserve.
//! - **Oracles**: off-chain attesters backed by staked collateral;
//!   slashing moves stake into the reserve and, at zero, revokes
//!   attestation authority.
//! - **Claims**: a recipient redeems a signed `(recipient, issued_at,
//!   amount)` attestation; double-claims inside the claim interval are
//!   rejected, and every balance change uses checked arithmetic.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bounty::{Protocol, SystemClock};
//! use bounty::settlement::NoopSettlement;
//! use bounty::core::AccountId;
//! use bounty::ledger::ProtocolParams;
//! use bounty::store::SqliteStore;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let store = SqliteStore::open("bounty.db")?;
//!     let protocol = Protocol::new(
//!         ProtocolParams::default(),
//!         store,
//!         NoopSettlement,
//!         Arc::new(SystemClock),
//!     );
//!
//!     let owner = AccountId::from_bytes([1; 32]);
//!     protocol.initialize_treasury(owner).await?;
//!     protocol.harvest_and_rebalance(owner, 1_000).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `bounty::core` - Identities, attestations, crypto strong types
//! - `bounty::ledger` - The pure state machine and error taxonomy
//! - `bounty::store` - Storage abstraction, SQLite and memory backends
//! - `bounty::sched` - Periodic scheduling and the harvest driver

pub mod clock;
pub mod error;
pub mod protocol;
pub mod settlement;

// Re-export component crates
pub use bounty_core as core;
pub use bounty_ledger as ledger;
pub use bounty_sched as sched;
pub use bounty_store as store;

// Re-export main types for convenience
pub use clock::{Clock, SystemClock};
pub use error::{ProtocolError, Result};
pub use protocol::{HarvestHandle, Protocol};
pub use settlement::{Settlement, SettlementError};

// Re-export commonly used core types
pub use bounty_core::{AccountId, Attestation, Keypair, PublicKey, RecordAddress, Signature};
pub use bounty_ledger::{Ledger, LedgerError, LedgerEvent, ProtocolParams};
