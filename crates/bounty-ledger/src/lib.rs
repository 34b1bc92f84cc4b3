//! # Bounty Ledger
//!
//! The ledger state machine of the Bounty protocol: treasury lifecycle,
//! harvest/rebalance, oracle registration and slashing, and the
//! signature-gated reward-claim path.
//!
//! Everything in this crate is pure synchronous computation. Time enters
//! as an explicit `now` argument; persistence and settlement live in the
//! surrounding crates. Each operation validates against a single snapshot
//! of the records it touches and mutates nothing unless every check
//! passes.
//!
//! ## Key Types
//!
//! - [`Ledger`] - An explicit handle over one treasury's working set
//! - [`TreasuryAccount`] / [`OracleAccount`] / [`UserRewardAccount`] - The
//!   three persistent record types
//! - [`LedgerEvent`] - The structured record emitted by each mutation
//! - [`LedgerError`] - The full caller-visible error taxonomy

pub mod error;
pub mod events;
pub mod ledger;
pub mod oracle;
pub mod params;
pub mod treasury;
pub mod user;

pub use error::LedgerError;
pub use events::LedgerEvent;
pub use ledger::Ledger;
pub use oracle::OracleAccount;
pub use params::ProtocolParams;
pub use treasury::TreasuryAccount;
pub use user::UserRewardAccount;
