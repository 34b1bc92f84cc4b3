//! # Bounty Core
//!
//! Pure primitives for the Bounty reward-distribution protocol:
//! identities, attestations, and achievement payloads.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`AccountId`] - Opaque identity of a protocol participant
//! - [`RecordAddress`] - Deterministic storage address for a ledger record
//! - [`Attestation`] - A signed claim that a recipient is owed an amount
//! - [`Achievement`] - The closed payload an oracle prices into a reward
//!
//! ## Attestation format
//!
//! Attestations are signed over a deterministic byte layout, never over an
//! ad-hoc string. See [`attestation::attestation_message`].

pub mod achievement;
pub mod attestation;
pub mod crypto;
pub mod error;
pub mod identity;

pub use achievement::{Achievement, Rarity};
pub use attestation::{attestation_message, Attestation};
pub use crypto::{Blake3Hash, Keypair, PublicKey, Signature};
pub use error::CoreError;
pub use identity::{AccountId, RecordAddress};
