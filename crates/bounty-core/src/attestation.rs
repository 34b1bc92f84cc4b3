//! Attestation: a signed claim that a recipient earned a reward.
//!
//! An attestation is built entirely off-chain by an oracle, handed to the
//! recipient, and verified by the ledger at claim time. The ledger never
//! stores one.

use serde::{Deserialize, Serialize};

use crate::crypto::{Blake3Hash, Keypair, PublicKey, Signature};
use crate::error::CoreError;
use crate::identity::AccountId;

/// Domain prefix for attestation messages. Versioned so a future layout
/// change cannot produce signatures valid under both layouts.
const ATTESTATION_DOMAIN: &[u8] = b"bounty-attestation-v0:";

/// Build the canonical signed message for `(recipient, issued_at, amount)`.
///
/// Layout: domain prefix, then the 32 recipient bytes, then `issued_at`
/// and `amount` as big-endian fixed-width integers. Fixed widths keep the
/// encoding injective without delimiters.
pub fn attestation_message(recipient: &AccountId, issued_at: i64, amount: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ATTESTATION_DOMAIN.len() + 32 + 8 + 8);
    buf.extend_from_slice(ATTESTATION_DOMAIN);
    buf.extend_from_slice(&recipient.0);
    buf.extend_from_slice(&issued_at.to_be_bytes());
    buf.extend_from_slice(&amount.to_be_bytes());
    buf
}

/// A signed reward attestation. Transient: verified, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// The recipient the reward is owed to.
    pub recipient: AccountId,

    /// Oracle-claimed issuance time (Unix seconds).
    pub issued_at: i64,

    /// The reward amount certified by the oracle.
    pub amount: u64,

    /// Ed25519 signature over [`attestation_message`].
    pub signature: Signature,
}

impl Attestation {
    /// Issue an attestation: the oracle-side construction path.
    pub fn issue(oracle: &Keypair, recipient: AccountId, issued_at: i64, amount: u64) -> Self {
        let message = attestation_message(&recipient, issued_at, amount);
        let signature = oracle.sign(&message);
        Self {
            recipient,
            issued_at,
            amount,
            signature,
        }
    }

    /// Verify the signature against an oracle key.
    ///
    /// Purely cryptographic. Whether the oracle is still active (staked)
    /// is ledger policy, checked by the claim operation.
    pub fn verify(&self, oracle_key: &PublicKey) -> Result<(), CoreError> {
        let message = attestation_message(&self.recipient, self.issued_at, self.amount);
        oracle_key.verify(&message, &self.signature)
    }

    /// Content digest of the attestation: `Blake3(message || signature)`.
    ///
    /// A stable identifier for audit trails and deduplication. The ledger
    /// does not store digests; replay protection is interval-based.
    pub fn digest(&self) -> Blake3Hash {
        let mut buf = attestation_message(&self.recipient, self.issued_at, self.amount);
        buf.extend_from_slice(&self.signature.0);
        Blake3Hash::hash(&buf)
    }
}
