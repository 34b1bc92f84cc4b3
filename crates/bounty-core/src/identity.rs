//! Identity and addressing types.
//!
//! Participants (owners, recipients, oracles) are identified by an opaque
//! 32-byte [`AccountId`]. Ledger records live at a [`RecordAddress`]
//! derived from the identity they belong to, so "one treasury per owner"
//! and "one oracle record per oracle identity" fall out of the address
//! derivation rather than being enforced by a registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::PublicKey;

/// A 32-byte participant identity.
///
/// For participants that sign (oracles), this is the Ed25519 public key.
/// For plain recipients it is any stable 32-byte identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero identity (sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<PublicKey> for AccountId {
    fn from(key: PublicKey) -> Self {
        Self(key.0)
    }
}

/// A 32-byte storage address for a ledger record.
///
/// Derived as a domain-separated Blake3 hash of the identity the record
/// belongs to. Two records of different kinds for the same identity get
/// distinct addresses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordAddress(pub [u8; 32]);

impl RecordAddress {
    /// The address of the treasury record owned by `owner`.
    pub fn derive_treasury(owner: &AccountId) -> Self {
        Self::derive(b"bounty-treasury-v0:", owner)
    }

    /// The address of the oracle record for `oracle`.
    pub fn derive_oracle(oracle: &AccountId) -> Self {
        Self::derive(b"bounty-oracle-v0:", oracle)
    }

    /// The address of the user reward record for `user`.
    pub fn derive_user(user: &AccountId) -> Self {
        Self::derive(b"bounty-user-v0:", user)
    }

    fn derive(domain: &[u8], id: &AccountId) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(&id.0);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordAddress({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for RecordAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    #[test]
    fn test_treasury_address_deterministic() {
        let owner = AccountId::from_bytes([0x11; 32]);
        let a1 = RecordAddress::derive_treasury(&owner);
        let a2 = RecordAddress::derive_treasury(&owner);
        assert_eq!(a1, a2);

        let other = AccountId::from_bytes([0x22; 32]);
        assert_ne!(a1, RecordAddress::derive_treasury(&other));
    }

    #[test]
    fn test_record_kinds_do_not_collide() {
        let id = AccountId::from_bytes([0x33; 32]);
        let treasury = RecordAddress::derive_treasury(&id);
        let oracle = RecordAddress::derive_oracle(&id);
        let user = RecordAddress::derive_user(&id);
        assert_ne!(treasury, oracle);
        assert_ne!(treasury, user);
        assert_ne!(oracle, user);
    }

    #[test]
    fn test_account_id_from_public_key() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let id = AccountId::from(keypair.public_key());
        assert_eq!(id.as_bytes(), keypair.public_key().as_bytes());
    }

    #[test]
    fn test_account_id_hex_roundtrip() {
        let id = AccountId::from_bytes([0xab; 32]);
        let recovered = AccountId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, recovered);
    }
}
