//! Structured events emitted by ledger operations.
//!
//! Every successful mutation emits exactly one event; failed operations
//! emit nothing. The store persists these as the audit log.

use serde::{Deserialize, Serialize};

use bounty_core::AccountId;

/// The event record emitted by a successful ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A treasury was created.
    TreasuryInitialized { owner: AccountId, at: i64 },

    /// Yield was harvested and split between the pools.
    Harvested {
        yield_amount: u64,
        user_share: u64,
        treasury_share: u64,
        at: i64,
    },

    /// A user redeemed an attestation.
    Claimed {
        recipient: AccountId,
        amount: u64,
        at: i64,
    },

    /// An oracle posted stake and registered.
    OracleRegistered {
        oracle: AccountId,
        stake: u64,
        at: i64,
    },

    /// An oracle's stake was reduced into the reserve.
    OracleSlashed {
        oracle: AccountId,
        slash_amount: u64,
        remaining_stake: u64,
        at: i64,
    },

    /// A user record was created eagerly.
    UserRegistered { user: AccountId, at: i64 },
}

impl LedgerEvent {
    /// Stable discriminant, used as the audit-log row kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::TreasuryInitialized { .. } => "treasury_initialized",
            LedgerEvent::Harvested { .. } => "harvested",
            LedgerEvent::Claimed { .. } => "claimed",
            LedgerEvent::OracleRegistered { .. } => "oracle_registered",
            LedgerEvent::OracleSlashed { .. } => "oracle_slashed",
            LedgerEvent::UserRegistered { .. } => "user_registered",
        }
    }

    /// The operation timestamp carried by the event.
    pub fn at(&self) -> i64 {
        match self {
            LedgerEvent::TreasuryInitialized { at, .. }
            | LedgerEvent::Harvested { at, .. }
            | LedgerEvent::Claimed { at, .. }
            | LedgerEvent::OracleRegistered { at, .. }
            | LedgerEvent::OracleSlashed { at, .. }
            | LedgerEvent::UserRegistered { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_at() {
        let event = LedgerEvent::Harvested {
            yield_amount: 1_000,
            user_share: 500,
            treasury_share: 500,
            at: 42,
        };
        assert_eq!(event.kind(), "harvested");
        assert_eq!(event.at(), 42);
    }

    #[test]
    fn test_json_shape_is_tagged() {
        let event = LedgerEvent::Claimed {
            recipient: AccountId::from_bytes([1; 32]),
            amount: 500,
            at: 42,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"claimed\""));
        assert!(json.contains("\"amount\":500"));
    }
}
