//! Proptest generators for property-based testing.

use proptest::prelude::*;

use bounty_core::{AccountId, Attestation, Keypair, PublicKey};

/// Generate a random keypair from an arbitrary seed.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random AccountId.
pub fn account_id() -> impl Strategy<Value = AccountId> {
    any::<[u8; 32]>().prop_map(AccountId::from_bytes)
}

/// Generate a random PublicKey backed by a real keypair.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a claimable amount within a modest range.
pub fn amount(max: u64) -> impl Strategy<Value = u64> {
    1u64..=max
}

/// Generate a realistic Unix timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    1_600_000_000i64..=1_900_000_000i64
}

/// An operation in a generated sequence, with the seconds to advance the
/// clock before applying it.
#[derive(Debug, Clone)]
pub enum OpSpec {
    /// Harvest `yield_amount` after advancing the clock.
    Harvest { advance: i64, yield_amount: u64 },

    /// Claim `amount` for one of the fixed recipients.
    Claim {
        advance: i64,
        recipient_index: u8,
        amount: u64,
    },

    /// Slash the oracle by `amount`.
    Slash { advance: i64, amount: u64 },
}

/// Generate one operation. Advances are short relative to the intervals
/// so sequences exercise both the gated and the permitted paths.
pub fn op() -> impl Strategy<Value = OpSpec> {
    prop_oneof![
        (0i64..200_000, 1u64..10_000_000).prop_map(|(advance, yield_amount)| OpSpec::Harvest {
            advance,
            yield_amount,
        }),
        (0i64..200_000, 0u8..4, 1u64..1_000_000).prop_map(
            |(advance, recipient_index, amount)| OpSpec::Claim {
                advance,
                recipient_index,
                amount,
            }
        ),
        (0i64..200_000, 1u64..1_000_000).prop_map(|(advance, amount)| OpSpec::Slash {
            advance,
            amount,
        }),
    ]
}

/// Generate a sequence of up to `max_len` operations.
pub fn op_sequence(max_len: usize) -> impl Strategy<Value = Vec<OpSpec>> {
    prop::collection::vec(op(), 0..=max_len)
}

/// A fixed set of recipients for generated claims, so rate limiting is
/// actually exercised.
pub fn recipients() -> [AccountId; 4] {
    [
        AccountId::from_bytes([0xa0; 32]),
        AccountId::from_bytes([0xa1; 32]),
        AccountId::from_bytes([0xa2; 32]),
        AccountId::from_bytes([0xa3; 32]),
    ]
}

/// Issue an attestation for a generated claim.
pub fn attest_for(
    oracle: &Keypair,
    recipient: AccountId,
    issued_at: i64,
    amount: u64,
) -> Attestation {
    Attestation::issue(oracle, recipient, issued_at, amount)
}
