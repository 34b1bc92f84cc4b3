//! Golden attestation vectors for cross-implementation verification.
//!
//! Every implementation of the protocol must produce identical:
//! - message bytes for `(recipient, issued_at, amount)`
//! - Ed25519 signatures for a given seed (the scheme is deterministic)
//!
//! Vectors carry hex-encoded inputs and derived outputs; the message
//! layout itself is pinned byte-for-byte in the tests below.

use serde::{Deserialize, Serialize};

use bounty_core::{attestation_message, AccountId, Attestation, Keypair};

/// A single golden test vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttestationVector {
    pub name: String,

    // Inputs
    pub oracle_seed: String, // 32 bytes hex
    pub oracle_pk: String,   // 32 bytes hex (derived)
    pub recipient: String,   // 32 bytes hex
    pub issued_at: i64,
    pub amount: u64,

    // Derived outputs (hex)
    pub message: String,
    pub signature: String, // 64 bytes
}

/// Generate a golden vector from inputs.
pub fn generate_vector(
    name: &str,
    seed: [u8; 32],
    recipient: [u8; 32],
    issued_at: i64,
    amount: u64,
) -> AttestationVector {
    let oracle = Keypair::from_seed(&seed);
    let recipient = AccountId::from_bytes(recipient);

    let message = attestation_message(&recipient, issued_at, amount);
    let attestation = Attestation::issue(&oracle, recipient, issued_at, amount);

    AttestationVector {
        name: name.to_string(),
        oracle_seed: hex::encode(seed),
        oracle_pk: oracle.public_key().to_hex(),
        recipient: recipient.to_hex(),
        issued_at,
        amount,
        message: hex::encode(&message),
        signature: attestation.signature.to_hex(),
    }
}

/// The standard vector set.
pub fn all_vectors() -> Vec<AttestationVector> {
    vec![
        generate_vector("zero-values", [0x11; 32], [0x00; 32], 0, 0),
        generate_vector(
            "typical-claim",
            [0x42; 32],
            [0x09; 32],
            1_700_000_000,
            500,
        ),
        generate_vector(
            "max-amount",
            [0x42; 32],
            [0x09; 32],
            1_700_000_000,
            u64::MAX,
        ),
        generate_vector(
            "negative-timestamp",
            [0x7f; 32],
            [0xff; 32],
            -1,
            1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounty_core::PublicKey;

    /// Domain prefix (22 bytes) + recipient (32) + issued_at (8) +
    /// amount (8).
    const MESSAGE_LEN: usize = 22 + 32 + 8 + 8;

    #[test]
    fn test_vectors_are_deterministic() {
        let a = all_vectors();
        let b = all_vectors();
        for (va, vb) in a.iter().zip(b.iter()) {
            assert_eq!(va.message, vb.message, "{}", va.name);
            assert_eq!(va.signature, vb.signature, "{}", va.name);
            assert_eq!(va.oracle_pk, vb.oracle_pk, "{}", va.name);
        }
    }

    #[test]
    fn test_vector_signatures_verify() {
        for vector in all_vectors() {
            let key = PublicKey::from_hex(&vector.oracle_pk).unwrap();
            let recipient = AccountId::from_hex(&vector.recipient).unwrap();
            let mut sig = [0u8; 64];
            hex::decode_to_slice(&vector.signature, &mut sig).unwrap();

            let attestation = Attestation {
                recipient,
                issued_at: vector.issued_at,
                amount: vector.amount,
                signature: bounty_core::Signature::from_bytes(sig),
            };
            attestation
                .verify(&key)
                .unwrap_or_else(|e| panic!("{}: {e}", vector.name));
        }
    }

    #[test]
    fn test_message_layout_is_pinned() {
        // The message layout is computable by hand: ASCII domain prefix,
        // then recipient, then big-endian issued_at and amount.
        let vector = generate_vector(
            "layout",
            [0x42; 32],
            [0x09; 32],
            1_700_000_000,
            500,
        );

        let mut expected = String::new();
        expected.push_str(&hex::encode(b"bounty-attestation-v0:"));
        expected.push_str(&"09".repeat(32));
        expected.push_str(&hex::encode(1_700_000_000i64.to_be_bytes()));
        expected.push_str(&hex::encode(500u64.to_be_bytes()));

        assert_eq!(vector.message, expected);
        assert_eq!(vector.message.len(), MESSAGE_LEN * 2);
    }

    #[test]
    fn test_vectors_are_distinct() {
        let vectors = all_vectors();
        for (i, a) in vectors.iter().enumerate() {
            for b in vectors.iter().skip(i + 1) {
                assert_ne!(a.message, b.message, "{} vs {}", a.name, b.name);
                assert_ne!(a.signature, b.signature, "{} vs {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_vectors_serialize_to_json() {
        let json = serde_json::to_string_pretty(&all_vectors()).unwrap();
        assert!(json.contains("typical-claim"));
        let parsed: Vec<AttestationVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), all_vectors().len());
    }
}
