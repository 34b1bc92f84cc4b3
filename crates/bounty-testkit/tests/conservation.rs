//! Conservation property: for any operation sequence, funds held plus
//! funds distributed equal funds that ever entered, and failures never
//! move a unit.

use proptest::prelude::*;

use bounty_core::Keypair;
use bounty_ledger::{Ledger, LedgerEvent, ProtocolParams};
use bounty_testkit::generators::{attest_for, op_sequence, recipients, OpSpec};

const T0: i64 = 1_700_000_000;
const ORACLE_STAKE: u64 = 1_000_000_000;

fn setup() -> (Ledger, Keypair) {
    let oracle = Keypair::from_seed(&[0x42; 32]);
    let mut ledger = Ledger::new(ProtocolParams::default());
    ledger
        .initialize_treasury(bounty_core::AccountId::from_bytes([0x01; 32]), T0)
        .expect("initialize");
    ledger
        .register_oracle(
            bounty_core::AccountId::from(oracle.public_key()),
            oracle.public_key(),
            ORACLE_STAKE,
            T0,
        )
        .expect("register oracle");
    (ledger, oracle)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn conservation_holds_for_all_sequences(ops in op_sequence(50)) {
        let owner = bounty_core::AccountId::from_bytes([0x01; 32]);
        let (mut ledger, oracle) = setup();
        let oracle_id = bounty_core::AccountId::from(oracle.public_key());
        let users = recipients();

        let mut now = T0;
        let mut harvested_total: u128 = 0;
        let mut slashed_total: u128 = 0;
        let mut claimed_total: u128 = 0;

        for op in ops {
            let before = ledger.clone();
            let result = match op {
                OpSpec::Harvest { advance, yield_amount } => {
                    now += advance;
                    ledger.harvest_and_rebalance(owner, yield_amount, now)
                }
                OpSpec::Claim { advance, recipient_index, amount } => {
                    now += advance;
                    let recipient = users[recipient_index as usize % users.len()];
                    let attestation = attest_for(&oracle, recipient, now, amount);
                    ledger.claim_reward(&attestation, oracle_id, now)
                }
                OpSpec::Slash { advance, amount } => {
                    now += advance;
                    ledger.slash_oracle(owner, oracle_id, amount, now)
                }
            };

            match result {
                Ok(LedgerEvent::Harvested { yield_amount, user_share, treasury_share, .. }) => {
                    prop_assert_eq!(user_share + treasury_share, yield_amount);
                    harvested_total += u128::from(yield_amount);
                }
                Ok(LedgerEvent::Claimed { amount, .. }) => {
                    claimed_total += u128::from(amount);
                }
                Ok(LedgerEvent::OracleSlashed { slash_amount, .. }) => {
                    slashed_total += u128::from(slash_amount);
                }
                Ok(other) => prop_assert!(false, "unexpected event: {:?}", other),
                Err(_) => {
                    // A failed operation leaves every record untouched.
                    prop_assert_eq!(&ledger, &before);
                }
            }

            prop_assert!(ledger.conservation_holds());
        }

        // Cross-check against the tallies from emitted events.
        let treasury = ledger.treasury().expect("treasury");
        let held = u128::from(treasury.claimable_pool)
            + u128::from(treasury.reserve_balance)
            + u128::from(treasury.total_distributed);
        prop_assert_eq!(held, harvested_total + slashed_total);

        let user_sum: u128 = ledger.users().map(|u| u128::from(u.total_claimed)).sum();
        prop_assert_eq!(user_sum, claimed_total);
        prop_assert_eq!(u128::from(treasury.total_distributed), claimed_total);
    }

    #[test]
    fn total_claimed_is_monotone(ops in op_sequence(40)) {
        let owner = bounty_core::AccountId::from_bytes([0x01; 32]);
        let (mut ledger, oracle) = setup();
        let oracle_id = bounty_core::AccountId::from(oracle.public_key());
        let users = recipients();

        let mut now = T0;
        for op in ops {
            let totals_before: Vec<u64> =
                users.iter().map(|u| ledger.user(u).map(|r| r.total_claimed).unwrap_or(0)).collect();

            match op {
                OpSpec::Harvest { advance, yield_amount } => {
                    now += advance;
                    let _ = ledger.harvest_and_rebalance(owner, yield_amount, now);
                }
                OpSpec::Claim { advance, recipient_index, amount } => {
                    now += advance;
                    let recipient = users[recipient_index as usize % users.len()];
                    let attestation = attest_for(&oracle, recipient, now, amount);
                    let _ = ledger.claim_reward(&attestation, oracle_id, now);
                }
                OpSpec::Slash { advance, amount } => {
                    now += advance;
                    let _ = ledger.slash_oracle(owner, oracle_id, amount, now);
                }
            }

            for (user, before) in users.iter().zip(totals_before) {
                let after = ledger.user(user).map(|r| r.total_claimed).unwrap_or(0);
                prop_assert!(after >= before);
            }
        }
    }
}
