//! End-to-end lifecycle: harvest, claim, rate limit, slash, over-slash.

use bounty::core::{Achievement, Rarity};
use bounty::{LedgerError, ProtocolError, RecordAddress};
use bounty_testkit::TestFixture;

#[tokio::test]
async fn test_full_lifecycle() {
    let fixture = TestFixture::new();
    let (protocol, settlement) = fixture.protocol().await;
    let min_stake = fixture.params.min_oracle_stake;

    // Harvest 1000 after the interval: 50/50 split.
    fixture.clock.advance(fixture.params.harvest_interval_secs);
    protocol
        .harvest_and_rebalance(fixture.owner, 1_000)
        .await
        .unwrap();

    let treasury = protocol.treasury().await.unwrap();
    assert_eq!(treasury.claimable_pool, 500);
    assert_eq!(treasury.reserve_balance, 500);

    // A valid claim for the full user share drains the pool and settles
    // to the recipient.
    let attestation = fixture.attest(500);
    protocol
        .claim_reward(&attestation, fixture.oracle_id())
        .await
        .unwrap();

    let treasury = protocol.treasury().await.unwrap();
    assert_eq!(treasury.claimable_pool, 0);
    let user = protocol.user(&fixture.recipient).await.unwrap();
    assert_eq!(user.total_claimed, 500);

    let transfers = settlement.transfers();
    assert_eq!(
        transfers,
        vec![(
            RecordAddress::derive_treasury(&fixture.owner),
            fixture.recipient,
            500
        )]
    );

    // An immediate second claim is rate-limited and settles nothing.
    let again = fixture.attest(500);
    let err = protocol
        .claim_reward(&again, fixture.oracle_id())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Ledger(LedgerError::ClaimTooSoon { .. })
    ));
    assert!(err.is_temporal());
    assert_eq!(settlement.transfer_count(), 1);

    // Slashing moves stake into the reserve.
    protocol
        .slash_oracle(fixture.owner, fixture.oracle_id(), 100)
        .await
        .unwrap();
    assert_eq!(
        protocol.oracle(&fixture.oracle_id()).await.unwrap().stake,
        min_stake - 100
    );
    assert_eq!(protocol.treasury().await.unwrap().reserve_balance, 600);

    // Over-slashing is a hard error with no state change.
    let err = protocol
        .slash_oracle(fixture.owner, fixture.oracle_id(), min_stake)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Ledger(LedgerError::InsufficientStake { .. })
    ));
    assert_eq!(
        protocol.oracle(&fixture.oracle_id()).await.unwrap().stake,
        min_stake - 100
    );
    assert_eq!(protocol.treasury().await.unwrap().reserve_balance, 600);
}

#[tokio::test]
async fn test_event_log_records_each_mutation() {
    let fixture = TestFixture::new();
    let (protocol, _settlement) = fixture.protocol().await;

    fixture.clock.advance(fixture.params.harvest_interval_secs);
    protocol
        .harvest_and_rebalance(fixture.owner, 1_000)
        .await
        .unwrap();
    // Claim the reward the attester priced from an observed achievement:
    // base 100 at Legendary (300%) pays 300.
    let achievement = Achievement {
        id: "speedrun-any-percent".into(),
        rarity: Rarity::Legendary,
        amount: 100,
    };
    protocol
        .claim_reward(&fixture.attest_achievement(&achievement), fixture.oracle_id())
        .await
        .unwrap();
    protocol
        .slash_oracle(fixture.owner, fixture.oracle_id(), 50)
        .await
        .unwrap();

    let events = protocol.events_since(0).await.unwrap();
    let kinds: Vec<&str> = events.iter().map(|e| e.event.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "treasury_initialized",
            "oracle_registered",
            "harvested",
            "claimed",
            "oracle_slashed",
        ]
    );

    // Seq is dense and monotone.
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.seq, i as u64 + 1);
    }

    // Failed operations add nothing.
    let count = events.len();
    let err = protocol
        .harvest_and_rebalance(fixture.owner, 1_000)
        .await
        .unwrap_err();
    assert!(err.is_temporal());
    assert_eq!(protocol.events_since(0).await.unwrap().len(), count);
}
