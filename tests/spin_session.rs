#![allow(non_snake_case)]

use roulette_client::{
    Bet,
    SessionState,
    SpinError,
    WagerSession,
    ledger::Address,
    outcome::{
        Outcome,
        classify,
    },
    sim::SimLedger,
};

const PLAYER: Address = Address([7u8; 32]);

fn session_with_coins(values: &[u64]) -> (SimLedger, WagerSession) {
    let ledger = SimLedger::new();
    ledger.fund(PLAYER, values);
    let session = WagerSession::new(Some(PLAYER), ledger.chip_token());
    (ledger, session)
}

#[tokio::test]
async fn spin__straight_number_hit_pays_36x() {
    // given: a single coin, so funding is one split with no merge
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.set_wheel_number(7);

    // when
    let state = session.spin(&ledger, Some(Bet::Number(7)), "1").await;

    // then
    let SessionState::Settled(settlement) = state else {
        panic!("expected Settled, got {state:?}");
    };
    assert!(settlement.won());
    assert_eq!(settlement.deposit, 1_000_000);
    assert_eq!(settlement.payout, 36_000_000);
    assert_eq!(classify(settlement), Outcome::Won { jackpot: false });
    assert_eq!(ledger.submission_count(), 1);
}

#[tokio::test]
async fn spin__fragmented_holdings_fund_the_wager() {
    // given: no single coin covers the 1,000,000 target
    let (ledger, mut session) = session_with_coins(&[300_000, 300_000, 500_000]);
    ledger.set_wheel_number(8); // black; a red bet loses

    // when
    let state = session.spin(&ledger, Some(Bet::Red), "1").await;

    // then
    let SessionState::Settled(settlement) = state else {
        panic!("expected Settled, got {state:?}");
    };
    assert!(!settlement.won());
    assert_eq!(classify(settlement), Outcome::LostAll);
    // Change from the merged-then-split holdings survives.
    let balance = session.refresh_balance(&ledger).await.unwrap();
    assert_eq!(balance, 100_000);
}

#[tokio::test]
async fn spin__amount_parsing_truncates_never_rounds_up() {
    let (ledger, mut session) = session_with_coins(&[2_000_000]);
    ledger.set_wheel_number(0);

    let state = session.spin(&ledger, Some(Bet::Number(0)), "1.2345678").await;

    let SessionState::Settled(settlement) = state else {
        panic!("expected Settled, got {state:?}");
    };
    // 1.2345678 chips floors to 1,234,567 minor units.
    assert_eq!(settlement.deposit, 1_234_567);
}

#[tokio::test]
async fn spin__multiplier_draw_needs_no_selection() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.rig_draw(20, 10);

    let state = session.spin(&ledger, None, "1").await;

    let SessionState::Settled(settlement) = state else {
        panic!("expected Settled, got {state:?}");
    };
    assert_eq!(settlement.payout, 2_000_000);
    assert_eq!(classify(settlement), Outcome::Won { jackpot: false });
}

#[tokio::test]
async fn spin__sub_unit_draw_is_a_partial_loss() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.rig_draw(5, 10);

    let state = session.spin(&ledger, None, "1").await;

    let SessionState::Settled(settlement) = state else {
        panic!("expected Settled, got {state:?}");
    };
    assert!(settlement.won());
    assert_eq!(settlement.payout, 500_000);
    assert_eq!(classify(settlement), Outcome::PartialLoss);
}

#[tokio::test]
async fn spin__without_account_fails_before_any_network_call() {
    let ledger = SimLedger::new();
    ledger.fund(PLAYER, &[1_000_000]);
    let mut session = WagerSession::new(None, ledger.chip_token());

    let state = session.spin(&ledger, Some(Bet::Red), "1").await;

    assert!(matches!(
        state,
        SessionState::Failed(SpinError::NotConnected)
    ));
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn spin__without_coins_fails_with_no_funds() {
    let (ledger, mut session) = session_with_coins(&[]);

    let state = session.spin(&ledger, Some(Bet::Red), "1").await;

    assert!(matches!(state, SessionState::Failed(SpinError::NoFunds)));
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn spin__invalid_amount_fails_with_no_side_effects() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);

    let state = session.spin(&ledger, Some(Bet::Red), "not a number").await;

    assert!(matches!(
        state,
        SessionState::Failed(SpinError::InvalidAmount(_))
    ));
    assert_eq!(ledger.submission_count(), 0);
    assert_eq!(ledger.balance_of(&PLAYER), 1_000_000);
}

#[tokio::test]
async fn spin__insufficient_funds_consumes_nothing() {
    let (ledger, mut session) = session_with_coins(&[100]);

    let state = session.spin(&ledger, Some(Bet::Red), "1").await;

    assert!(matches!(
        state,
        SessionState::Failed(SpinError::InsufficientFunds {
            needed: 1_000_000,
            available: 100,
        })
    ));
    assert_eq!(ledger.submission_count(), 0);
    assert_eq!(ledger.balance_of(&PLAYER), 100);
}

#[tokio::test]
async fn spin__signing_rejection_leaves_coins_untouched() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.reject_next_signing("user declined the signing prompt");

    let state = session.spin(&ledger, Some(Bet::Red), "1").await;

    assert!(matches!(
        state,
        SessionState::Failed(SpinError::SigningRejected(_))
    ));
    assert_eq!(ledger.balance_of(&PLAYER), 1_000_000);
}

#[tokio::test]
async fn spin__submission_failure_surfaces_the_cause() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.fail_next_submission("node unreachable");

    let state = session.spin(&ledger, Some(Bet::Red), "1").await;

    let SessionState::Failed(SpinError::SubmissionFailed(cause)) = state else {
        panic!("expected SubmissionFailed, got {state:?}");
    };
    assert_eq!(cause, "node unreachable");
}

#[tokio::test]
async fn spin__missing_settlement_event_fails_instead_of_settling() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.set_wheel_number(8);
    ledger.omit_settlement_event(true);

    let state = session.spin(&ledger, Some(Bet::Red), "1").await;

    // Finality without an interpretable event is Failed, never Settled.
    assert!(matches!(
        state,
        SessionState::Failed(SpinError::EventMissing(_))
    ));
    // The funds really moved; only the balance refresh reconciles.
    assert!(session.balance_refresh_due().is_some());
    let balance = session.refresh_balance(&ledger).await.unwrap();
    assert_eq!(balance, 0);
}

#[tokio::test]
async fn spin__settled_balance_reflects_payout_after_refresh() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.set_wheel_number(7);

    session.spin(&ledger, Some(Bet::Number(7)), "1").await;

    assert!(session.balance_refresh_due().is_some());
    let balance = session.refresh_balance(&ledger).await.unwrap();
    assert_eq!(balance, 36_000_000);
    assert!(session.balance_refresh_due().is_none());
}

#[tokio::test]
async fn clear__returns_a_resolved_session_to_idle() {
    let (ledger, mut session) = session_with_coins(&[1_000_000]);
    ledger.set_wheel_number(8);

    session.spin(&ledger, Some(Bet::Red), "1").await;
    assert!(matches!(session.state(), SessionState::Settled(_)));

    session.clear();
    assert!(matches!(session.state(), SessionState::Idle));

    session.spin(&ledger, Some(Bet::Red), "bad").await;
    assert!(matches!(session.state(), SessionState::Failed(_)));
    session.clear();
    assert!(matches!(session.state(), SessionState::Idle));
}

#[tokio::test]
async fn spin__history_keeps_settled_wagers_newest_first() {
    let (ledger, mut session) = session_with_coins(&[10_000_000]);
    ledger.set_wheel_number(7);

    session.spin(&ledger, Some(Bet::Number(7)), "1").await;
    session.clear();
    session.spin(&ledger, Some(Bet::Red), "2").await;

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].bet, Some(Bet::Red));
    assert_eq!(history[0].settlement.deposit, 2_000_000);
    assert_eq!(history[1].bet, Some(Bet::Number(7)));
}

#[tokio::test]
async fn spin__each_wager_snapshots_coins_afresh() {
    // A retry after failure re-reads holdings from scratch.
    let (ledger, mut session) = session_with_coins(&[100]);
    let state = session.spin(&ledger, Some(Bet::Red), "1").await;
    assert!(matches!(state, SessionState::Failed(_)));

    ledger.fund(PLAYER, &[2_000_000]);
    session.clear();
    ledger.set_wheel_number(8);

    let state = session.spin(&ledger, Some(Bet::Red), "1").await;
    assert!(matches!(state, SessionState::Settled(_)));
}
