// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use munch_adapters::{FakeLedger, LedgerCall};
use munch_core::{ChainError, SequentialIdGen, TxHash};
use yare::parameterized;

type TestController = SyncController<FakeLedger, FakeLedger, SequentialIdGen>;

fn setup(fake: &FakeLedger) -> TestController {
    SyncController::with_ids(fake.clone(), fake.clone(), SequentialIdGen::new("sub"))
}

fn entry(what: &str, at: u64) -> Entry {
    Entry::new(FakeLedger::default_account(), at, what, "home", "hungry")
}

// =============================================================================
// Bootstrap
// =============================================================================

#[tokio::test]
async fn connect_subscribes_before_bulk_read() {
    let fake = FakeLedger::new().with_history(vec![entry("toast", 1)]);
    let mut controller = setup(&fake);

    let account = controller.connect().await.unwrap();

    assert_eq!(account, FakeLedger::default_account());
    assert_eq!(controller.state(), SyncState::Live);
    assert_eq!(controller.current_entries(), vec![entry("toast", 1)]);
    assert_eq!(
        fake.calls(),
        vec![
            LedgerCall::RequestAccounts,
            LedgerCall::Subscribe,
            LedgerCall::FetchAll
        ]
    );
}

#[tokio::test]
async fn restore_without_authorization_stays_idle() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);

    assert_eq!(controller.restore_if_authorized().await.unwrap(), None);
    assert_eq!(controller.state(), SyncState::Idle);
    assert_eq!(controller.connection_state(), ConnectionState::Disconnected);
    assert!(fake.chain_calls().is_empty());
}

#[tokio::test]
async fn restore_without_wallet_is_wallet_unavailable() {
    let fake = FakeLedger::new();
    fake.remove_wallet();
    let mut controller = setup(&fake);

    let err = controller.restore_if_authorized().await.unwrap_err();
    assert!(matches!(err, SyncError::WalletUnavailable(_)));
}

#[tokio::test]
async fn rejected_connect_leaves_controller_idle() {
    let fake = FakeLedger::new();
    fake.reject_prompts();
    let mut controller = setup(&fake);

    assert_eq!(controller.connect().await, Err(SyncError::UserRejected));
    assert_eq!(controller.state(), SyncState::Idle);
    assert_eq!(controller.current_account(), None);
}

#[tokio::test]
async fn bootstrap_requires_account() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);

    let err = controller.bootstrap().await.unwrap_err();
    assert!(matches!(err, SyncError::NotReady(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn failed_bootstrap_returns_to_idle_and_releases_subscription() {
    let fake = FakeLedger::new();
    fake.fail_next_fetch(ChainError::Network("connection reset".into()));
    let mut controller = setup(&fake);

    let err = controller.connect().await.unwrap_err();

    assert_eq!(err, SyncError::Network("connection reset".into()));
    assert_eq!(controller.state(), SyncState::Idle);
    assert_eq!(fake.active_subscriptions(), 0);
    assert!(controller.current_entries().is_empty());

    // The account survives, so bootstrap can simply be retried
    assert_eq!(controller.bootstrap().await.unwrap(), 0);
    assert_eq!(controller.state(), SyncState::Live);
}

#[tokio::test]
async fn failed_subscribe_fails_bootstrap() {
    let fake = FakeLedger::new();
    fake.fail_next_subscribe(ChainError::Network("refused".into()));
    let mut controller = setup(&fake);

    assert!(controller.connect().await.is_err());
    assert_eq!(controller.state(), SyncState::Idle);
    assert!(!fake.calls().contains(&LedgerCall::FetchAll));
}

#[tokio::test]
async fn disconnect_tears_everything_down() {
    let fake = FakeLedger::new().with_history(vec![entry("toast", 1)]);
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    let watch = controller.watch_entries();
    let revision = *watch.borrow();

    controller.disconnect();

    assert_eq!(controller.state(), SyncState::Idle);
    assert_eq!(controller.connection_state(), ConnectionState::Disconnected);
    assert!(controller.current_entries().is_empty());
    assert_eq!(fake.active_subscriptions(), 0);
    assert!(*watch.borrow() > revision);
}

#[tokio::test]
async fn reconnect_refetches_from_scratch() {
    let fake = FakeLedger::new().with_history(vec![entry("toast", 1)]);
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();

    controller.disconnect();
    fake.append_external(entry("soup", 2));
    fake.clear_calls();
    controller.connect().await.unwrap();

    assert_eq!(
        controller.current_entries(),
        vec![entry("toast", 1), entry("soup", 2)]
    );
    assert_eq!(
        fake.chain_calls(),
        vec![LedgerCall::Subscribe, LedgerCall::FetchAll]
    );
    assert_eq!(fake.active_subscriptions(), 1);
}

#[tokio::test]
async fn connect_while_live_starts_over() {
    let fake = FakeLedger::new().with_history(vec![entry("toast", 1)]);
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();

    controller.connect().await.unwrap();

    assert_eq!(controller.current_entries(), vec![entry("toast", 1)]);
    assert_eq!(fake.active_subscriptions(), 1);
}

// =============================================================================
// Live path
// =============================================================================

#[tokio::test]
async fn entry_appended_during_bulk_read_is_replayed_after_seed() {
    let fake = FakeLedger::new().with_history(vec![entry("toast", 1)]);
    fake.append_during_fetch(entry("soup", 2));
    let mut controller = setup(&fake);

    controller.connect().await.unwrap();

    assert_eq!(
        controller.current_entries(),
        vec![entry("toast", 1), entry("soup", 2)]
    );
}

#[tokio::test]
async fn pump_merges_delivered_entries() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();

    fake.append_external(entry("soup", 2));
    fake.notify(entry("soup", 2));

    assert_eq!(controller.pump(), 1);
    assert_eq!(controller.current_entries(), vec![entry("soup", 2)]);
    assert_eq!(controller.pump(), 0);
}

#[tokio::test]
async fn pump_while_idle_is_noop() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    assert_eq!(controller.pump(), 0);
    assert_eq!(controller.next_live_entry().await, None);
}

#[tokio::test]
async fn watch_entries_ticks_on_insert() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    let mut watch = controller.watch_entries();
    let _ = watch.borrow_and_update();

    fake.append_external(entry("soup", 2));
    controller.pump();

    assert!(watch.has_changed().unwrap());
}

// =============================================================================
// Submission
// =============================================================================

#[parameterized(
    idle = { false, false },
    authorized_but_not_restored = { true, false },
    nothing_to_restore = { false, true },
)]
fn submit_before_live_is_not_ready(authorize: bool, restore: bool) {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            let fake = FakeLedger::new();
            if authorize {
                fake.authorize();
            }
            let mut controller = setup(&fake);
            if restore {
                controller.restore_if_authorized().await.unwrap();
            }
            fake.clear_calls();

            let err = controller.submit("tacos", "truck", "hungry").await.unwrap_err();

            assert!(matches!(err, SyncError::NotReady(_)));
            assert!(fake.calls().is_empty());
        });
}

#[tokio::test]
async fn submit_after_failed_bootstrap_is_not_ready() {
    let fake = FakeLedger::new();
    fake.fail_next_fetch(ChainError::Network("down".into()));
    let mut controller = setup(&fake);
    let _ = controller.connect().await;
    fake.clear_calls();

    let err = controller.submit("tacos", "truck", "hungry").await.unwrap_err();

    assert!(matches!(err, SyncError::NotReady(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn submit_after_disconnect_is_not_ready() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    controller.disconnect();
    fake.clear_calls();

    let err = controller.submit("tacos", "truck", "hungry").await.unwrap_err();

    assert!(matches!(err, SyncError::NotReady(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn revoked_authorization_blocks_submission() {
    let fake = FakeLedger::new();
    fake.authorize();
    let mut controller = setup(&fake);
    controller.restore_if_authorized().await.unwrap();
    assert_eq!(controller.state(), SyncState::Live);

    fake.set_accounts(vec![]);
    assert_eq!(controller.restore_if_authorized().await.unwrap(), None);

    assert_eq!(controller.state(), SyncState::Idle);
    assert_eq!(controller.connection_state(), ConnectionState::Disconnected);
    assert_eq!(controller.current_account(), None);
    assert!(matches!(
        controller.bootstrap().await.unwrap_err(),
        SyncError::NotReady(_)
    ));

    fake.clear_calls();
    let err = controller.submit("tacos", "truck", "hungry").await.unwrap_err();
    assert!(matches!(err, SyncError::NotReady(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn submission_reaches_cache_only_through_live_path() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();

    let outcome = controller.submit("tacos", "truck", "hungry").await.unwrap();

    assert_eq!(outcome.id, SubmissionId("sub-1".into()));
    assert_eq!(outcome.ledger_total, Some(1));
    assert!(controller.current_entries().is_empty());

    controller.pump();
    let entries = controller.current_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].what, "tacos");
    assert_eq!(entries[0].submitter, FakeLedger::default_account());
}

#[tokio::test]
async fn split_submission_tracks_phase() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();

    let pending = controller.begin_submit("tacos", "truck", "hungry").await.unwrap();

    assert_eq!(
        controller.submission_phase(&pending.id),
        Some(SubmissionPhase::Confirming)
    );
    assert_eq!(controller.in_flight(), 1);

    let outcome = controller.finish_submit(&pending).await.unwrap();

    assert_eq!(outcome.hash, pending.hash);
    assert_eq!(controller.submission_phase(&pending.id), None);
    assert_eq!(controller.in_flight(), 0);
}

#[tokio::test]
async fn failed_transaction_adds_nothing() {
    let fake = FakeLedger::new().with_history(vec![entry("toast", 1)]);
    fake.fail_confirmations("out of gas");
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();

    let pending = controller.begin_submit("tacos", "truck", "hungry").await.unwrap();
    let err = controller.finish_submit(&pending).await.unwrap_err();

    assert_eq!(
        err,
        SyncError::TransactionFailed {
            hash: pending.hash,
            reason: "out of gas".into()
        }
    );
    controller.pump();
    assert_eq!(controller.current_entries(), vec![entry("toast", 1)]);
    assert_eq!(controller.in_flight(), 0);
}

#[tokio::test]
async fn declined_signature_is_user_rejected() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    fake.fail_next_send(ChainError::UserRejected);

    let err = controller.submit("tacos", "truck", "hungry").await.unwrap_err();

    assert_eq!(err, SyncError::UserRejected);
    assert_eq!(controller.in_flight(), 0);
}

#[tokio::test]
async fn node_rejection_is_submission_rejected() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    fake.fail_next_send(ChainError::SubmissionRejected("insufficient funds".into()));

    let err = controller.submit("tacos", "truck", "hungry").await.unwrap_err();

    assert_eq!(err, SyncError::SubmissionRejected("insufficient funds".into()));
}

#[tokio::test]
async fn submission_reads_total_before_and_after() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    fake.clear_calls();

    controller.submit("tacos", "truck", "hungry").await.unwrap();

    let calls = fake.chain_calls();
    assert_eq!(calls.first(), Some(&LedgerCall::FetchTotalCount));
    assert_eq!(calls.last(), Some(&LedgerCall::FetchTotalCount));
    assert!(calls.contains(&LedgerCall::SendAppend {
        signer: FakeLedger::default_account(),
        what: "tacos".into(),
        place: "truck".into(),
        why: "hungry".into(),
    }));
}

#[tokio::test]
async fn total_mismatch_is_not_an_error() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();

    let pending = controller.begin_submit("tacos", "truck", "hungry").await.unwrap();
    // Someone else appends while ours is being mined
    fake.append_external(entry("soup", 2));
    let outcome = controller.finish_submit(&pending).await.unwrap();

    assert_eq!(outcome.ledger_total, Some(2));
}

#[tokio::test]
async fn finish_unknown_transaction_is_network_error() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    let pending = PendingSubmission::new(
        SubmissionId("stray".into()),
        &munch_core::PendingHandle {
            hash: TxHash::new([9; 32]),
        },
    );

    let err = controller.finish_submit(&pending).await.unwrap_err();
    assert!(matches!(err, SyncError::Network(_)));
}

#[test]
fn total_diagnostic_tolerates_counter_at_max() {
    assert!(advanced_by_one(4, 5));
    assert!(!advanced_by_one(4, 6));
    assert!(!advanced_by_one(u64::MAX, u64::MAX));
    assert!(!advanced_by_one(u64::MAX, 0));
}

#[tokio::test]
async fn rejected_send_leaves_nothing_in_flight() {
    let fake = FakeLedger::new();
    let mut controller = setup(&fake);
    controller.connect().await.unwrap();
    fake.fail_next_send(ChainError::UserRejected);

    controller.begin_submit("tacos", "truck", "hungry").await.unwrap_err();

    assert_eq!(controller.in_flight(), 0);
    assert_eq!(
        controller.submission_phase(&SubmissionId("sub-1".into())),
        None
    );
}
