mod common;

use alloy::primitives::{Address, U256};
use common::{addr, owner, pending_tx, FakeTreasury};
use treasury_core::domain::UNNAMED_TREASURY;
use treasury_core::{
    CreateMultiSigParams, GovernanceProposal, PortError, TransferRequest, TreasuryService,
    VoteAction, WriteRequest,
};

const CONTROLLER: Address = Address::repeat_byte(0x0C);

fn service(fake: FakeTreasury, limit: u64) -> TreasuryService<FakeTreasury> {
    TreasuryService::new(fake, limit)
}

#[tokio::test]
async fn probe_stops_at_first_unused_id_and_sorts_newest_first() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    fake.with_state(|s| s.transactions = (0..3).map(|id| pending_tx(id, 0)).collect());
    let svc = service(fake, 20);

    let txs = svc.load_transactions(CONTROLLER).await;
    assert_eq!(txs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1, 0]);
    assert_eq!(svc.port.with_state(|s| s.transaction_reads.clone()), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn probe_never_reads_past_the_limit() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    fake.with_state(|s| s.transactions = (0..30).map(|id| pending_tx(id, 0)).collect());
    let svc = service(fake, 20);

    let txs = svc.load_transactions(CONTROLLER).await;
    assert_eq!(txs.len(), 20);
    assert_eq!(txs.first().map(|t| t.id), Some(19));
    assert_eq!(svc.port.with_state(|s| s.transaction_reads.len()), 20);
}

#[tokio::test]
async fn probe_keeps_what_it_found_before_a_failed_read() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    fake.with_state(|s| {
        s.transactions = (0..5).map(|id| pending_tx(id, 0)).collect();
        s.fail_transaction_read_at = Some(2);
    });
    let svc = service(fake, 20);

    let txs = svc.load_transactions(CONTROLLER).await;
    assert_eq!(txs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 0]);
}

#[tokio::test]
async fn load_multisig_fails_when_any_parallel_read_fails() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 60), owner(2, 40)], 51);
    fake.with_state(|s| s.fail_owners = true);
    let svc = service(fake, 20);

    let err = svc.load_multisig(CONTROLLER).await.expect_err("owners failure");
    assert!(matches!(err, PortError::Transport(_)));
}

#[tokio::test]
async fn load_multisig_falls_back_to_controller_and_default_names() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 60), owner(2, 40)], 51);
    fake.with_state(|s| {
        s.fail_company_wallet = true;
        s.config.name = String::new();
        s.owners[0].name = "Alice".to_owned();
    });
    let svc = service(fake, 20);

    let ms = svc.load_multisig(CONTROLLER).await.expect("load");
    assert_eq!(ms.wallet, CONTROLLER);
    assert_eq!(ms.name, UNNAMED_TREASURY);
    assert_eq!(ms.owners[0].name, "Alice");
    assert_eq!(ms.owners[1].name, "Owner 2");
    assert_eq!(ms.balance, U256::from(5_000u64));
}

#[tokio::test]
async fn confirm_refetches_the_transaction_list() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 60), owner(2, 40)], 51);
    fake.with_state(|s| s.transactions = vec![pending_tx(0, 0)]);
    let svc = service(fake, 20);
    let owners = svc.port.with_state(|s| s.owners.clone());

    let outcome = svc
        .vote(CONTROLLER, &owners, VoteAction::Confirm, 0)
        .await
        .expect("confirm");
    assert_eq!(outcome.listing.transactions[0].confirmation_count, 1);
    assert_eq!(outcome.listing.confirmers_of(0), Some(&[addr(1)][..]));
}

#[tokio::test]
async fn failed_vote_does_not_refetch() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    fake.with_state(|s| {
        s.transactions = vec![pending_tx(0, 0)];
        s.fail_vote_on = Some(0);
    });
    let svc = service(fake, 20);
    let owners = svc.port.with_state(|s| s.owners.clone());

    let err = svc
        .vote(CONTROLLER, &owners, VoteAction::Confirm, 0)
        .await
        .expect_err("rejected");
    assert_eq!(err.rpc_code(), Some(4001));
    assert!(svc.port.with_state(|s| s.transaction_reads.is_empty()));
}

#[tokio::test]
async fn confirmers_are_dropped_when_lookup_is_unsupported() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    fake.with_state(|s| {
        s.transactions = vec![pending_tx(0, 1)];
        s.fail_confirmation_reads = true;
    });
    let svc = service(fake, 20);
    let owners = svc.port.with_state(|s| s.owners.clone());

    let listing = svc.load_listing(CONTROLLER, &owners).await;
    assert_eq!(listing.transactions.len(), 1);
    assert!(listing.confirmers.is_none());
}

#[tokio::test]
async fn batch_confirm_stops_at_first_failure() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    fake.with_state(|s| {
        s.transactions = (0..3).map(|id| pending_tx(id, 0)).collect();
        s.fail_vote_on = Some(1);
    });
    let svc = service(fake, 20);
    let owners = svc.port.with_state(|s| s.owners.clone());

    let outcome = svc.confirm_batch(CONTROLLER, &owners, &[0, 1, 2]).await;
    assert_eq!(outcome.confirmed, vec![0]);
    assert_eq!(outcome.failed.as_ref().map(|(id, _)| *id), Some(1));
    assert_eq!(svc.port.with_state(|s| s.submitted.len()), 2);
    assert_eq!(outcome.listing.transactions.len(), 3);
}

#[tokio::test]
async fn pause_rereads_config() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    let svc = service(fake, 20);

    let (_, config) = svc.set_paused(CONTROLLER, true).await.expect("pause");
    assert!(config.paused);
    let (_, config) = svc.set_paused(CONTROLLER, false).await.expect("unpause");
    assert!(!config.paused);
}

#[tokio::test]
async fn proposals_and_transfers_appear_after_refetch() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    let svc = service(fake, 20);
    let owners = svc.port.with_state(|s| s.owners.clone());

    let outcome = svc
        .propose(CONTROLLER, &owners, GovernanceProposal::ChangeTimelock(7_200))
        .await
        .expect("propose");
    assert_eq!(outcome.listing.transactions.len(), 1);

    let outcome = svc
        .submit_transfer(
            CONTROLLER,
            &owners,
            TransferRequest::BatchEqual {
                token_address: Address::ZERO,
                recipients: vec![addr(0x31), addr(0x32)],
                amount_per: U256::from(10u64),
            },
        )
        .await
        .expect("transfer");
    assert_eq!(outcome.listing.transactions.len(), 2);
}

#[tokio::test]
async fn mismatched_batch_is_rejected_before_sending() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    let svc = service(fake, 20);

    let err = svc
        .submit_transfer(
            CONTROLLER,
            &[],
            TransferRequest::BatchDifferent {
                token_address: Address::ZERO,
                recipients: vec![addr(0x31), addr(0x32)],
                amounts: vec![U256::from(1u64)],
            },
        )
        .await
        .expect_err("mismatch");
    assert!(matches!(err, PortError::Validation(_)));
    assert!(svc.port.with_state(|s| s.submitted.is_empty()));
}

#[tokio::test]
async fn create_multisig_returns_updated_controller_list() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 100)], 51);
    let svc = service(fake, 20);

    let params = CreateMultiSigParams {
        name: "Payroll".to_owned(),
        owners: vec![addr(1), addr(2)],
        owner_names: vec!["A".to_owned(), "B".to_owned()],
        percentages: vec![50, 50],
        removable: vec![true, false],
        required_percentage: 51,
        timelock_period: 0,
        expiry_period: 86_400,
        min_owners: 2,
    };
    let (_, controllers) = svc
        .create_multisig(addr(0xFA), params.clone())
        .await
        .expect("create");
    assert_eq!(controllers.len(), 1);

    let bad = CreateMultiSigParams {
        percentages: vec![100],
        ..params
    };
    assert!(svc.create_multisig(addr(0xFA), bad).await.is_err());
}

#[tokio::test]
async fn dashboard_without_factory_is_empty() {
    let svc = service(FakeTreasury::default(), 20);
    let data = svc.load_dashboard(None).await;
    assert!(!data.factory_configured);
    assert!(data.summaries.is_empty());
}

#[tokio::test]
async fn dashboard_skips_unreadable_deployments_and_sums_stats() {
    let fake = FakeTreasury::with_owners(vec![owner(1, 60), owner(2, 40)], 51);
    fake.with_state(|s| {
        s.controllers = vec![addr(0x71), addr(0x72), addr(0x73)];
        s.unreadable_controllers.insert(addr(0x72));
        s.names.insert(addr(0x71), "Ops".to_owned());
        s.transactions = vec![pending_tx(0, 0)];
    });
    let svc = service(fake, 20);

    let data = svc.load_dashboard(Some(addr(0xFA))).await;
    assert!(data.factory_configured);
    assert_eq!(data.summaries.len(), 2);
    assert_eq!(data.summaries[0].name, "Ops");
    assert_eq!(data.summaries[1].name, "Ops Treasury");
    assert_eq!(data.stats.total_treasuries, 2);
    assert_eq!(data.stats.total_owners, 4);
    assert_eq!(data.stats.total_transactions, 2);
    assert_eq!(data.stats.total_value_locked, U256::from(10_000u64));
}

#[tokio::test]
async fn wallet_execute_surfaces_revert() {
    let svc = service(FakeTreasury::default(), 20);
    let err = svc
        .wallet_execute(WriteRequest::WalletExecute {
            wallet: addr(0xCC),
            to: addr(0x31),
            value: U256::from(1u64),
            is_token_transfer: false,
            token_address: Address::ZERO,
            data: Default::default(),
        })
        .await
        .expect_err("only controller");
    assert!(matches!(err, PortError::Reverted(_)));
}

#[tokio::test]
async fn token_balance_reads_through_the_wallet() {
    let svc = service(FakeTreasury::default(), 20);
    let balance = svc
        .token_balance(addr(0xCC), addr(0x70))
        .await
        .expect("token balance");
    assert_eq!(balance, U256::from(42u64));
}
